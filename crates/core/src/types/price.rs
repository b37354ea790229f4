//! Fixed-point decimal type for prices and order values.
//!
//! [`Price`] stores `mantissa * 10^(-scale)`. A limit price of `200.25` is
//! `Price { mantissa: 20025, scale: 2 }`. Multiplying a price by an integer
//! quantity keeps the scale, so `price * quantity` is an exact order value;
//! the exposure aggregates accumulate those values in the same type.
//!
//! Operands with different scales are normalized to the higher scale before
//! any comparison or arithmetic.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Fixed-point decimal: `value = mantissa * 10^(-scale)`.
///
/// # Examples
///
/// ```
/// use ox_core::types::Price;
///
/// let price = Price::new(20025, 2); // 200.25
/// let value = price * 4;
/// assert_eq!(value, Price::new(801, 0));
/// ```
#[derive(Clone, Copy, Serialize, Deserialize)]
pub struct Price {
    mantissa: i64,
    scale: u8,
}

impl Price {
    /// Create a price from mantissa and scale.
    #[inline]
    pub const fn new(mantissa: i64, scale: u8) -> Self {
        Self { mantissa, scale }
    }

    /// A zero value with the given scale.
    #[inline]
    pub const fn zero(scale: u8) -> Self {
        Self { mantissa: 0, scale }
    }

    /// Whole-unit value (scale 0).
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Self {
            mantissa: units,
            scale: 0,
        }
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.mantissa < 0
    }

    /// Returns the raw mantissa.
    #[inline]
    pub const fn mantissa(&self) -> i64 {
        self.mantissa
    }

    /// Returns the scale (number of decimal places).
    #[inline]
    pub const fn scale(&self) -> u8 {
        self.scale
    }

    /// Convert to `f64`. Lossy; meant for logging and display only.
    #[inline]
    pub fn to_f64(&self) -> f64 {
        self.mantissa as f64 / 10f64.powi(self.scale as i32)
    }

    /// Checked addition. Returns `None` on overflow.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        let (a, b, scale) = Self::normalize(self, rhs)?;
        Some(Self {
            mantissa: a.checked_add(b)?,
            scale,
        })
    }

    /// Checked subtraction. Returns `None` on overflow.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        let (a, b, scale) = Self::normalize(self, rhs)?;
        Some(Self {
            mantissa: a.checked_sub(b)?,
            scale,
        })
    }

    /// Checked multiplication by an integer quantity.
    pub fn checked_mul(self, quantity: i64) -> Option<Self> {
        Some(Self {
            mantissa: self.mantissa.checked_mul(quantity)?,
            scale: self.scale,
        })
    }

    /// Checked negation. Returns `None` for the most negative mantissa.
    pub fn checked_neg(self) -> Option<Self> {
        Some(Self {
            mantissa: self.mantissa.checked_neg()?,
            scale: self.scale,
        })
    }

    /// Align two values to the higher scale, returning both mantissas and
    /// the common scale. `None` if rescaling overflows `i64`.
    fn normalize(a: Self, b: Self) -> Option<(i64, i64, u8)> {
        match a.scale.cmp(&b.scale) {
            Ordering::Equal => Some((a.mantissa, b.mantissa, a.scale)),
            Ordering::Less => {
                let factor = 10i64.checked_pow(u32::from(b.scale - a.scale))?;
                Some((a.mantissa.checked_mul(factor)?, b.mantissa, b.scale))
            }
            Ordering::Greater => {
                let factor = 10i64.checked_pow(u32::from(a.scale - b.scale))?;
                Some((a.mantissa, b.mantissa.checked_mul(factor)?, a.scale))
            }
        }
    }
}

impl Default for Price {
    fn default() -> Self {
        Self::zero(0)
    }
}

impl fmt::Debug for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Price({}, scale={})", self, self.scale)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.mantissa);
        }
        let divisor = 10u64.pow(u32::from(self.scale));
        let magnitude = self.mantissa.unsigned_abs();
        let sign = if self.mantissa < 0 { "-" } else { "" };
        write!(
            f,
            "{}{}.{:0>width$}",
            sign,
            magnitude / divisor,
            magnitude % divisor,
            width = self.scale as usize
        )
    }
}

impl PartialEq for Price {
    fn eq(&self, other: &Self) -> bool {
        match Self::normalize(*self, *other) {
            Some((a, b, _)) => a == b,
            None => false,
        }
    }
}

impl Eq for Price {}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Price {
    fn cmp(&self, other: &Self) -> Ordering {
        match Self::normalize(*self, *other) {
            Some((a, b, _)) => a.cmp(&b),
            None => self.to_f64().total_cmp(&other.to_f64()),
        }
    }
}

impl Hash for Price {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Canonical form: strip trailing zeros so equal values hash equally.
        let mut m = self.mantissa;
        let mut s = self.scale;
        while s > 0 && m % 10 == 0 {
            m /= 10;
            s -= 1;
        }
        m.hash(state);
        s.hash(state);
    }
}

impl Add for Price {
    type Output = Self;

    /// Panics on overflow, like the primitive integer operators.
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        self.checked_add(rhs).expect("Price::add overflow")
    }
}

impl Sub for Price {
    type Output = Self;

    /// Panics on overflow, like the primitive integer operators.
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.checked_sub(rhs).expect("Price::sub overflow")
    }
}

impl AddAssign for Price {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Price {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul<i64> for Price {
    type Output = Self;

    /// Price times quantity. Panics on overflow.
    #[inline]
    fn mul(self, quantity: i64) -> Self::Output {
        self.checked_mul(quantity).expect("Price::mul overflow")
    }
}

impl Neg for Price {
    type Output = Self;

    /// Panics on overflow, like the primitive integer operators.
    #[inline]
    fn neg(self) -> Self::Output {
        Self {
            mantissa: -self.mantissa,
            scale: self.scale,
        }
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Price::zero(0), |acc, v| acc + v)
    }
}

impl From<f64> for Price {
    /// Convert with scale 8. Floating-point input is imprecise; intended
    /// for tests and configuration only.
    ///
    /// The conversion saturates: values beyond about ±9.2e10 clamp to the
    /// `i64` mantissa bounds, and NaN becomes zero.
    fn from(value: f64) -> Self {
        const DEFAULT_SCALE: u8 = 8;
        let factor = 10f64.powi(DEFAULT_SCALE as i32);
        Self {
            mantissa: (value * factor).round() as i64,
            scale: DEFAULT_SCALE,
        }
    }
}
