//! Order-related types: tracking identifiers and side.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Buy / bid.
    Buy,
    /// Sell / offer.
    Sell,
}

impl Side {
    /// Both sides, buy first.
    pub const ALL: [Side; 2] = [Side::Buy, Side::Sell];

    /// Sign applied to filled quantity: `+1` for buys, `-1` for sells.
    #[inline]
    pub const fn sign(&self) -> i64 {
        match self {
            Side::Buy => 1,
            Side::Sell => -1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "Buy"),
            Side::Sell => write!(f, "Sell"),
        }
    }
}

/// Error returned when a single-character side code is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown side code {0:?} (expected 'B' for bid or 'O' for offer)")]
pub struct ParseSideError(pub char);

impl TryFrom<char> for Side {
    type Error = ParseSideError;

    /// Translate the single-character codes used by market adapters:
    /// `'B'` is a bid, `'O'` (or `'S'`) an offer.
    fn try_from(code: char) -> Result<Self, Self::Error> {
        match code {
            'B' | 'b' => Ok(Side::Buy),
            'O' | 'o' | 'S' | 's' => Ok(Side::Sell),
            other => Err(ParseSideError(other)),
        }
    }
}

/// Order tracking identifier.
///
/// Assigned by the client on insert; a replace request names the identifier
/// the order will be tracked under once the replace is acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OID-{}", self.0)
    }
}

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}
