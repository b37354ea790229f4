//! ox-driver
//!
//! Loads configuration, initializes tracing, and replays built-in
//! notification scenarios against an [`OrderManager`], printing the final
//! exposure of each as JSON.

mod scenarios;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use ox_core::config::AppConfig;
use ox_core::types::Side;
use ox_oms::OrderManager;

use crate::scenarios::{Scenario, ScenarioChoice};

/// Order exposure scenario driver
#[derive(Parser, Debug)]
#[command(name = "ox-driver", about = "Replay order lifecycle scenarios")]
struct Args {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scenario to run.
    #[arg(short, long, value_enum, default_value_t = ScenarioChoice::All)]
    scenario: ScenarioChoice,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = AppConfig::load(args.config)?;

    ox_core::logging::init_tracing(&config.logging);

    tracing::info!(
        replace_keying = ?config.oms.replace_keying,
        scenario = ?args.scenario,
        "starting ox-driver"
    );

    for scenario in args.scenario.scenarios() {
        let mut manager = OrderManager::with_config(&config.oms);
        let report = run(&scenario, &mut manager);
        let json = serde_json::to_string_pretty(&report)
            .with_context(|| format!("failed to serialize report for {}", scenario.name))?;
        println!("{json}");
    }
    Ok(())
}

/// Final state of one scenario run.
#[derive(Debug, serde::Serialize)]
struct Report<'a> {
    scenario: &'a str,
    notifications: usize,
    diagnostics: Vec<String>,
    exposure: ox_oms::Exposure,
}

fn run<'a>(scenario: &'a Scenario, manager: &mut OrderManager) -> Report<'a> {
    let span = tracing::info_span!("scenario", name = scenario.name);
    let _enter = span.enter();

    for notification in &scenario.notifications {
        notification.deliver(manager);
        tracing::info!(
            notification = %notification.kind(),
            nfq = manager.net_filled_quantity(),
            cov_buy = %manager.confirmed_order_value(Side::Buy),
            cov_sell = %manager.confirmed_order_value(Side::Sell),
            "applied"
        );
    }

    let diagnostics = manager
        .take_diagnostics()
        .into_iter()
        .map(|d| {
            tracing::warn!(
                at = %d.at,
                notification = %d.notification,
                error = %d.error,
                "drained diagnostic"
            );
            format!("{}: {}", d.notification, d.error)
        })
        .collect();

    Report {
        scenario: scenario.name,
        notifications: scenario.notifications.len(),
        diagnostics,
        exposure: manager.exposure().clone(),
    }
}
