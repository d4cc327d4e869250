//! alert-runner: monthly usage-decline notification job.
//!
//! Usage:
//!   alert-runner --config alert.json
//!   alert-runner --period 202503 --threshold 20 --db usage.db --dry-run
//!   alert-runner --period 202503 --json

use anyhow::{Context, Result};
use chrono::{FixedOffset, Utc};
use std::env;
use usage_alert_core::{
    config::AlertConfig,
    dispatch::{AlertDispatcher, DispatchOutcome},
    engine::{validate_threshold, BranchOutcome, DeclineEngine},
    notifier::{ChatPushSink, NotificationSink},
    period::Period,
    store::UsageStore,
};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut config = match flag_value(&args, "--config") {
        Some(path) => AlertConfig::load(path)?,
        None => AlertConfig::default(),
    };
    if let Some(db) = flag_value(&args, "--db") {
        config.database_path = db.to_string();
    }
    let threshold = threshold_arg(&args, config.threshold_percent)?;
    let dry_run = args.iter().any(|a| a == "--dry-run");
    let json = args.iter().any(|a| a == "--json");
    let offset = config.utc_offset()?;

    let period = match flag_value(&args, "--period") {
        Some(p) => p.to_string(),
        None => default_period(&offset)?,
    };

    if !json {
        println!("alert-runner");
        println!("  period:     {period}");
        println!("  threshold:  {threshold}%");
        println!("  db:         {}", config.database_path);
        println!("  dry run:    {dry_run}");
        println!();
    }

    let store = UsageStore::open(&config.database_path)
        .with_context(|| format!("opening {}", config.database_path))?;
    store.migrate()?;

    // Built once here and injected; `None` disables delivery.
    let sink: Option<Box<dyn NotificationSink>> = if dry_run {
        None
    } else {
        ChatPushSink::from_config(&config.notifier)?
            .map(|s| Box::new(s) as Box<dyn NotificationSink>)
    };

    let engine = DeclineEngine::new(&store, &store);
    let dispatcher = AlertDispatcher::new(engine, sink, config.detail_link.clone(), offset);

    let outcome = if dry_run {
        dispatcher.preview(&period, threshold)?
    } else {
        dispatcher.run(&period, threshold)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(outcome.stats())?);
    } else {
        print_summary(&outcome);
    }
    Ok(())
}

/// The month before the current local month.
fn default_period(offset: &FixedOffset) -> Result<String> {
    let today = Utc::now().with_timezone(offset).date_naive();
    Ok(Period::from_date(&today)?.previous()?.key())
}

fn print_summary(outcome: &DispatchOutcome) {
    let stats = outcome.stats();

    println!("=== RUN SUMMARY ===");
    println!("  period:          {} (previous {})", stats.target_period, stats.previous_period);
    println!("  fiscal year:     {}", stats.fiscal_year);
    println!("  branches:        {}", stats.total_branches);
    println!("  with alerts:     {}", stats.branches_with_alerts);
    println!("  customers:       {}", stats.total_customers);
    for o in &stats.outcomes {
        if let BranchOutcome::Skipped { branch_code, reason } = o {
            println!("  skipped:         {branch_code} ({reason})");
        }
    }
    let delivery = match outcome {
        DispatchOutcome::Delivered { .. } => "sent",
        DispatchOutcome::Skipped { .. }   => "not sent (no destination configured)",
        DispatchOutcome::Preview { .. }   => "not sent (dry run)",
    };
    println!("  delivery:        {delivery}");

    println!();
    println!("=== MESSAGE ===");
    println!("{}", outcome.message());
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// `--threshold` when given must parse and pass `validate_threshold`;
/// a typo is an error, never a silent fallback to the configured value.
fn threshold_arg(args: &[String], default: f64) -> Result<f64> {
    let threshold = match flag_value(args, "--threshold") {
        Some(raw) => raw
            .parse::<f64>()
            .with_context(|| format!("--threshold {raw:?} is not a number"))?,
        None => default,
    };
    Ok(validate_threshold(threshold)?)
}
