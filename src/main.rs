//! reportctl - LogiCore report service CLI
//!
//! Generates, schedules, and inspects AI inventory reports.

#![allow(missing_docs)]

use chrono::{Duration, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use logicore_reports::{Config, ReportKind, ReportPeriod, ReportService, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "reportctl", version, about = "LogiCore AI report service")]
struct Cli {
    /// YAML configuration file; environment variables are used when absent
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate one report for a date range
    Generate {
        /// Report kind: weekly or monthly
        #[arg(long, default_value = "weekly")]
        kind: ReportKind,
        /// Period start (YYYY-MM-DD); defaults to the kind's lookback
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Period end (YYYY-MM-DD); defaults to today
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Scope to one user; omit for the admin view
        #[arg(long)]
        user: Option<Uuid>,
    },
    /// Generate the weekly and monthly reports as one batch
    Schedule {
        /// Scope to one user; omit for the admin view
        #[arg(long)]
        user: Option<Uuid>,
    },
    /// List stored reports, newest first
    List,
    /// Print one stored report
    Show {
        /// Report id, as shown by `list`
        id: String,
    },
    /// Show quota usage and AI failover state
    Status,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();

    dotenvy::dotenv().ok();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Display, not Debug: variants carry their own hints
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::from_file(path).await?,
        None => Config::from_env()?,
    };
    let service = ReportService::new(config).await?;

    match cli.command {
        Command::Generate {
            kind,
            start,
            end,
            user,
        } => {
            let end = end.unwrap_or_else(|| Utc::now().date_naive());
            let lookback = match kind {
                ReportKind::Weekly => 7,
                ReportKind::Monthly => 30,
            };
            let start = start.unwrap_or(end - Duration::days(lookback));

            let report = service
                .generate_report(kind, ReportPeriod { start, end }, user)
                .await?;
            println!("Generated {} ({:?})", report.id, report.ai_status);
            println!();
            println!("{}", report.content);
        }
        Command::Schedule { user } => {
            let batch = service.generate_scheduled_reports(user).await?;
            for (label, outcome) in [("weekly", &batch.weekly), ("monthly", &batch.monthly)] {
                match outcome {
                    Ok(report) => println!("{}: {}", label, report.id),
                    Err(e) => println!("{}: failed - {}", label, e),
                }
            }
        }
        Command::List => {
            for summary in service.list_reports().await? {
                println!(
                    "{}  {}  {} to {}  {:?}",
                    summary.id,
                    summary.generated_at.format("%Y-%m-%d %H:%M:%S"),
                    summary.period.start,
                    summary.period.end,
                    summary.ai_status,
                );
            }
        }
        Command::Show { id } => {
            let report = service.get_report(&id).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Status => {
            let quota = service.quota_stats();
            let ai = service.ai_status();
            println!(
                "quota: {} remaining ({} this minute, {} this hour, {} total); resets in {}s / {}s",
                quota.remaining_quota,
                quota.recent_requests,
                quota.hourly_requests,
                quota.total_requests,
                quota.quota_reset_in,
                quota.hourly_reset_in,
            );
            println!("ai: {}", ai);
        }
    }

    Ok(())
}
