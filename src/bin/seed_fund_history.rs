// ABOUTME: Spreads donations and payments across the lifetime of three existing funds
// ABOUTME: Generates members and plans only where the database has none
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Fund history seeder.
//!
//! Usage:
//! ```bash
//! cargo run --bin seed-fund-history -- <FUND_ID> <FUND_ID> <FUND_ID>
//!
//! # More donations, reproducible
//! cargo run --bin seed-fund-history -- --donations 900 --seed 7 <FUND_ID> <FUND_ID> <FUND_ID>
//! ```

use std::process::ExitCode;

use boardfund_seed::config::{parse_fund_ids, DatabaseConfig, SeedConfig};
use boardfund_seed::constants::defaults;
use boardfund_seed::errors::{AppResult, ErrorCode};
use boardfund_seed::generator::Generator;
use boardfund_seed::logging::LoggingConfig;
use boardfund_seed::seeder::{finish_run, seed_fund_history, SeedReport};
use boardfund_seed::sink::PostgresSink;
use chrono::Utc;
use clap::{CommandFactory, Parser};
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Parser)]
#[command(
    name = "seed-fund-history",
    about = "Fund lifetime donation seeder",
    long_about = "Distribute donations and payments evenly across the lifetime of three existing funds"
)]
struct HistoryArgs {
    /// Exactly three fund ids
    #[arg(value_name = "FUND_ID", num_args = 0..)]
    fund_ids: Vec<String>,

    /// Database URL override (otherwise `DATABASE_URL`, then `PG_*`)
    #[arg(long)]
    database_url: Option<String>,

    /// Donation budget, split evenly across the funds
    #[arg(long, default_value_t = defaults::DONATION_COUNT)]
    donations: usize,

    /// Members to create when the member table is empty
    #[arg(long, default_value_t = defaults::MEMBER_COUNT)]
    members: usize,

    /// Rows per insert statement
    #[arg(long, default_value_t = defaults::BATCH_SIZE)]
    batch_size: usize,

    /// Random seed for reproducible data (optional)
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

impl HistoryArgs {
    fn seed_config(&self) -> SeedConfig {
        SeedConfig {
            member_count: self.members,
            donation_count: self.donations,
            batch_size: self.batch_size,
            seed: self.seed,
            ..SeedConfig::default()
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = HistoryArgs::parse();

    if let Err(e) = LoggingConfig::from_env().verbose(args.verbose).init() {
        eprintln!("warning: {e}");
    }

    match run(&args).await {
        Ok(report) => {
            report.log_summary();
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(code = ?e.code, "{e}");
            eprintln!("error: {e}");
            if e.code == ErrorCode::InvalidInput {
                eprintln!("{}", HistoryArgs::command().render_usage());
            }
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(args: &HistoryArgs) -> AppResult<SeedReport> {
    let fund_ids = parse_fund_ids(&args.fund_ids)?;
    let config = args.seed_config();
    config.validate()?;

    let database = DatabaseConfig::resolve(args.database_url.clone())?;
    let pool = database.connect().await?;
    let result = seed_database(&pool, &config, &fund_ids).await;
    pool.close().await;
    result
}

async fn seed_database(
    pool: &PgPool,
    config: &SeedConfig,
    fund_ids: &[Uuid],
) -> AppResult<SeedReport> {
    let mut generator = Generator::new(config.seed_or_clock(), Utc::now());
    info!("Random seed: {}", generator.seed());

    let mut sink = PostgresSink::begin(pool, config.batch_size).await?;
    let outcome = seed_fund_history(&mut generator, &mut sink, config, fund_ids).await;
    finish_run(&mut sink, outcome).await
}
