// ABOUTME: Seeds members, funds, donation plans, donations, and payments from scratch
// ABOUTME: Random-sampling variant over the last twelve months, written in one transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Donation platform seeder.
//!
//! Usage:
//! ```bash
//! # Seed using PG_DB, PG_USER, PG_PASS, PG_HOST, PG_PORT
//! cargo run --bin seed-donations
//!
//! # Reproducible run against an explicit database
//! cargo run --bin seed-donations -- --database-url postgres://localhost/boardfund --seed 42
//!
//! # Wipe previously seeded rows first
//! cargo run --bin seed-donations -- --reset
//!
//! # Generate and verify without touching the database
//! cargo run --bin seed-donations -- --dry-run -v
//! ```

use std::process::ExitCode;

use boardfund_seed::config::{DatabaseConfig, PlanSpec, SeedConfig};
use boardfund_seed::constants::defaults;
use boardfund_seed::errors::{AppResult, ErrorCode};
use boardfund_seed::generator::Generator;
use boardfund_seed::logging::LoggingConfig;
use boardfund_seed::seeder::{finish_run, seed_simple, SeedReport};
use boardfund_seed::sink::{MemorySink, PostgresSink};
use chrono::Utc;
use clap::{CommandFactory, Parser};
use sqlx::PgPool;
use tracing::{error, info};

#[derive(Parser)]
#[command(
    name = "seed-donations",
    about = "Donation platform seeder",
    long_about = "Populate the member, fund, donation_plan, donation, and donation_payment tables with synthetic data"
)]
struct SeedArgs {
    /// Database URL override (otherwise `DATABASE_URL`, then `PG_*`)
    #[arg(long)]
    database_url: Option<String>,

    /// Number of members to create
    #[arg(long, default_value_t = defaults::MEMBER_COUNT)]
    members: usize,

    /// Number of unique donation plans to request
    #[arg(long, default_value_t = defaults::PLAN_COUNT)]
    plans: usize,

    /// Draws allowed while looking for unique plans
    #[arg(long, default_value_t = defaults::PLAN_MAX_ATTEMPTS)]
    plan_attempts: usize,

    /// Number of donation draws
    #[arg(long, default_value_t = defaults::DONATION_COUNT)]
    donations: usize,

    /// Share of donations attached to a plan
    #[arg(long, default_value_t = defaults::RECURRING_RATIO)]
    recurring_ratio: f64,

    /// Rows per insert statement
    #[arg(long, default_value_t = defaults::BATCH_SIZE)]
    batch_size: usize,

    /// Random seed for reproducible data (optional)
    #[arg(long)]
    seed: Option<u64>,

    /// Delete previously seeded rows before inserting
    #[arg(long)]
    reset: bool,

    /// Generate and verify in memory without connecting
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

impl SeedArgs {
    fn seed_config(&self) -> SeedConfig {
        SeedConfig {
            member_count: self.members,
            plan_count: self.plans,
            plan_spec: PlanSpec {
                max_attempts: self.plan_attempts,
                ..PlanSpec::default()
            },
            donation_count: self.donations,
            recurring_ratio: self.recurring_ratio,
            batch_size: self.batch_size,
            seed: self.seed,
            reset: self.reset,
            ..SeedConfig::default()
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = SeedArgs::parse();

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
                eprintln!("{}", SeedArgs::command().render_usage());
            }
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(args: &SeedArgs) -> AppResult<SeedReport> {
    let config = args.seed_config();
    config.validate()?;

    let mut generator = Generator::new(config.seed_or_clock(), Utc::now());
    info!("Random seed: {}", generator.seed());

    if args.dry_run {
        info!("Dry run: rows are generated and verified in memory only");
        let mut sink = MemorySink::new(config.batch_size);
        let outcome = seed_simple(&mut generator, &mut sink, &config).await;
        return finish_run(&mut sink, outcome).await;
    }

    let database = DatabaseConfig::resolve(args.database_url.clone())?;
    let pool = database.connect().await?;
    let result = seed_database(&pool, &mut generator, &config).await;
    pool.close().await;
    result
}

async fn seed_database(
    pool: &PgPool,
    generator: &mut Generator,
    config: &SeedConfig,
) -> AppResult<SeedReport> {
    let mut sink = PostgresSink::begin(pool, config.batch_size).await?;
    let outcome = seed_simple(generator, &mut sink, config).await;
    finish_run(&mut sink, outcome).await
}
