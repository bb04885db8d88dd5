//! halfbit command line: capability report and kernel self-check.

mod selfcheck;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use halfbit_core::{kernels, DispatchMode, DistanceKernels, KernelConfig};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use selfcheck::{SelfCheckOptions, SelfCheckReport};

#[derive(Parser, Debug)]
#[command(name = "halfbit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Override the configured kernel dispatch mode
    #[arg(long, global = true, value_enum)]
    dispatch: Option<DispatchArg>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show detected processor capabilities and the kernels that get bound
    Caps {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Compare every kernel against its portable implementation
    Selfcheck {
        /// Half vector dimension
        #[arg(long, default_value_t = 1027)]
        dim: usize,
        /// Bit vector length in bytes
        #[arg(long, default_value_t = 141)]
        bytes: usize,
        /// Seed for the generated vectors
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DispatchArg {
    Auto,
    Portable,
}

impl From<DispatchArg> for DispatchMode {
    fn from(arg: DispatchArg) -> Self {
        match arg {
            DispatchArg::Auto => DispatchMode::Auto,
            DispatchArg::Portable => DispatchMode::Portable,
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn caps(config: &KernelConfig, as_json: bool) -> anyhow::Result<()> {
    let detected = kernels::detect();
    let registry = DistanceKernels::new();
    registry.initialize_with(config);
    let strategies = registry.strategies()?;

    if as_json {
        let report = json!({
            "capabilities": detected,
            "dispatch": config.dispatch,
            "strategies": strategies,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{:<16}{}", "f16c", yes_no(detected.f16c));
        println!("{:<16}{}", "avx512_popcnt", yes_no(detected.avx512_popcnt));
        println!("{:<16}{:?}", "dispatch", config.dispatch);
        println!("{:<16}{}", "half kernels", strategies.half);
        println!("{:<16}{}", "bit kernels", strategies.bit);
    }
    Ok(())
}

fn print_report(report: &SelfCheckReport) {
    println!(
        "dim {} / bytes {} / seed {} (half: {}, bit: {})",
        report.dim, report.bytes, report.seed, report.strategies.half, report.strategies.bit
    );
    for c in &report.comparisons {
        println!(
            "{:<28}{:>20.6}{:>20.6}{:>12.2e}  {}",
            c.kernel,
            c.portable,
            c.dispatched,
            c.relative_difference,
            if c.passed { "ok" } else { "FAIL" }
        );
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = KernelConfig::load().context("Failed to load kernel configuration")?;
    if let Some(dispatch) = cli.dispatch {
        config.dispatch = dispatch.into();
    }
    tracing::debug!(?config, "Loaded configuration");

    match cli.command {
        Command::Caps { json } => caps(&config, json),
        Command::Selfcheck {
            dim,
            bytes,
            seed,
            json,
        } => {
            let report = selfcheck::run(SelfCheckOptions { dim, bytes, seed }, &config)
                .context("Self-check could not run")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            if !report.passed() {
                let failed: Vec<_> = report.failures().map(|c| c.kernel).collect();
                bail!("Kernels disagree with portable reference: {}", failed.join(", "));
            }
            Ok(())
        }
    }
}
