//! Pen Simulator CLI
//!
//! Run scripted scenarios against the pen engine on a virtual clock.

use clap::Parser;
use pen_core::PensConfig;
use pen_sim::scenarios::ScenarioId;
use pen_sim::{ScenarioResult, ScenarioRunner};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pen-sim")]
#[command(about = "Run headless scenarios for the pen simulation", long_about = None)]
struct Args {
    /// Master seed for determinism
    #[arg(short, long, default_value = "42")]
    seed: u64,
    
    /// Scenario to run (starvation, feast, shuttle, breeding, mixed, all)
    #[arg(short = 'S', long, default_value = "all")]
    scenario: String,
    
    /// Number of consecutive seeds to run (for CI mode)
    #[arg(long, default_value = "1")]
    seeds: u64,
    
    /// Months to simulate
    #[arg(short, long, default_value = "12")]
    months: u32,
    
    /// Frames rendered per feeding interval
    #[arg(long, default_value = "30")]
    frames: u32,
    
    /// TOML file overriding the default pens and rules
    #[arg(short, long)]
    config: Option<String>,
    
    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
    
    /// JSON output for CI parsing
    #[arg(long)]
    json: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    
    // Ignore error if already set
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    
    if !args.json {
        init_tracing(args.verbose);
        info!("Pen Simulator v0.1.0");
    }
    
    let scenarios = if args.scenario.eq_ignore_ascii_case("all") {
        ScenarioId::all()
    } else {
        match args.scenario.parse::<ScenarioId>() {
            Ok(id) => vec![id],
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        }
    };
    
    let config = match &args.config {
        Some(path) => match PensConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => PensConfig::default(),
    };
    
    let mut results: Vec<ScenarioResult> = Vec::new();
    for seed in args.seed..args.seed.saturating_add(args.seeds.max(1)) {
        let runner = ScenarioRunner::new(seed)
            .with_months(args.months)
            .with_frames_per_month(args.frames)
            .with_config(config.clone());
        
        for scenario in &scenarios {
            info!("{}: {}", scenario, scenario.description());
            match runner.run(*scenario).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    error!("Scenario {} (seed={}) aborted: {}", scenario, seed, e);
                    return ExitCode::FAILURE;
                }
            }
        }
    }
    
    let failed = results.iter().filter(|r| !r.passed).count();
    
    if args.json {
        match serde_json::to_string_pretty(&results) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("failed to encode results: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        for r in &results {
            let status = if r.passed { "PASS" } else { "FAIL" };
            println!(
                "[{}] {:<11} seed={:<6} population {:>3} -> {:<3} births={} starved={} eaten={}{}",
                status,
                r.scenario,
                r.seed,
                r.initial_population,
                r.final_population,
                r.births,
                r.starvations,
                r.eaten,
                r.failure_reason.as_deref().map(|f| format!("  ({})", f)).unwrap_or_default(),
            );
        }
        println!("{} passed, {} failed", results.len() - failed, failed);
    }
    
    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
