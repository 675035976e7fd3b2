use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use ringcheck::metrics;
use ringcheck::run_scenario;
use ringcheck::NanoidNames;
use ringcheck::Result;
use ringcheck::Settings;
use ringcheck::SimCluster;
use tracing::error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

mod cli;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_observability();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("ringcheck could not start: {}", e);
            ExitCode::from(2)
        }
    }
}

/// Runs the scenario once; `Ok(false)` means the scenario itself failed
async fn run(cli: Cli) -> Result<bool> {
    let settings = Settings::load(cli.config.as_deref())?;
    info!("settings: {:?}", settings);

    let cluster = SimCluster::new(settings.simulation.clone());
    let names = NanoidNames::new(settings.scenario.keyspace_prefix.clone());
    let print_metrics = settings.monitoring.print_metrics;

    let report = run_scenario(
        settings,
        Arc::new(cluster.clone()),
        Arc::new(cluster),
        Arc::new(names),
    )
    .await;

    println!("matrix:");
    for spec in &report.matrix {
        println!("  {spec}");
    }
    println!("transcript:");
    for line in &report.transcript {
        println!("  {line}");
    }
    if print_metrics {
        println!("{}", metrics::render());
    }

    Ok(report.passed())
}

fn init_observability() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
