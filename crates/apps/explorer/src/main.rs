use camera::FlightConfig;
use clap::Parser;
use explorer::ExplorerError;
use explorer::commands::{fly, suggest};
use explorer::config::{Cli, Command};
use explorer::flythrough::HeadlessDriver;
use search::SearchSession;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = real_main(Cli::parse()).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn real_main(cli: Cli) -> Result<(), ExplorerError> {
    let frame_ms = cli.frame_interval_ms()?;
    let catalog = cli.load_catalog().await?;
    let (mut session, mut selected) =
        SearchSession::new(catalog, cli.predictor(), cli.session_config());

    match &cli.command {
        Command::Search { text } => {
            let rows = suggest(&mut session, text).await;
            if rows.is_empty() {
                return Err(ExplorerError::NoMatch(text.clone()));
            }
            for row in rows {
                let lane = if row.remote { "remote" } else { "local" };
                println!("{}\t{lane}\t{}", row.index, row.label);
            }
        }
        Command::Fly { text, pick } => {
            let mut driver = HeadlessDriver::new(FlightConfig::default(), frame_ms);
            let report = fly(&mut session, &mut selected, &mut driver, text, *pick).await?;
            for phase in &report.phases {
                println!("{}\t{:.0} ms", phase.name, phase.started_ms);
            }
            println!(
                "landed on {} after {:.0} ms ({} frames): lat {:.4}, lng {:.4}, altitude {:.2}",
                report.destination.name,
                report.duration_ms,
                report.frames,
                report.final_pose.lat,
                report.final_pose.lng,
                report.final_pose.altitude
            );
            driver.run_until_idle();
        }
    }

    session.stop();
    Ok(())
}
