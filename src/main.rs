use std::io::Write;
use std::process::ExitCode;
use clap::Parser;
use log::{info, error};
use pubsub_provision::cli::{run, Cli};

fn init_logger() {
    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}:{}] {} - {}",
                buf.timestamp_millis(),
                record.module_path().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.level(),
                record.args()
            )
        })
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the command output
    init_logger();

    let cli = Cli::parse();
    info!("pubsub-provision starting: {:?}", cli.command);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ {}", e.report());
            ExitCode::FAILURE
        }
    }
}
