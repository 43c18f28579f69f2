//! Command line front end: argument parsing and dispatch to the operations.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use log::{info, warn};
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::pubsub::config::ClientConfig;
use crate::pubsub::provision::create_topics_and_subscriptions;
use crate::pubsub::publisher::{parse_attributes, publish};
use crate::pubsub::receiver::{receive, ReceiveOptions};
use crate::pubsub::reset::reset;
use crate::pubsub::connect;

/// Provision and exercise Pub/Sub topics and subscriptions for integration tests
#[derive(Parser, Debug)]
#[command(name = "pubsub-provision", version, about, long_about = None)]
pub struct Cli {
    /// Client settings file (TOML)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Service base URL; overrides PUBSUB_EMULATOR_HOST and the config file
    #[arg(short = 'e', long = "endpoint", global = true)]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Create topics and subscriptions from a JSON description
    Create {
        #[arg(env = "PUBSUB_PROJECT_ID")]
        project_id: String,
        /// e.g. [{"name": "my-topic", "subscriptions": ["my-subscription"]}]
        #[arg(env = "PUBSUB_CONFIG")]
        json_config: String,
    },
    /// Publish a single UTF-8 message and print its id
    Publish {
        project_id: String,
        topic_id: String,
        data: String,
        /// Message attribute as key=value (repeatable)
        #[arg(short = 'a', long = "attribute")]
        attributes: Vec<String>,
    },
    /// Receive and acknowledge messages on a subscription
    Receive {
        project_id: String,
        subscription_id: String,
        /// Stop listening after this many seconds
        #[arg(short = 't', long = "timeout", value_parser = parse_seconds)]
        timeout: Option<Duration>,
        /// Stop after this many messages
        #[arg(short = 'n', long = "max-messages")]
        max_messages: Option<usize>,
    },
    /// Seek a subscription to now, discarding older messages
    Reset {
        project_id: String,
        subscription_id: String,
    },
}

fn parse_seconds(value: &str) -> std::result::Result<Duration, String> {
    let seconds: f64 = value.parse().map_err(|e| format!("'{}' is not a number: {}", value, e))?;
    Duration::try_from_secs_f64(seconds).map_err(|e| format!("'{}' is not a valid timeout: {}", value, e))
}

/// Runs one command against the configured service
pub async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => {
            let config = ClientConfig::from_toml_file(path)?;
            info!("Configuration loaded from {}", path.display());
            config
        }
        None => ClientConfig::default(),
    };

    let api = connect(&config, cli.endpoint.as_deref())?;
    let mut out = std::io::stdout();

    match cli.command {
        Command::Create { project_id, json_config } => {
            create_topics_and_subscriptions(&api, &mut out, &project_id, &json_config).await?;
        }
        Command::Publish { project_id, topic_id, data, attributes } => {
            let attributes = parse_attributes(&attributes)?;
            publish(&api, &mut out, &project_id, &topic_id, &data, &attributes).await?;
        }
        Command::Receive { project_id, subscription_id, timeout, max_messages } => {
            let cancel = CancellationToken::new();
            let interrupt = cancel.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = interrupt.cancelled() => {}
                    res = tokio::signal::ctrl_c() => {
                        if let Err(e) = res {
                            warn!("Failed to listen for Ctrl-C: {}", e);
                        } else {
                            info!("Interrupted");
                        }
                        interrupt.cancel();
                    }
                }
            });

            let options = ReceiveOptions {
                timeout,
                max_messages,
                batch_size: config.pull_max_messages,
            };
            let result = receive(&api, &mut out, &project_id, &subscription_id, options, cancel.clone(), |message| {
                println!("Received message: {}", message);
            })
            .await;
            cancel.cancel();

            let count = result?;
            info!("Received {} message(s)", count);
        }
        Command::Reset { project_id, subscription_id } => {
            let time = reset(&api, &project_id, &subscription_id).await?;
            println!("Subscription reset to {}", time);
        }
    }

    Ok(())
}
