mod logging;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use embed_composer::{
    config::{self, GatewayConfig},
    gateway::GatewayClient,
    session::{Command, Flow, Session},
};
use reqwest::Url;

/// Interactive composer for Discord message embeds
#[derive(Parser)]
struct Args {
    /// Base URL of the channel gateway (the API key is read from
    /// the EMBED_GATEWAY_API_KEY environment variable)
    #[arg(short, long, default_value = config::DEFAULT_BASE_URL)]
    gateway_url: Url,

    /// Seconds before a gateway request is given up on
    #[arg(short, long, default_value_t = config::DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,

    /// Start from a previously exported JSON document
    #[arg(short, long)]
    import: Option<PathBuf>,

    /// Do not talk to the gateway at all
    #[arg(long)]
    offline: bool,

    /// Log debug messages
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let gateway = if args.offline {
        None
    } else {
        connect(args.gateway_url, Duration::from_secs(args.timeout))
    };

    let online = gateway.is_some();
    let stdout = io::stdout();
    let mut session = Session::new(stdout.lock(), gateway);

    let mut startup = vec![Command::Help];
    if online {
        startup.push(Command::Channels);
    }
    if let Some(path) = args.import {
        startup.push(Command::Import(path));
    }
    startup.push(Command::List);
    for command in startup {
        if let Err(e) = session.execute(command) {
            log::error!("{e:#}");
        }
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush().context("Could not flush stdout")?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Could not read from stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        if session.handle_line(&line) == Flow::Quit {
            break;
        }
    }

    log::info!("Bye!");
    Ok(())
}

/// A missing or broken gateway configuration only disables sending.
fn connect(base_url: Url, timeout: Duration) -> Option<GatewayClient> {
    let config = match GatewayConfig::from_env(base_url, timeout) {
        Ok(Some(config)) => config,
        Ok(None) => {
            log::warn!(
                "{} is not set; channel listing and sending are disabled",
                config::API_KEY_ENV
            );
            return None;
        }
        Err(e) => {
            log::warn!("{e:#}; channel listing and sending are disabled");
            return None;
        }
    };

    match GatewayClient::new(config) {
        Ok(client) => {
            log::info!("Using channel gateway at {}", client.base_url());
            Some(client)
        }
        Err(e) => {
            log::error!("{e:#}");
            None
        }
    }
}
