use anyhow::Result;
use clap::{value_parser, Arg, ArgMatches, Command};
use tokio_util::sync::CancellationToken;

use imgstash::Config;

pub fn cmd() -> Command {
    Command::new("serve")
        .about("Run the http service")
        .display_order(10)
        .arg(
            Arg::new("port")
                .long("port")
                .short('p')
                .value_parser(value_parser!(u16))
                .help("Port to listen on, overrides config"),
        )
        .arg(
            Arg::new("storage")
                .long("storage")
                .short('s')
                .value_name("DIR")
                .help("Base storage directory, overrides config"),
        )
}

pub async fn run(matches: &ArgMatches, mut config: Config, cancel: CancellationToken) -> Result<()> {
    if let Some(port) = matches.get_one::<u16>("port") {
        config.port = *port;
    }
    if let Some(dir) = matches.get_one::<String>("storage") {
        config.storage.dir = dir.into();
    }

    // In-flight requests are allowed to finish once shutdown starts.
    let signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("Initiating graceful shutdown...");
            signal.cancel();
        }
    });

    imgstash::axum::start(config, cancel.cancelled_owned()).await?;

    Ok(())
}
