mod recent;
mod serve;

use clap::{Arg, Command};
use tokio_util::sync::CancellationToken;

use imgstash::{config, Config};

pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cancel = CancellationToken::new();

    let matches = cmd().get_matches();

    // Without an explicit path the default config file is optional and
    // environment variables still apply.
    let mut config: Config = match matches.get_one::<String>("config") {
        Some(path) => config::load_from(path)?,
        None => config::load()?,
    };

    if let Some(level) = matches.get_one::<String>("verbosity") {
        config.tracing.level = level.parse()?;
    }

    match matches.subcommand() {
        Some(("serve", m)) => serve::run(m, config, cancel.clone()).await?,
        Some(("recent", m)) => recent::run(m, &config).await?,
        _ => unreachable!("subcommand is required"),
    }

    Ok(())
}

pub fn cmd() -> Command {
    Command::new("imgstash")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .infer_subcommands(true)
        .version(VERSION)
        .about("Download remote images on request and keep a log of them")
        .subcommand(serve::cmd())
        .subcommand(recent::cmd())
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("PATH")
                .global(true)
                .help("Path to the config file"),
        )
        .arg(
            Arg::new("verbosity")
                .long("verbosity")
                .short('v')
                .display_order(100)
                .value_name("level")
                .value_parser(["trace", "debug", "info", "warn", "error", "none"])
                .global(true)
                .help("Set the verbosity of the log output"),
        )
}
