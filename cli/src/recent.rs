use anyhow::Result;
use clap::{value_parser, Arg, ArgMatches, Command};

use imgstash::catalog::{Catalog, JsonCatalog};
use imgstash::{record, Config};

pub fn cmd() -> Command {
    Command::new("recent")
        .about("Print the most recently saved images from the local catalog")
        .display_order(20)
        .arg(
            Arg::new("count")
                .value_parser(value_parser!(u64).range(1..))
                .default_value("10")
                .help("Maximum number of records to print"),
        )
}

pub async fn run(matches: &ArgMatches, config: &Config) -> Result<()> {
    let count = matches.get_one::<u64>("count").copied().unwrap_or(10);
    let count = usize::try_from(count).unwrap_or(usize::MAX);

    let catalog = JsonCatalog::new(config.storage.catalog_path());
    let records = record::newest_first(catalog.load().await?, count);
    println!("{}", serde_json::to_string_pretty(&records)?);

    Ok(())
}
