//! Flatten the `modlist` document in the working directory into
//! `extracted_data_with_id.csv`

mod logging;

use catalog::config::{DEFAULT_EXTRACTED_CSV, DEFAULT_MODLIST_PATH};
use catalog::flatten_modlist;
use clap::Parser;
use std::path::Path;

#[derive(Parser, Debug)]
#[command(name = "flatten-modlist", version, about = "Extract Name, Description and modID from a modlist")]
struct Args {}

fn main() -> anyhow::Result<()> {
    logging::init();
    let _args = Args::parse();

    flatten_modlist(Path::new(DEFAULT_MODLIST_PATH), Path::new(DEFAULT_EXTRACTED_CSV))
        .map_err(logging::report)?;
    Ok(())
}
