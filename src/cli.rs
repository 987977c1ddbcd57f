use clap::Parser;
use std::path::PathBuf;

/// Browse album folders on a static HTTP server and play them in the terminal.
#[derive(Parser, Debug)]
#[command(name = "folio", version, about)]
pub struct Args {
    /// Catalog root URL (overrides `catalog.root_url`)
    #[arg(value_name = "ROOT_URL")]
    pub root: Option<String>,

    /// Album folder to cue on start (overrides `catalog.default_album`)
    #[arg(short, long)]
    pub album: Option<String>,

    /// Config file (overrides `FOLIO_CONFIG_PATH`)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
