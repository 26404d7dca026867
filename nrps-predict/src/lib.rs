use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

pub mod cli;
pub mod core;
pub mod record;
pub mod utils;

pub fn lib_nrps_predict(args: Vec<String>) -> Result<PathBuf> {
    let args = cli::Args::parse_from(std::iter::once("nrps-predict".to_string()).chain(args));
    let outdir = core::run_predictions(args);

    return outdir;
}
