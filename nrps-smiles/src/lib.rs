use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

pub mod cli;
pub mod core;
pub mod utils;

pub fn lib_nrps_smiles(args: Vec<String>) -> Result<PathBuf> {
    let args = cli::Args::parse_from(std::iter::once("nrps-smiles".to_string()).chain(args));
    let outdir = core::run_assembly(args);

    return outdir;
}
