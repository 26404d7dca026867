//! Monomer-chain to SMILES assembly for predicted NRPS/PKS products
//!
//! Takes compound-level monomer predictions, maps each monomer through a
//! static structure dictionary and concatenates the fragments into a
//! best-effort SMILES string, trimming the free carboxylic-acid hydroxyl
//! at every formed bond. Polyketide chains get their reduction-state
//! start/end markers rewritten before mapping. Assembly is symbolic only;
//! no chemical validation is attempted.

use clap::{self, Parser};
use config::ArgCheck;
use log::{error, info, Level};
use simple_logger::init_with_level;

use nrps_smiles::cli::Args;
use nrps_smiles::core::run_assembly;

fn main() {
    let start = std::time::Instant::now();
    init_with_level(Level::Info).unwrap();

    let args: Args = Args::parse();

    rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build_global()
        .unwrap();

    args.check().unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    run_assembly(args).unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    let elapsed = start.elapsed();
    info!("Elapsed time: {:.3?}", elapsed);
}
