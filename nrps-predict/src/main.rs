//! Substrate specificity prediction for NRPS adenylation domains
//!
//! This tool reconciles two independent, imperfect signals about what
//! monomer an adenylation domain activates: the nearest known Stachelhaus
//! code (a ten-residue binding-pocket fingerprint) and the multi-class
//! predictions of an external SVM. The two are merged through a fixed
//! decision hierarchy that trusts the code match more the closer it gets
//! to exact, and falls back to the SVM tiers otherwise. Results are
//! written as a per-domain report plus a lossless JSON record dump for
//! downstream consumers.

use clap::{self, Parser};
use config::ArgCheck;
use log::{error, info, Level};
use simple_logger::init_with_level;

use nrps_predict::cli::Args;
use nrps_predict::core::run_predictions;

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

    run_predictions(args).unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    let elapsed = start.elapsed();
    info!("Elapsed time: {:.3?}", elapsed);
}
