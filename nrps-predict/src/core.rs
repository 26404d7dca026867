use anyhow::Result;
use dashmap::DashSet;
use log::info;
use rayon::prelude::*;

use std::collections::BTreeMap;
use std::path::PathBuf;

use config::{get_progress_bar, write_objs, PREDICTIONS, RECORDS, SVM_OUTPUT};

use crate::cli::Args;
use crate::record::parse_output;
use crate::utils::{default_codes_db, load_known_codes, read_results, run_predictor};

/// Classifies every adenylation domain in the predictor output and writes a
/// per-domain report plus a lossless JSON encoding of the parsed records.
pub fn run_predictions(args: Args) -> Result<PathBuf> {
    let codes_db = args.codes.clone().unwrap_or_else(default_codes_db);
    let known_codes = load_known_codes(&codes_db)?;
    info!(
        "Loaded reference codes for {} labels from {:?}",
        known_codes.len(),
        codes_db
    );

    std::fs::create_dir_all(&args.outdir)?;

    let lines = match (&args.input, &args.signatures) {
        (Some(input), _) => read_results(input)?,
        (None, Some(signatures)) => {
            let results = args.outdir.join(SVM_OUTPUT);
            run_predictor(&args.tool, &args.tool_args, signatures, &results)?
        }
        (None, None) => anyhow::bail!("no result file or signatures file provided"),
    };

    let records = parse_output(&lines, &known_codes)?;
    info!("Parsed {} domain records", records.len());

    let pb = get_progress_bar(records.len() as u64, "Classifying domains...");
    let accumulator = ParallelAccumulator::default();

    records
        .iter()
        .collect::<Vec<_>>()
        .par_iter()
        .for_each(|(name, record)| {
            accumulator.predictions.insert(record.fmt(name));
            pb.inc(1);
        });

    pb.finish_and_clear();

    write_objs(&accumulator.predictions, args.outdir.join(PREDICTIONS));

    // keyed encoding keeps the records file stable across runs
    let ordered: BTreeMap<&String, _> = records.iter().collect();
    let encoded = serde_json::to_string_pretty(&ordered)?;
    std::fs::write(args.outdir.join(RECORDS), encoded)?;

    Ok(args.outdir)
}

struct ParallelAccumulator {
    predictions: DashSet<String>,
}

impl Default for ParallelAccumulator {
    fn default() -> Self {
        Self {
            predictions: DashSet::new(),
        }
    }
}
