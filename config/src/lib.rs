use dashmap::DashSet;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Debug;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// numeric values
pub const RESULT_FIELDS: usize = 13;
pub const CODE_LENGTH: usize = 10;
pub const COMPARED_POSITIONS: usize = 9;
pub const STRONG_MATCH: u8 = 10;
pub const NEAR_MATCH: u8 = 9;
pub const MODERATE_MATCH: u8 = 8;

// absence marker emitted by the external predictor
pub const NO_PREDICTION: &str = "N/A";

// file names
pub const PREDICTIONS: &str = "predictions.tsv";
pub const RECORDS: &str = "records.json";
pub const STRUCTURES: &str = "structures.tsv";
pub const SVM_OUTPUT: &str = "svm_output.txt";

// assets
pub const ASSETS: &str = "assets";
pub const LABELED_SIGS_DB: &str = "labeled_sigs";
pub const SMILES_DB: &str = "aa_smiles.txt";

// monomer tokens with a fixed meaning to the assembler
pub const UNKNOWN_MONOMER: &str = "x";
pub const POLYKETIDE_STARTER: &str = "pk";
pub const MALONYL: &str = "mal";
pub const CC_MALONYL: &str = "ccmal";
pub const PKS_START1: &str = "pks-start1";
pub const PKS_END1: &str = "pks-end1";
pub const PKS_END2: &str = "pks-end2";

// unbonded carboxylic-acid terminus of a structure fragment
pub const CARBOXYL_TERMINUS: &str = "C(=O)O";

// os
#[cfg(not(windows))]
const TICK_SETTINGS: (&str, u64) = ("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ", 80);
#[cfg(windows)]
const TICK_SETTINGS: (&str, u64) = (r"+-x| ", 200);

/// return a pre-configured progress bar
pub fn get_progress_bar(length: u64, msg: &str) -> ProgressBar {
    let progressbar_style = ProgressStyle::default_spinner()
        .tick_chars(TICK_SETTINGS.0)
        .template(" {spinner} {msg:<30} {wide_bar} ETA {eta_precise} ")
        .expect("no template error");

    let progress_bar = ProgressBar::new(length);

    progress_bar.set_style(progressbar_style);
    progress_bar.enable_steady_tick(Duration::from_millis(TICK_SETTINGS.1));
    progress_bar.set_message(msg.to_owned());

    progress_bar
}

/// read a whole file into a String
pub fn reader<P: AsRef<Path> + Debug>(file: P) -> Result<String, PredictionError> {
    let mut file = File::open(file)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

/// write a DashSet to a file
pub fn write_objs<T, P>(data: &DashSet<T>, fname: P)
where
    T: AsRef<str> + Sync + Send + Eq + std::hash::Hash,
    P: AsRef<Path> + Debug,
{
    log::info!("Records in {:?}: {:?}. Writing...", fname, data.len());
    let f = match File::create(fname) {
        Ok(f) => f,
        Err(e) => panic!("Error creating file: {}", e),
    };
    let mut writer = BufWriter::new(f);

    for line in data.iter() {
        writeln!(writer, "{}", line.as_ref()).unwrap_or_else(|e| {
            panic!("Error writing to file: {}", e);
        });
    }
}

/// write any collection to a file
pub fn write_collection<P: AsRef<Path> + Debug>(data: &Vec<String>, fname: P) {
    log::info!("Records in {:?}: {:?}. Writing...", fname, data.len());
    let f = match File::create(fname) {
        Ok(f) => f,
        Err(e) => panic!("Error creating file: {}", e),
    };
    let mut writer = BufWriter::new(f);

    for line in data.iter() {
        writeln!(writer, "{}", line).unwrap_or_else(|e| {
            panic!("Error writing to file: {}", e);
        });
    }
}

/// argument checker for all subcommands
pub trait ArgCheck {
    fn check(&self) -> Result<(), CliError> {
        self.validate_args()
    }

    fn validate_args(&self) -> Result<(), CliError> {
        let inputs = self.get_inputs();

        if inputs.is_empty() {
            let err = "No input files provided".to_string();
            return Err(CliError::InvalidInput(err));
        }
        for input in inputs {
            validate(input)?;
        }

        Ok(())
    }

    fn get_inputs(&self) -> Vec<&PathBuf>;
}

/// error handling for CLI
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// errors raised while loading reference data or interpreting predictor output
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    #[error("External predictor failed: {0}")]
    ToolExecutionFailure(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// argument validation
pub fn validate(arg: &PathBuf) -> Result<(), CliError> {
    if !arg.exists() {
        return Err(CliError::InvalidInput(format!("{:?} does not exist", arg)));
    }

    if !arg.is_file() {
        return Err(CliError::InvalidInput(format!("{:?} is not a file", arg)));
    }

    match std::fs::metadata(arg) {
        Ok(metadata) if metadata.len() == 0 => {
            Err(CliError::InvalidInput(format!("file {:?} is empty", arg)))
        }
        Ok(_) => Ok(()),
        Err(e) => Err(CliError::IoError(e)),
    }
}
