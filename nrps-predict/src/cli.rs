use clap::Parser;
use config::ArgCheck;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about = "Substrate specificity prediction for NRPS adenylation domains", long_about = None)]
pub struct Args {
    #[arg(
        short = 'i',
        long = "input",
        required = false,
        value_name = "PATH",
        num_args = 1,
        help = "Path to an existing predictor result file (TSV with header)"
    )]
    pub input: Option<PathBuf>,

    #[arg(
        short = 's',
        long = "signatures",
        required = false,
        value_name = "PATH",
        num_args = 1,
        help = "Path to an A-domain signatures file; runs the external predictor over it"
    )]
    pub signatures: Option<PathBuf>,

    #[arg(
        long = "tool",
        required = false,
        value_name = "CMD",
        default_value = "java",
        help = "External predictor command [used with --signatures]"
    )]
    pub tool: String,

    #[arg(
        long = "tool-args",
        required = false,
        value_name = "ARGS",
        value_delimiter = ' ',
        num_args = 0..,
        help = "Extra arguments handed to the external predictor before -i/-r"
    )]
    pub tool_args: Vec<String>,

    #[arg(
        short = 'c',
        long = "codes",
        required = false,
        value_name = "PATH",
        num_args = 1,
        help = "Path to the labeled reference codes [defaults to the bundled assets]"
    )]
    pub codes: Option<PathBuf>,

    #[arg(
        short = 'o',
        long = "outdir",
        required = false,
        value_name = "DIR",
        default_value = ".",
        help = "Output directory for predictions.tsv and records.json"
    )]
    pub outdir: PathBuf,

    #[arg(
        short = 't',
        long = "threads",
        help = "Number of threads",
        value_name = "THREADS",
        default_value_t = num_cpus::get()
    )]
    pub threads: usize,
}

impl ArgCheck for Args {
    fn get_inputs(&self) -> Vec<&PathBuf> {
        self.input.iter().chain(self.signatures.iter()).collect()
    }
}
