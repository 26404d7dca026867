use clap::Parser;
use config::ArgCheck;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about = "Monomer-chain to SMILES assembly for predicted NRPS/PKS products", long_about = None)]
pub struct Args {
    #[arg(
        short = 'p',
        long = "prediction",
        required = false,
        value_name = "STRING",
        num_args = 1,
        help = "A single compound-level prediction, e.g. '(ser - thr) + (gly)'"
    )]
    pub prediction: Option<String>,

    #[arg(
        short = 'i',
        long = "input",
        required = false,
        value_name = "PATH",
        num_args = 1,
        help = "Path to a TSV of compound predictions [<name>\\t<prediction> per line]"
    )]
    pub input: Option<PathBuf>,

    #[arg(
        short = 'm',
        long = "monomers",
        required = false,
        value_name = "PATH",
        num_args = 1,
        help = "Path to the monomer structure dictionary [defaults to the bundled assets]"
    )]
    pub monomers: Option<PathBuf>,

    #[arg(
        short = 'o',
        long = "outdir",
        required = false,
        value_name = "DIR",
        default_value = ".",
        help = "Output directory for structures.tsv"
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
    fn check(&self) -> Result<(), config::CliError> {
        // an inline prediction needs no file validation
        if self.prediction.is_some() {
            return Ok(());
        }
        self.validate_args()
    }

    fn get_inputs(&self) -> Vec<&PathBuf> {
        self.input.iter().collect()
    }
}
