/// nrpstools: substrate specificity and product structure prediction
///
/// This is the entry point for the nrpstools CLI.
/// It is responsible for parsing the CLI arguments
/// and executing the appropriate subcommand.
///
/// This wrapper offers 3 different subcommands:
/// - nrps-predict
/// - nrps-smiles
/// - run
///
/// nrps-predict reconciles the nearest-Stachelhaus-code match with the
/// external SVM predictions into a ranked list of candidate monomers per
/// adenylation domain. nrps-smiles turns compound-level monomer chains
/// into best-effort SMILES strings. run chains the two: each domain's top
/// candidate becomes one monomer of the assembled product.
///
/// To get help on the subcommands, you can run:
///
/// ```shell
/// nrpstools nrps-predict -- --help
/// ```
///
use clap::{Args, Parser, Subcommand};
use log::{error, Level};
use simple_logger::init_with_level;

use nrps_predict::lib_nrps_predict;
use nrps_smiles::lib_nrps_smiles;
use nrpstools::lib;

const HELP: &str = r#"
Usage: nrpstools run --input <PATH> [--codes <PATH>] [--outdir <DIR>]

 Options:
  --input <PATH>              Path to the external predictor result file
  --signatures <PATH>         Path to an A-domain signatures file [runs the external predictor]
  --codes <PATH>              Path to the labeled reference codes
  --outdir <DIR>              Output directory for the prediction and structure results
  -h, --help                  Print help
"#;

#[derive(Parser)]
#[command(name = "nrpstools")]
#[command(about = "nrpstools: substrate specificity and product structure prediction")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "nrps-predict")]
    Predict(ToolArgs),
    #[command(name = "nrps-smiles")]
    Smiles(ToolArgs),
    #[command(name = "run")]
    Run(ToolArgs),
}

#[derive(Args)]
struct ToolArgs {
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, help = HELP)]
    args: Vec<String>,
}

fn main() {
    init_with_level(Level::Info).unwrap();
    let cli = Cli::parse();

    init();

    let result = match cli.command {
        Commands::Predict(args) => lib_nrps_predict(args.args).map(|_| ()),
        Commands::Smiles(args) => lib_nrps_smiles(args.args).map(|_| ()),
        Commands::Run(args) => lib(args.args),
    };

    result.unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });
}

fn init() {
    let message = format!(
        r#"

        nrpstools: substrate specificity and product structure
        prediction for NRPS/PKS clusters

        this is the entry point for the nrpstools CLI
        and it is responsible for parsing the CLI arguments
        for each tool:

        - nrps-predict
        - nrps-smiles
        - run

        > version: {}

        for any bug, please open an issue on the repository.

        * to get help on the subcommands, run:
            nrpstools <SUBCOMMAND> -- --help

        "#,
        env!("CARGO_PKG_VERSION")
    );

    println!("{}", message);
}
