use hashbrown::HashMap;
use log::info;

use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::process::Command;

use config::{
    reader, PredictionError, ASSETS, CODE_LENGTH, COMPARED_POSITIONS, LABELED_SIGS_DB,
};

/// predicted label -> known Stachelhaus codes, in file order without repeats
pub type KnownCodeMap = HashMap<String, Vec<String>>;

/// Scores a query code against each candidate over the first nine positions,
/// case-insensitively, plus a fixed tenth column that always counts. The
/// first strictly best candidate wins, so ties keep file order.
///
/// The returned annotation renders the query's own characters and lowercases
/// every position that did not match; with no candidates the whole query is
/// lowercased and the count is zero.
pub fn best_code_match(query: &str, candidates: &[String]) -> (u8, String) {
    let query_chars: Vec<char> = query.chars().collect();

    let mut best_count = 0u8;
    let mut best_annotation = query.to_lowercase();

    for candidate in candidates {
        let mut matches: Vec<bool> = query_chars
            .iter()
            .zip(candidate.chars())
            .take(COMPARED_POSITIONS)
            .map(|(a, b)| a.eq_ignore_ascii_case(&b))
            .collect();
        // the trailing column is structurally conserved and always counted
        matches.push(true);

        let count = matches.iter().filter(|matched| **matched).count() as u8;

        if count > best_count {
            best_count = count;
            best_annotation = query_chars
                .iter()
                .zip(matches.iter())
                .map(|(c, matched)| if *matched { *c } else { c.to_ascii_lowercase() })
                .collect();
        }
    }

    (best_count, best_annotation)
}

/// Maps predictor amino acid nomenclature to NORINE; unknown labels pass
/// through unchanged.
pub fn to_norine(name: &str) -> &str {
    match name {
        "bht" => "bOH-Tyr",
        "dhb" => "diOH-Bz",
        "iva" => "Ival",
        "pip" => "Hpr",
        "sal" => "diOH-Bz",
        "nrp" => "X",
        "dpg" => "Cl2-Hpg",
        "ala-b" | "b-ala" | "beta-ala" => "bAla",
        "ala-d" => "D-Ala",
        "allo-thr" => "aThr",
        "hiv-d" => "D-Hiv",
        // the predictor's data carries "alle" as a typo for allo-Ile
        "alle" | "alloile" => "aIle",
        "hmp-d" => "D-Hmp",
        "3-me-glu" => "3Me-Glu",
        "lys-b" => "bLys",
        _ => name,
    }
}

/// Parses the labeled reference codes shipped with the external predictor.
///
/// Lines hold `<label> <angstrom-code> <code>`, whitespace-separated, where
/// the label itself may contain spaces; parsing is anchored on the right.
/// Codes must be exactly ten characters.
pub fn parse_known_codes(contents: &str) -> Result<KnownCodeMap, PredictionError> {
    let mut codes = KnownCodeMap::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            return Err(PredictionError::MalformedInput(format!(
                "reference line needs a label, an angstrom code and a code: {}",
                line
            )));
        }

        let code = fields[fields.len() - 1];
        if code.chars().count() != CODE_LENGTH {
            return Err(PredictionError::MalformedInput(format!(
                "reference code {} is not {} characters long",
                code, CODE_LENGTH
            )));
        }

        let label = fields[..fields.len() - 2].join(" ");
        let entry = codes.entry(label).or_insert_with(Vec::new);
        if !entry.iter().any(|known| known == code) {
            entry.push(code.to_string());
        }
    }

    Ok(codes)
}

pub fn load_known_codes<P: AsRef<Path> + Debug>(path: P) -> Result<KnownCodeMap, PredictionError> {
    let contents = reader(path)?;
    parse_known_codes(&contents)
}

/// Reads a predictor result file, dropping the header line.
pub fn read_results<P: AsRef<Path> + Debug>(path: P) -> Result<Vec<String>, PredictionError> {
    let contents = reader(path)?;
    Ok(contents.lines().skip(1).map(str::to_string).collect())
}

/// Runs the external SVM predictor synchronously over a signatures file and
/// returns its header-stripped result lines. The tool is handed the input
/// and result paths through its `-i`/`-r` interface; a non-success exit is
/// surfaced as a single terminal error with the captured diagnostics.
pub fn run_predictor(
    tool: &str,
    tool_args: &[String],
    signatures: &Path,
    results: &Path,
) -> Result<Vec<String>, PredictionError> {
    info!("Running external predictor: {}", tool);

    let output = Command::new(tool)
        .args(tool_args)
        .arg("-i")
        .arg(signatures)
        .arg("-r")
        .arg(results)
        .output()?;

    if !output.status.success() {
        return Err(PredictionError::ToolExecutionFailure(
            String::from_utf8_lossy(&output.stderr).into_owned(),
        ));
    }

    read_results(results)
}

/// Default location of the labeled reference codes, resolved the same way
/// whether the tool runs from the workspace root or the crate directory.
pub fn default_codes_db() -> PathBuf {
    let mut assets = std::env::current_dir().expect("ERROR: Failed to get working directory");

    if !assets.ends_with("nrps-predict") {
        let rest = PathBuf::from("nrps-predict").join(ASSETS);
        assets.push(rest);
    } else {
        assets = assets.join(ASSETS);
    }

    assets.join(LABELED_SIGS_DB)
}
