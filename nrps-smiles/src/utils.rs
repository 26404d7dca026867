use hashbrown::HashMap;

use std::fmt::Debug;
use std::path::{Path, PathBuf};

use config::{reader, PredictionError, ASSETS, SMILES_DB};

/// lowercase monomer token -> structure fragment
pub type MonomerMap = HashMap<String, String>;

/// Parses the monomer dictionary: `<token> <fragment>` lines with `#`
/// comments (inline or whole-line) and blank lines ignored. Tokens are
/// stored lowercase; a case-insensitive duplicate is a load-time error.
pub fn parse_monomers(contents: &str) -> Result<MonomerMap, PredictionError> {
    let mut monomers = MonomerMap::new();

    for raw in contents.lines() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 2 {
            return Err(PredictionError::MalformedInput(format!(
                "monomer line must hold a token and a structure: {}",
                raw
            )));
        }

        let token = fields[0].to_lowercase();
        if monomers.contains_key(&token) {
            return Err(PredictionError::MalformedInput(format!(
                "monomer {} defined twice",
                fields[0]
            )));
        }

        monomers.insert(token, fields[1].to_string());
    }

    Ok(monomers)
}

pub fn load_monomers<P: AsRef<Path> + Debug>(path: P) -> Result<MonomerMap, PredictionError> {
    let contents = reader(path)?;
    parse_monomers(&contents)
}

/// Reads a compound predictions file: `<name>\t<prediction>` per line.
pub fn read_compounds<P: AsRef<Path> + Debug>(
    path: P,
) -> Result<Vec<(String, String)>, PredictionError> {
    let contents = reader(path)?;
    let mut compounds = Vec::new();

    for line in contents.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let (name, prediction) = line.split_once('\t').ok_or_else(|| {
            PredictionError::MalformedInput(format!(
                "compound line must hold a name and a prediction: {}",
                line
            ))
        })?;

        compounds.push((name.to_string(), prediction.to_string()));
    }

    Ok(compounds)
}

/// Default location of the monomer dictionary, resolved the same way
/// whether the tool runs from the workspace root or the crate directory.
pub fn default_smiles_db() -> PathBuf {
    let mut assets = std::env::current_dir().expect("ERROR: Failed to get working directory");

    if !assets.ends_with("nrps-smiles") {
        let rest = PathBuf::from("nrps-smiles").join(ASSETS);
        assets.push(rest);
    } else {
        assets = assets.join(ASSETS);
    }

    assets.join(SMILES_DB)
}
