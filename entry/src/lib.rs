use anyhow::Result;
use log::{info, warn};

use config::{reader, write_collection, PREDICTIONS, STRUCTURES};
use nrps_predict::lib_nrps_predict;
use nrps_smiles::core::assemble;
use nrps_smiles::utils::{default_smiles_db, load_monomers};

/// Full pipeline: classify every adenylation domain, chain each domain's top
/// candidate monomer into a compound-level prediction and assemble its
/// structure string. Arguments are forwarded to the prediction step.
pub fn lib(args: Vec<String>) -> Result<()> {
    let outdir = lib_nrps_predict(args)?;

    let predictions = reader(outdir.join(PREDICTIONS))?;
    let mut domains: Vec<(String, String)> = Vec::new();

    for line in predictions.lines() {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 6 {
            warn!("Skipping malformed prediction line: {}", line);
            continue;
        }

        match fields[5].split(',').next().filter(|top| !top.is_empty()) {
            Some(top) => domains.push((fields[0].to_string(), top.to_string())),
            None => warn!("No candidate monomer for {}", fields[0]),
        }
    }

    // domain names carry the module order, so sorting fixes the chain
    domains.sort();

    let compound = domains
        .iter()
        .map(|(_, monomer)| monomer.as_str())
        .collect::<Vec<_>>()
        .join(" + ");
    info!("Compound-level prediction: {}", compound);

    let monomers = load_monomers(default_smiles_db())?;
    let smiles = assemble(&compound, &monomers);

    write_collection(
        &vec![format!("nrps_product\t{}\t{}", compound, smiles)],
        outdir.join(STRUCTURES),
    );

    Ok(())
}
