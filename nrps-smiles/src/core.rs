use anyhow::Result;
use dashmap::DashSet;
use log::{debug, info, warn};
use rayon::prelude::*;

use std::path::PathBuf;

use config::{
    get_progress_bar, write_objs, CARBOXYL_TERMINUS, CC_MALONYL, MALONYL, PKS_END1, PKS_END2,
    PKS_START1, POLYKETIDE_STARTER, STRUCTURES, UNKNOWN_MONOMER,
};

use crate::cli::Args;
use crate::utils::{default_smiles_db, load_monomers, read_compounds, MonomerMap};

/// Builds a best-effort SMILES string for one compound-level prediction.
///
/// The prediction is a space/parenthesis-separated monomer chain, e.g.
/// `(ser - thr) + (mal - ccmal)`. Tokens resolve through the monomer
/// dictionary (exact lowercase, then the suffix after the last dash, then
/// the generic fallback for combined monomers); unresolvable tokens are
/// skipped. Every resolved fragment except the chain terminus loses the
/// hydroxyl of its free carboxylic-acid end, modeling bond formation.
/// Never fails; the worst case is an empty or partial string.
pub fn assemble(compound: &str, monomers: &MonomerMap) -> String {
    let flat = compound
        .replace('(', "")
        .replace(')', "")
        .replace(" + ", " ")
        .replace(" - ", " ");

    let mut residues: Vec<String> = flat.split_whitespace().map(str::to_string).collect();
    if residues.is_empty() {
        return String::new();
    }

    let mal_count = residues
        .iter()
        .filter(|residue| residue.contains(MALONYL))
        .count();

    // reduction states of ketide groups start at the beta carbon of a type 1
    // polyketide, so the token after the starter collapses into the end marker
    if residues[0] == POLYKETIDE_STARTER
        && residues[residues.len() - 1].contains(MALONYL)
    {
        residues.remove(1);
        residues.push(PKS_END1.to_string());
    } else if mal_count == residues.len() {
        if residues[0] == MALONYL {
            residues[0] = PKS_START1.to_string();
        }
        if residues[residues.len() - 1] == CC_MALONYL {
            residues.push(PKS_END2.to_string());
        }
    }

    let last = residues.len() - 1;
    let mut smiles = String::new();

    for (i, monomer) in residues.iter().enumerate() {
        let lower = monomer.to_lowercase();
        let partial = lower.rsplit('-').next().unwrap_or(lower.as_str());

        let chunk = if let Some(chunk) = monomers.get(lower.as_str()) {
            chunk.as_str()
        } else if let Some(chunk) = monomers.get(partial) {
            chunk.as_str()
        } else if monomer.contains('|') {
            match monomers.get(UNKNOWN_MONOMER) {
                Some(chunk) => {
                    debug!(
                        "Substituting {:?} for combined monomer {:?}",
                        UNKNOWN_MONOMER, monomer
                    );
                    chunk.as_str()
                }
                None => continue,
            }
        } else {
            debug!("No SMILES mapping for unknown monomer {:?}", monomer);
            continue;
        };

        // trim the free hydroxyl on every chunk but the chain terminus
        if i < last && chunk.ends_with(CARBOXYL_TERMINUS) {
            smiles.push_str(&chunk[..chunk.len() - 1]);
        } else {
            smiles.push_str(chunk);
        }
    }

    smiles
}

/// Assembles a structure string for every compound prediction and writes a
/// `name\tprediction\tsmiles` report.
pub fn run_assembly(args: Args) -> Result<PathBuf> {
    let smiles_db = args.monomers.clone().unwrap_or_else(default_smiles_db);
    let monomers = load_monomers(&smiles_db)?;
    info!(
        "Loaded {} monomer structures from {:?}",
        monomers.len(),
        smiles_db
    );

    let compounds: Vec<(String, String)> = if let Some(prediction) = &args.prediction {
        vec![("compound_1".to_string(), prediction.clone())]
    } else if let Some(input) = &args.input {
        read_compounds(input)?
    } else {
        anyhow::bail!("no compound prediction or input file provided");
    };

    let pb = get_progress_bar(compounds.len() as u64, "Assembling structures...");
    let structures: DashSet<String> = DashSet::new();

    compounds.par_iter().for_each(|(name, prediction)| {
        let smiles = assemble(prediction, &monomers);

        if smiles.is_empty() {
            warn!("No structure could be assembled for {}", name);
        }
        structures.insert(format!("{}\t{}\t{}", name, prediction, smiles));

        pb.inc(1);
    });

    pb.finish_and_clear();

    std::fs::create_dir_all(&args.outdir)?;
    write_objs(&structures, args.outdir.join(STRUCTURES));

    Ok(args.outdir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::parse_monomers;

    fn monomers() -> MonomerMap {
        parse_monomers(
            "gly NCC(=O)O\n\
             ser NC(CO)C(=O)O\n\
             thr NC(C(O)C)C(=O)O\n\
             ala NC(C)C(=O)O\n\
             mal CC(=O)O\n\
             ohmal CC(O)C(=O)O\n\
             ccmal C=CC(=O)O\n\
             redmal CCC(=O)O\n\
             pk C(=O)\n\
             pks-start1 C\n\
             pks-end1 C(C)C(=O)O\n\
             pks-end2 CC(=O)O\n\
             x NC([*])C(=O)O\n",
        )
        .expect("ERROR: Could not parse monomers!")
    }

    #[test]
    fn test_empty_prediction_yields_empty_string() {
        assert_eq!(assemble("", &monomers()), "");
        assert_eq!(assemble("()", &monomers()), "");
        assert_eq!(assemble("   ", &monomers()), "");
    }

    #[test]
    fn test_single_residue_keeps_free_terminus() {
        assert_eq!(assemble("gly", &monomers()), "NCC(=O)O");
    }

    #[test]
    fn test_chain_trims_all_but_last_terminus() {
        // every fragment but the terminal one loses its trailing hydroxyl
        assert_eq!(
            assemble("(gly - ser) + (ala)", &monomers()),
            "NCC(=O)NC(CO)C(=O)NC(C)C(=O)O"
        );
    }

    #[test]
    fn test_all_malonate_chain_gets_start_and_end_markers() {
        // mal mal ccmal -> pks-start1 mal ccmal pks-end2
        let smiles = assemble("mal + mal + ccmal", &monomers());
        assert_eq!(smiles, "CCC(=O)C=CC(=O)CC(=O)O");
    }

    #[test]
    fn test_all_malonate_chain_without_cc_end_keeps_tail() {
        // mal ohmal -> pks-start1 ohmal, no end marker appended
        let smiles = assemble("mal + ohmal", &monomers());
        assert_eq!(smiles, "CCC(O)C(=O)O");
    }

    #[test]
    fn test_polyketide_starter_drops_following_token() {
        // pk ala ohmal -> pk ohmal pks-end1
        let smiles = assemble("pk + ala + ohmal", &monomers());
        assert_eq!(smiles, "C(=O)CC(O)C(=O)C(C)C(=O)O");
    }

    #[test]
    fn test_mixed_chain_is_left_untouched() {
        // a mal variant next to an amino acid triggers no pks rewriting
        let smiles = assemble("ser + mal", &monomers());
        assert_eq!(smiles, "NC(CO)C(=O)CC(=O)O");
    }

    #[test]
    fn test_dash_prefixed_token_resolves_through_suffix() {
        assert_eq!(assemble("d-ala", &monomers()), "NC(C)C(=O)O");
        assert_eq!(assemble("me-thr", &monomers()), "NC(C(O)C)C(=O)O");
    }

    #[test]
    fn test_combined_monomer_falls_back_to_generic() {
        assert_eq!(assemble("gly|ala", &monomers()), "NC([*])C(=O)O");
    }

    #[test]
    fn test_unknown_token_is_skipped() {
        assert_eq!(assemble("gly + foo + ala", &monomers()), "NCC(=O)NC(C)C(=O)O");
    }

    #[test]
    fn test_case_insensitive_lookup() {
        assert_eq!(assemble("GLY", &monomers()), "NCC(=O)O");
    }
}
