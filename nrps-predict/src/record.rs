use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use std::collections::BTreeSet;

use config::{
    PredictionError, MODERATE_MATCH, NEAR_MATCH, NO_PREDICTION, RESULT_FIELDS, STRONG_MATCH,
};

use crate::utils::{best_code_match, to_norine, KnownCodeMap};

/// Specificity evidence for a single adenylation domain, as reported by the
/// external SVM predictor and scored against the known Stachelhaus codes.
///
/// Records are value objects: every field is set at construction and never
/// mutated afterwards, so a finished record can be shared across threads
/// freely. The external tool's "N/A" marker is translated into an absent
/// group (`None`/empty vec) at the parse boundary and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub angstrom_code: String,
    pub physicochemical_class: Option<String>,
    pub large_cluster_pred: Vec<String>,
    pub small_cluster_pred: Vec<String>,
    pub single_amino_pred: Option<String>,
    pub stachelhaus_predictions: Vec<String>,
    pub uncertain: bool,
    pub stachelhaus_seq: String,
    pub stachelhaus_match_count: u8,
}

impl PredictionRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        angstrom_code: String,
        physicochemical_class: Option<String>,
        large_cluster_pred: Vec<String>,
        small_cluster_pred: Vec<String>,
        single_amino_pred: Option<String>,
        stachelhaus_predictions: Vec<String>,
        uncertain: bool,
        stachelhaus_seq: String,
        stachelhaus_match_count: u8,
    ) -> Result<Self, PredictionError> {
        if let Some(single) = &single_amino_pred {
            if single.contains(',') {
                return Err(PredictionError::MalformedInput(format!(
                    "single amino prediction holds a list: {}",
                    single
                )));
            }
        }

        for pred in &stachelhaus_predictions {
            if pred.contains('/') {
                return Err(PredictionError::MalformedInput(format!(
                    "unsplit Stachelhaus prediction: {}",
                    pred
                )));
            }
        }

        if stachelhaus_match_count > STRONG_MATCH {
            return Err(PredictionError::MalformedInput(format!(
                "Stachelhaus match count out of range: {}",
                stachelhaus_match_count
            )));
        }

        Ok(Self {
            angstrom_code,
            physicochemical_class,
            large_cluster_pred,
            small_cluster_pred,
            single_amino_pred,
            stachelhaus_predictions,
            uncertain,
            stachelhaus_seq,
            stachelhaus_match_count,
        })
    }

    /// Builds a record from one line of predictor output, scoring the query
    /// code against the known codes for the predicted label.
    ///
    /// Field layout of a result line:
    ///  0: sequence-id
    ///  1: 8A-signature
    ///  2: stachelhaus-code
    ///  3: 3class-pred
    ///  4: large-class-pred
    ///  5: small-class-pred
    ///  6: single-class-pred
    ///  7: nearest stachelhaus code
    ///  8: NRPS1pred-large-class-pred
    ///  9: NRPS2pred-large-class-pred
    /// 10: outside applicability domain (1 or 0)
    /// 11: coords
    /// 12: pfam-score
    ///
    /// Fields 8, 9, 11 and 12 are carried by the tool but unused here.
    pub fn from_line(
        line: &str,
        known_codes: &KnownCodeMap,
    ) -> Result<(String, Self), PredictionError> {
        let parts: Vec<&str> = line.split('\t').collect();

        if parts.len() != RESULT_FIELDS {
            return Err(PredictionError::MalformedInput(format!(
                "expected {} fields in result line, got {}: {}",
                RESULT_FIELDS,
                parts.len(),
                line
            )));
        }

        let name = parts[0].to_string();
        let query_code = parts[2];
        let reference_label = parts[7];

        let candidates = known_codes
            .get(reference_label)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let (match_count, annotated_code) = best_code_match(query_code, candidates);

        let record = Self::new(
            parts[1].to_string(),
            single(parts[3]),
            group(parts[4]),
            group(parts[5]),
            single(parts[6]),
            reference_label.split('/').map(str::to_string).collect(),
            parts[10] == "1",
            annotated_code,
            match_count,
        )?;

        Ok((name, record))
    }

    /// Candidate monomers before nomenclature normalization.
    ///
    /// The branches weigh the Stachelhaus match count against the SVM
    /// prediction tiers; higher counts shift trust from the SVM to the code
    /// match, and the uncertainty flag overrides the SVM entirely.
    ///    n   | single  small/large/physico  outside
    ///    10     stach         stach          stach
    ///     9     both          both           stach
    ///     8     svm           both           stach
    ///  <= 7     svm           svm            none
    fn shortlist(&self) -> Vec<String> {
        if self.uncertain {
            if self.stachelhaus_match_count >= MODERATE_MATCH {
                return self.stachelhaus_predictions.clone();
            }
            return Vec::new();
        }

        if self.stachelhaus_match_count == STRONG_MATCH {
            let unique: BTreeSet<&String> = self.stachelhaus_predictions.iter().collect();
            return unique.into_iter().cloned().collect();
        }

        if let Some(single) = &self.single_amino_pred {
            if self.stachelhaus_match_count == NEAR_MATCH {
                if self.stachelhaus_predictions.contains(single) {
                    return vec![single.clone()];
                }
                return Vec::new();
            }
            return vec![single.clone()];
        }

        let class_group: Vec<String> = self.physicochemical_class.iter().cloned().collect();
        let groups = [
            &self.small_cluster_pred,
            &self.large_cluster_pred,
            &class_group,
        ];

        if self.stachelhaus_match_count >= MODERATE_MATCH {
            // intersect with the tightest SVM group, keeping stach order
            for group in groups {
                if group.is_empty() {
                    continue;
                }
                let members: HashSet<&String> = group.iter().collect();
                return self
                    .stachelhaus_predictions
                    .iter()
                    .filter(|pred| members.contains(pred))
                    .cloned()
                    .collect();
            }
            return self.stachelhaus_predictions.clone();
        }

        for group in groups {
            if !group.is_empty() {
                return group.clone();
            }
        }

        Vec::new()
    }

    /// Ordered candidate monomers in NORINE nomenclature.
    pub fn classify(&self) -> Vec<String> {
        self.shortlist()
            .iter()
            .map(|pred| to_norine(pred).to_string())
            .collect()
    }

    pub fn match_qualifier(&self) -> &'static str {
        if self.stachelhaus_match_count == STRONG_MATCH {
            "strong"
        } else if self.stachelhaus_match_count >= MODERATE_MATCH {
            "moderate"
        } else {
            "weak"
        }
    }

    pub fn fmt(&self, name: &str) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            name,
            self.stachelhaus_seq,
            self.stachelhaus_match_count,
            self.match_qualifier(),
            self.uncertain as u8,
            self.classify().join(",")
        )
    }
}

fn single(field: &str) -> Option<String> {
    if field == NO_PREDICTION {
        None
    } else {
        Some(field.to_string())
    }
}

fn group(field: &str) -> Vec<String> {
    if field == NO_PREDICTION {
        Vec::new()
    } else {
        field.split(',').map(str::to_string).collect()
    }
}

/// Converts predictor output lines (header already stripped) into records
/// keyed by domain name. A repeated domain name keeps the last line seen;
/// any malformed line aborts the whole batch.
pub fn parse_output(
    lines: &[String],
    known_codes: &KnownCodeMap,
) -> Result<HashMap<String, PredictionRecord>, PredictionError> {
    let mut records = HashMap::with_capacity(lines.len());

    for line in lines {
        let (name, record) = PredictionRecord::from_line(line, known_codes)?;
        records.insert(name, record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        physicochemical_class: Option<&str>,
        large: Vec<&str>,
        small: Vec<&str>,
        single_amino: Option<&str>,
        stach: Vec<&str>,
        uncertain: bool,
        count: u8,
    ) -> PredictionRecord {
        PredictionRecord::new(
            "L--SFDASLFEMYLLTGGDRNMYGPTEATMCATW".to_string(),
            physicochemical_class.map(str::to_string),
            large.into_iter().map(str::to_string).collect(),
            small.into_iter().map(str::to_string).collect(),
            single_amino.map(str::to_string),
            stach.into_iter().map(str::to_string).collect(),
            uncertain,
            "DVWHLSLIDK".to_string(),
            count,
        )
        .expect("ERROR: Could not build record!")
    }

    #[test]
    fn test_uncertain_strong_stach_keeps_predictions() {
        let rec = record(Some("hydrophilic"), vec![], vec![], None, vec!["ser"], true, 9);
        assert_eq!(rec.classify(), vec!["ser"]);
    }

    #[test]
    fn test_uncertain_weak_stach_yields_nothing() {
        let rec = record(Some("hydrophilic"), vec![], vec![], Some("ser"), vec!["ser"], true, 5);
        assert!(rec.classify().is_empty());
    }

    #[test]
    fn test_exact_match_sorts_unique_predictions() {
        let rec = record(None, vec![], vec![], None, vec!["orn", "lys", "orn"], false, 10);
        assert_eq!(rec.classify(), vec!["lys", "orn"]);
    }

    #[test]
    fn test_single_amino_confirmed_by_near_match() {
        let rec = record(None, vec![], vec![], Some("gly"), vec!["gly"], false, 9);
        assert_eq!(rec.classify(), vec!["gly"]);
    }

    #[test]
    fn test_single_amino_contradicted_by_near_match() {
        let rec = record(None, vec![], vec![], Some("gly"), vec!["ser"], false, 9);
        assert!(rec.classify().is_empty());
    }

    #[test]
    fn test_single_amino_overrides_weak_match() {
        let rec = record(None, vec!["thr"], vec![], Some("gly"), vec!["ser"], false, 4);
        assert_eq!(rec.classify(), vec!["gly"]);
    }

    #[test]
    fn test_moderate_match_intersects_tightest_group() {
        let rec = record(
            Some("hydrophilic"),
            vec!["asp", "glu", "gln"],
            vec!["glu", "val"],
            None,
            vec!["asp", "glu"],
            false,
            8,
        );
        assert_eq!(rec.classify(), vec!["glu"]);
    }

    #[test]
    fn test_moderate_match_without_svm_groups_keeps_stach() {
        let rec = record(None, vec![], vec![], None, vec!["asp", "glu"], false, 8);
        assert_eq!(rec.classify(), vec!["asp", "glu"]);
    }

    #[test]
    fn test_weak_match_falls_back_to_first_group() {
        let rec = record(Some("hydrophobic"), vec!["thr"], vec![], None, vec!["ser"], false, 3);
        assert_eq!(rec.classify(), vec!["thr"]);
    }

    #[test]
    fn test_weak_match_without_groups_yields_nothing() {
        let rec = record(None, vec![], vec![], None, vec!["ser"], false, 3);
        assert!(rec.classify().is_empty());
    }

    #[test]
    fn test_classification_is_normalized() {
        let rec = record(None, vec![], vec![], Some("bht"), vec!["ser"], false, 4);
        assert_eq!(rec.classify(), vec!["bOH-Tyr"]);
    }

    #[test]
    fn test_match_qualifier_tiers() {
        assert_eq!(record(None, vec![], vec![], None, vec!["ser"], false, 10).match_qualifier(), "strong");
        assert_eq!(record(None, vec![], vec![], None, vec!["ser"], false, 8).match_qualifier(), "moderate");
        assert_eq!(record(None, vec![], vec![], None, vec!["ser"], false, 7).match_qualifier(), "weak");
    }

    #[test]
    fn test_single_amino_with_separator_is_rejected() {
        let result = PredictionRecord::new(
            String::new(),
            None,
            vec![],
            vec![],
            Some("gly,ala".to_string()),
            vec![],
            false,
            String::new(),
            0,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_unsplit_stach_prediction_is_rejected() {
        let result = PredictionRecord::new(
            String::new(),
            None,
            vec![],
            vec![],
            None,
            vec!["orn/lys".to_string()],
            false,
            String::new(),
            0,
        );
        assert!(result.is_err());
    }

    fn codes_for(label: &str, codes: Vec<&str>) -> KnownCodeMap {
        let mut map = KnownCodeMap::new();
        map.insert(label.to_string(), codes.into_iter().map(str::to_string).collect());
        map
    }

    fn result_line(fields: usize) -> String {
        let mut parts = vec![
            "ctg1_nrps_A1",
            "L--SFDASLFEMYLLTGGDRNMYGPTEATMCATW",
            "DVWHLSLIDK",
            "hydrophilic",
            "ser,thr",
            "ser",
            "ser",
            "ser",
            "N/A",
            "N/A",
            "0",
            "47:538",
            "3.2e-102",
        ];
        parts.truncate(fields);
        parts.join("\t")
    }

    #[test]
    fn test_from_line_parses_thirteen_fields() {
        let codes = codes_for("ser", vec!["DVWHLSLIDK"]);
        let (name, rec) = PredictionRecord::from_line(&result_line(13), &codes)
            .expect("ERROR: Could not parse line!");

        assert_eq!(name, "ctg1_nrps_A1");
        assert_eq!(rec.stachelhaus_match_count, 10);
        assert_eq!(rec.stachelhaus_seq, "DVWHLSLIDK");
        assert_eq!(rec.physicochemical_class, Some("hydrophilic".to_string()));
        assert_eq!(rec.large_cluster_pred, vec!["ser", "thr"]);
        assert_eq!(rec.small_cluster_pred, vec!["ser"]);
        assert_eq!(rec.single_amino_pred, Some("ser".to_string()));
        assert!(!rec.uncertain);
    }

    #[test]
    fn test_from_line_rejects_short_and_long_lines() {
        let codes = KnownCodeMap::new();
        assert!(PredictionRecord::from_line(&result_line(12), &codes).is_err());
        assert!(PredictionRecord::from_line(&(result_line(13) + "\textra"), &codes).is_err());
    }

    #[test]
    fn test_from_line_accepts_empty_fields() {
        let codes = KnownCodeMap::new();
        let line = "\t\t\t\t\t\t\t\t\t\t\t\t";
        assert!(PredictionRecord::from_line(line, &codes).is_ok());
    }

    #[test]
    fn test_from_line_converts_absence_markers() {
        let codes = KnownCodeMap::new();
        let line = "dom\tcode\tDVWHLSLIDK\tN/A\tN/A\tN/A\tN/A\tser\tN/A\tN/A\t1\t0:0\t0.0";
        let (_, rec) = PredictionRecord::from_line(line, &codes)
            .expect("ERROR: Could not parse line!");

        assert_eq!(rec.physicochemical_class, None);
        assert!(rec.large_cluster_pred.is_empty());
        assert!(rec.small_cluster_pred.is_empty());
        assert_eq!(rec.single_amino_pred, None);
        assert!(rec.uncertain);
        // no reference codes for "ser" in this table
        assert_eq!(rec.stachelhaus_match_count, 0);
        assert_eq!(rec.stachelhaus_seq, "dvwhlslidk");
    }

    #[test]
    fn test_parse_output_last_line_wins() {
        let codes = codes_for("ser", vec!["DVWHLSLIDK"]);
        let lines = vec![
            "dom\tac\tDVWHLSLIDK\tN/A\tN/A\tN/A\tN/A\tser\tN/A\tN/A\t0\t0:0\t0.0".to_string(),
            "dom\tac\tDVWHLSLIDK\tN/A\tN/A\tN/A\tN/A\tser\tN/A\tN/A\t1\t0:0\t0.0".to_string(),
        ];

        let records = parse_output(&lines, &codes).expect("ERROR: Could not parse output!");

        assert_eq!(records.len(), 1);
        assert!(records["dom"].uncertain);
    }

    #[test]
    fn test_parse_output_aborts_on_malformed_line() {
        let codes = KnownCodeMap::new();
        let lines = vec![
            result_line(13),
            result_line(12),
        ];
        assert!(parse_output(&lines, &codes).is_err());
    }

    #[test]
    fn test_record_round_trips_through_json() {
        let original = record(
            Some("hydrophilic"),
            vec!["asp", "glu"],
            vec![],
            None,
            vec!["glu"],
            true,
            8,
        );

        let encoded = serde_json::to_string(&original).expect("ERROR: Could not serialize!");
        let decoded: PredictionRecord =
            serde_json::from_str(&encoded).expect("ERROR: Could not deserialize!");

        assert_eq!(original, decoded);
    }

    #[test]
    fn test_empty_record_round_trips_through_json() {
        let original = record(None, vec![], vec![], None, vec![], false, 0);

        let encoded = serde_json::to_string(&original).expect("ERROR: Could not serialize!");
        let decoded: PredictionRecord =
            serde_json::from_str(&encoded).expect("ERROR: Could not deserialize!");

        assert_eq!(original, decoded);
    }
}
