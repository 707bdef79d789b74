//! Scores doctors by how many of their symptoms a message mentions.
//!
//! A candidate token matches a symptom string when they are equal or either
//! contains the other. The rule is loose on purpose: "fever" finds
//! "high fever" and "chest pain" finds "pain". It also produces false
//! positives for short tokens ("ear" matches "tear"); that is accepted
//! behavior, do not tighten it here.
use std::collections::BTreeSet;

use crate::model::{DoctorRecord, MatchResult};

pub fn symptom_matches(token: &str, symptom: &str) -> bool {
    token == symptom || symptom.contains(token) || token.contains(symptom)
}

/// Symptom strings of `doctor` hit by at least one token. `None` when nothing
/// matched.
pub fn match_doctor<'a>(tokens: &[String], doctor: &'a DoctorRecord) -> Option<MatchResult<'a>> {
    let mut matched = BTreeSet::new();
    for token in tokens {
        for symptom in &doctor.symptoms {
            if symptom_matches(token, symptom) {
                matched.insert(symptom.clone());
            }
        }
    }

    if matched.is_empty() {
        return None;
    }
    Some(MatchResult {
        doctor,
        matched_symptoms: matched,
    })
}

/// Doctors with at least one matched symptom, highest score first, then by
/// name (byte order, case-sensitive). Doctors tied on both keep roster order.
pub fn rank_doctors<'a>(tokens: &[String], doctors: &'a [DoctorRecord]) -> Vec<MatchResult<'a>> {
    let mut results: Vec<MatchResult<'a>> = doctors
        .iter()
        .filter_map(|doctor| match_doctor(tokens, doctor))
        .collect();

    results.sort_by(|a, b| {
        b.score()
            .cmp(&a.score())
            .then_with(|| a.doctor.name.cmp(&b.doctor.name))
    });
    results
}
