use std::collections::BTreeSet;

use serde::Deserialize;

use clinic_common::mcp_api::{DoctorMatch, DoctorSummary};

pub type DoctorId = String;

/// A roster entry as stored by the admin side: symptoms and timings are
/// free-text fields (comma-separated and newline-separated respectively).
#[derive(Debug, Clone, Deserialize)]
pub struct DoctorEntry {
    pub id: EntryId,
    pub name: String,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub symptoms: String,
    #[serde(default)]
    pub timings: String,
}

/// Exported rosters carry either numeric database keys or string ids.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EntryId {
    Number(u64),
    Text(String),
}

impl From<EntryId> for DoctorId {
    fn from(id: EntryId) -> Self {
        match id {
            EntryId::Number(n) => n.to_string(),
            EntryId::Text(s) => s,
        }
    }
}

/// A doctor with symptoms and timings parsed into typed fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DoctorRecord {
    pub id: DoctorId,
    pub name: String,
    pub specialization: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    /// Lowercase, trimmed, non-empty.
    pub symptoms: BTreeSet<String>,
    pub timings: Vec<String>,
}

impl DoctorRecord {
    pub fn from_entry(entry: DoctorEntry) -> Self {
        Self {
            id: entry.id.into(),
            name: entry.name,
            specialization: non_blank(entry.specialization),
            address: non_blank(entry.address),
            phone: non_blank(entry.phone),
            symptoms: parse_symptoms(&entry.symptoms),
            timings: parse_timings(&entry.timings),
        }
    }

    pub fn summary(&self) -> DoctorSummary {
        DoctorSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            specialization: self.specialization.clone(),
            symptoms: self.symptoms.iter().cloned().collect(),
            timings: self.timings.clone(),
        }
    }
}

impl From<DoctorEntry> for DoctorRecord {
    fn from(entry: DoctorEntry) -> Self {
        Self::from_entry(entry)
    }
}

/// Split a comma-separated symptom field. Empty pieces are ignored.
pub fn parse_symptoms(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Split a newline-separated timing field, keeping line order. Blank lines are
/// ignored.
pub fn parse_timings(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// One ranked doctor: the symptom strings any candidate token hit, and the
/// count of them.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult<'a> {
    pub doctor: &'a DoctorRecord,
    pub matched_symptoms: BTreeSet<String>,
}

impl MatchResult<'_> {
    pub fn score(&self) -> usize {
        self.matched_symptoms.len()
    }

    pub fn to_api(&self) -> DoctorMatch {
        let doctor = self.doctor;
        DoctorMatch {
            id: doctor.id.clone(),
            name: doctor.name.clone(),
            specialization: doctor.specialization.clone(),
            address: doctor.address.clone(),
            phone: doctor.phone.clone(),
            timings: doctor.timings.clone(),
            matched_symptoms: self.matched_symptoms.iter().cloned().collect(),
            match_count: self.score(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(symptoms: &str, timings: &str) -> DoctorEntry {
        DoctorEntry {
            id: EntryId::Number(7),
            name: "Dr. Ayesha".to_string(),
            specialization: Some("General Physician".to_string()),
            address: Some("  ".to_string()),
            phone: None,
            symptoms: symptoms.to_string(),
            timings: timings.to_string(),
        }
    }

    #[test]
    fn symptoms_are_trimmed_lowercased_and_deduplicated() {
        let record = DoctorRecord::from_entry(entry(" Fever, cough,,HEADACHE ,fever, ", ""));
        let symptoms: Vec<&str> = record.symptoms.iter().map(String::as_str).collect();
        assert_eq!(symptoms, vec!["cough", "fever", "headache"]);
    }

    #[test]
    fn timings_keep_order_and_skip_blank_lines() {
        let record = DoctorRecord::from_entry(entry("fever", "Mon 9-5\n\n  Wed 2-6  \r\n"));
        assert_eq!(record.timings, vec!["Mon 9-5", "Wed 2-6"]);
    }

    #[test]
    fn blank_optionals_become_none() {
        let record = DoctorRecord::from_entry(entry("", ""));
        assert_eq!(record.id, "7");
        assert_eq!(record.specialization.as_deref(), Some("General Physician"));
        assert!(record.address.is_none());
        assert!(record.phone.is_none());
        assert!(record.symptoms.is_empty());
        assert!(record.timings.is_empty());
    }

    #[test]
    fn match_result_exposes_sorted_symptoms_and_count() {
        let record = DoctorRecord::from_entry(entry("fever,cough", "Mon 9-5"));
        let result = MatchResult {
            doctor: &record,
            matched_symptoms: ["fever", "cough"].iter().map(|s| s.to_string()).collect(),
        };
        let api = result.to_api();
        assert_eq!(api.matched_symptoms, vec!["cough", "fever"]);
        assert_eq!(api.match_count, 2);
        assert_eq!(api.timings, vec!["Mon 9-5"]);
    }
}
