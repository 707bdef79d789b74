use doctor_finder::model::{DoctorEntry, DoctorRecord, EntryId};
use doctor_finder::{extract_tokens, rank_doctors};

fn doctor(id: u64, name: &str, symptoms: &str) -> DoctorRecord {
    DoctorRecord::from_entry(DoctorEntry {
        id: EntryId::Number(id),
        name: name.to_string(),
        specialization: None,
        address: None,
        phone: None,
        symptoms: symptoms.to_string(),
        timings: String::new(),
    })
}

#[test]
fn fever_and_cough_matches_two_symptoms() {
    let roster = vec![doctor(1, "Dr. Ayesha", "fever,cough,headache")];
    let tokens = extract_tokens("I have a fever and cough");
    for expected in ["fever", "cough", "fever and", "and cough"] {
        assert!(tokens.iter().any(|t| t == expected), "missing {expected}");
    }

    let ranked = rank_doctors(&tokens, &roster);
    assert_eq!(ranked.len(), 1);
    let api = ranked[0].to_api();
    assert_eq!(api.name, "Dr. Ayesha");
    assert_eq!(api.matched_symptoms, vec!["cough", "fever"]);
    assert_eq!(api.match_count, 2);
}

#[test]
fn words_of_a_multi_word_symptom_count_once() {
    let roster = vec![doctor(1, "Dr. Bilal", "chest pain,breathlessness")];
    let ranked = rank_doctors(&extract_tokens("chest pain"), &roster);
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].score(), 1);
    assert_eq!(
        ranked[0].matched_symptoms.iter().collect::<Vec<_>>(),
        vec!["chest pain"]
    );
}

#[test]
fn unknown_words_match_nobody() {
    let roster = vec![
        doctor(1, "Dr. Ayesha", "fever,cough,headache"),
        doctor(2, "Dr. Bilal", "chest pain,breathlessness"),
    ];
    let tokens = extract_tokens("xyz123!!");
    assert_eq!(tokens, vec!["xyz123"]);
    assert!(rank_doctors(&tokens, &roster).is_empty());
}

#[test]
fn equal_scores_order_by_name() {
    let roster = vec![
        doctor(1, "Bilal", "fever,cough"),
        doctor(2, "Amina", "fever,cough"),
    ];
    let ranked = rank_doctors(&extract_tokens("fever and cough"), &roster);
    let names: Vec<&str> = ranked.iter().map(|r| r.doctor.name.as_str()).collect();
    assert_eq!(names, vec!["Amina", "Bilal"]);
    assert!(ranked.iter().all(|r| r.score() == 2));
}

#[test]
fn empty_message_ranks_nobody() {
    let roster: Vec<DoctorRecord> = (0..50)
        .map(|i| doctor(i, &format!("Dr. {i}"), "fever,cough"))
        .collect();
    let tokens = extract_tokens("");
    assert!(tokens.is_empty());
    assert!(rank_doctors(&tokens, &roster).is_empty());
}

#[test]
fn score_is_zero_exactly_when_absent() {
    let roster = vec![
        doctor(1, "Dr. Ayesha", "fever,cough,headache"),
        doctor(2, "Dr. Omar", "ear pain,sore throat"),
        doctor(3, "Dr. Amina", "rash,itching"),
    ];
    let tokens = extract_tokens("sore throat and a bad headache");
    let ranked = rank_doctors(&tokens, &roster);

    for record in &roster {
        let hit = ranked.iter().find(|r| r.doctor.id == record.id);
        let expected: usize = record
            .symptoms
            .iter()
            .filter(|s| tokens.iter().any(|t| t == *s || s.contains(t.as_str()) || t.contains(s.as_str())))
            .count();
        match hit {
            Some(result) => assert_eq!(result.score(), expected),
            None => assert_eq!(expected, 0),
        }
    }
    assert!(ranked.windows(2).all(|w| w[0].score() >= w[1].score()));
}
