use super::common::{engine, twin_catalog, twin_rules};
use crate::workflows::routing::engine::{
    normalize, ProfileRouter, SemanticChannel, SemanticInput,
};
use crate::workflows::routing::signals::NeedTag;

fn degraded() -> SemanticInput {
    SemanticInput::Degraded("provider offline".to_string())
}

#[test]
fn normalize_folds_case_and_whitespace() {
    assert_eq!(
        normalize("  Mon   MANAGER m'envoie\ndes mails "),
        "mon manager m'envoie des mails"
    );
}

#[test]
fn keyword_hits_accumulate_per_match() {
    let decision = engine().decide(
        "Question de droit: mon contrat prévoit-il la déconnexion ?",
        &[],
        degraded(),
    );

    assert_eq!(decision.chosen_profile_id, "expert-juridique");
    let legal = decision
        .profiles
        .iter()
        .find(|profile| profile.profile_id == "expert-juridique")
        .expect("profile scored");
    assert_eq!(legal.keyword_hits.len(), 3);
    assert!((legal.contributions.keywords - 3.0).abs() < f32::EPSILON);
    assert!((legal.total - 3.0).abs() < f32::EPSILON);
}

#[test]
fn exclude_keywords_void_the_keyword_channel() {
    // "contrat" excludes prof-de-yoga even though "sommeil" would match.
    let decision = engine().decide("sommeil et contrat", &[], degraded());

    let yoga = decision
        .profiles
        .iter()
        .find(|profile| profile.profile_id == "prof-de-yoga")
        .expect("profile scored");
    assert!(yoga.keyword_hits.is_empty());
    assert_eq!(yoga.contributions.keywords, 0.0);

    assert_eq!(decision.chosen_profile_id, "expert-juridique");
}

#[test]
fn exclusion_only_silences_keywords_not_other_channels() {
    let decision = engine().decide(
        "sommeil et contrat",
        &[NeedTag::Sommeil],
        degraded(),
    );

    let yoga = decision
        .profiles
        .iter()
        .find(|profile| profile.profile_id == "prof-de-yoga")
        .expect("profile scored");
    assert!(yoga.keyword_hits.is_empty());
    assert_eq!(yoga.signal_tags, vec!["sommeil".to_string()]);
    assert!((yoga.contributions.signals - 0.8).abs() < f32::EPSILON);
}

#[test]
fn signal_boosts_follow_the_configured_table() {
    let decision = engine().decide(
        "aucune correspondance de mots",
        &[NeedTag::Charge, NeedTag::Deconnexion],
        degraded(),
    );

    // expert-qvt collects both tags at 1.0 each, weighted by 0.8.
    let qvt = decision
        .profiles
        .iter()
        .find(|profile| profile.profile_id == "expert-qvt")
        .expect("profile scored");
    assert_eq!(
        qvt.signal_tags,
        vec!["charge".to_string(), "deconnexion".to_string()]
    );
    assert!((qvt.contributions.signals - 1.6).abs() < 1e-6);

    // psy-coach only maps "charge", at half a point.
    let coach = decision
        .profiles
        .iter()
        .find(|profile| profile.profile_id == "psy-coach")
        .expect("profile scored");
    assert_eq!(coach.signal_tags, vec!["charge".to_string()]);
    assert!((coach.contributions.signals - 0.4).abs() < 1e-6);

    assert_eq!(decision.chosen_profile_id, "expert-qvt");
}

#[test]
fn semantic_contribution_clamps_negative_similarity() {
    let similarities = vec![-0.9, 0.5, 0.0, 0.0];
    let decision = engine().decide(
        "aucune correspondance",
        &[],
        SemanticInput::Similarities(similarities),
    );

    let legal = &decision.profiles[0];
    assert_eq!(legal.semantic_similarity, Some(-0.9));
    assert_eq!(legal.contributions.semantic, 0.0);

    let qvt = &decision.profiles[1];
    assert_eq!(qvt.semantic_similarity, Some(0.5));
    assert!((qvt.contributions.semantic - 0.6).abs() < 1e-6);

    assert_eq!(decision.chosen_profile_id, "expert-qvt");
    assert_eq!(decision.semantic, SemanticChannel::Active);
}

#[test]
fn degraded_semantic_channel_is_reported_in_the_trace() {
    let decision = engine().decide("aucune correspondance", &[], degraded());

    assert_eq!(
        decision.semantic,
        SemanticChannel::Degraded {
            reason: "provider offline".to_string()
        }
    );
    assert!(decision
        .profiles
        .iter()
        .all(|profile| profile.semantic_similarity.is_none()
            && profile.contributions.semantic == 0.0));
}

#[test]
fn ties_resolve_to_the_first_declared_profile() {
    let router = ProfileRouter::new(twin_catalog(), twin_rules()).expect("twin config valid");

    for _ in 0..25 {
        let decision = router.decide(
            "retrouver un équilibre",
            &[NeedTag::Charge],
            SemanticInput::Similarities(vec![0.5, 0.5]),
        );
        assert_eq!(decision.chosen_profile_id, "first-twin");
        assert_eq!(
            decision.profiles[0].total, decision.profiles[1].total,
            "tie must be exact for the test to mean anything"
        );
    }
}

#[test]
fn profiles_without_rules_still_get_a_trace_entry() {
    let router = ProfileRouter::new(twin_catalog(), Default::default()).expect("config valid");
    let decision = router.decide("équilibre", &[], degraded());

    assert_eq!(decision.profiles.len(), 2);
    assert!(decision
        .profiles
        .iter()
        .all(|profile| profile.total == 0.0 && profile.keyword_hits.is_empty()));
    assert_eq!(decision.chosen_profile_id, "first-twin");
}

#[test]
fn empty_catalog_is_rejected_at_construction() {
    let result = ProfileRouter::new(
        crate::workflows::routing::catalog::ProfileCatalog {
            profiles: Vec::new(),
        },
        Default::default(),
    );
    assert!(result.is_err());
}

#[test]
fn need_tags_are_echoed_on_the_decision() {
    let decision = engine().decide(
        "question neutre",
        &[NeedTag::Deconnexion, NeedTag::Sommeil],
        degraded(),
    );
    assert_eq!(
        decision.need_tags,
        vec!["deconnexion".to_string(), "sommeil".to_string()]
    );
}
