//! Option validation tests.
//!
//! Each recognized option is validated on its own: valid values are stored
//! (ratings clamped to `maxRating`), invalid values leave the previous value.

use proptest::prelude::*;
use serde_json::json;
use starlit_test::{Harness, OptionGenerator};
use starlit_widgets::{OptionError, OptionKey, Rating, RatingOptions};

const SEED: u64 = 0x5eed_0001;

// =============================================================================
// Defaults
// =============================================================================

#[test]
fn defaults_after_instantiation() {
    let harness = Harness::instantiate("rating", &json!({}));
    let rating = harness.rating();
    assert_eq!(rating.get_max_rating(), 5);
    assert_eq!(rating.get_user_rating(), 0);
    assert_eq!(rating.get_average_rating(), 0.0);
    assert!(!rating.is_disabled());
    assert!(rating.is_clear_enabled());
    assert_eq!(rating.options().tooltip_strings(), None);
}

#[test]
fn null_bag_applies_nothing() {
    let mut harness = Harness::instantiate("rating", &json!({"maxRating": 8}));
    let applied = harness.set_options(&serde_json::Value::Null);
    assert!(applied.accepted.is_empty());
    assert_eq!(harness.rating().get_max_rating(), 8);
}

// =============================================================================
// maxRating
// =============================================================================

#[test]
fn random_valid_max_rating_keeps_ratings_in_range() {
    let mut generator = OptionGenerator::seeded(SEED);
    let mut harness = Harness::instantiate("rating", &json!({}));
    for _ in 0..100 {
        let user = generator.rating_up_to(60);
        let average = generator.average_up_to(60);
        harness.set_options_and_verify(&json!({"userRating": user, "averageRating": average}));

        let max = generator.max_rating();
        harness.set_options_and_verify(&json!({ "maxRating": max }));

        let rating = harness.rating();
        assert_eq!(i64::from(rating.get_max_rating()), max);
        assert!(rating.get_user_rating() <= rating.get_max_rating());
        assert!(rating.get_average_rating() >= 0.0);
        assert!(rating.get_average_rating() <= f64::from(rating.get_max_rating()));
    }
}

#[test]
fn random_invalid_max_rating_is_ignored() {
    let mut generator = OptionGenerator::seeded(SEED + 1);
    let mut harness = Harness::instantiate("rating", &json!({"maxRating": 9}));
    for _ in 0..100 {
        let value = generator.invalid_max_rating();
        let applied = harness.set_options(&json!({ "maxRating": value }));
        assert!(!applied.is_accepted(OptionKey::MaxRating), "{value}");
        assert_eq!(harness.rating().get_max_rating(), 9, "{value}");
    }
}

#[test]
fn missing_max_rating_is_ignored() {
    let mut harness = Harness::instantiate("rating", &json!({"maxRating": 4}));
    harness.set_options_and_verify(&json!({"userRating": 2}));
    assert_eq!(harness.rating().get_max_rating(), 4);
}

#[test]
fn numeric_string_max_rating_is_rejected() {
    let mut harness = Harness::instantiate("rating", &json!({}));
    let applied = harness.set_options(&json!({"maxRating": "10"}));
    assert!(matches!(
        applied.rejection(OptionKey::MaxRating),
        Some(OptionError::NotANumber { .. })
    ));
    assert_eq!(harness.rating().get_max_rating(), 5);
}

#[test]
fn shrinking_max_rating_clamps_both_ratings() {
    let mut harness = Harness::instantiate(
        "rating",
        &json!({"maxRating": 10, "userRating": 8, "averageRating": 9.5}),
    );
    harness.set_options_and_verify(&json!({"maxRating": 3}));
    assert_eq!(harness.rating().get_user_rating(), 3);
    assert_eq!(harness.rating().get_average_rating(), 3.0);
}

#[test]
fn max_rating_applies_before_ratings_in_one_bag() {
    let harness = Harness::instantiate("rating", &json!({"userRating": 8, "maxRating": 10}));
    assert_eq!(harness.rating().get_user_rating(), 8);
}

// =============================================================================
// userRating / averageRating
// =============================================================================

#[test]
fn user_rating_above_max_clamps_exactly() {
    let mut harness = Harness::instantiate("rating", &json!({"maxRating": 5}));
    harness.set_options_and_verify(&json!({"userRating": 32}));
    assert_eq!(harness.rating().get_user_rating(), 5);
}

#[test]
fn average_rating_above_max_clamps_exactly() {
    let mut harness = Harness::instantiate("rating", &json!({"maxRating": 5}));
    harness.set_options_and_verify(&json!({"averageRating": 32.7}));
    assert_eq!(harness.rating().get_average_rating(), 5.0);
}

#[test]
fn random_ratings_above_max_clamp() {
    let mut generator = OptionGenerator::seeded(SEED + 2);
    for _ in 0..50 {
        let max = generator.max_rating();
        let mut harness = Harness::instantiate("rating", &json!({ "maxRating": max }));
        let above = generator.rating_above(max);
        harness.set_options_and_verify(&json!({"userRating": above, "averageRating": above}));
        assert_eq!(i64::from(harness.rating().get_user_rating()), max);
        assert_eq!(harness.rating().get_average_rating(), max as f64);
    }
}

#[test]
fn negative_ratings_are_rejected() {
    let mut harness =
        Harness::instantiate("rating", &json!({"userRating": 2, "averageRating": 1.5}));
    let applied = harness.set_options(&json!({"userRating": -1, "averageRating": -0.5}));
    assert_eq!(applied.rejected.len(), 2);
    assert_eq!(harness.rating().get_user_rating(), 2);
    assert_eq!(harness.rating().get_average_rating(), 1.5);
}

#[test]
fn fractional_user_rating_is_rejected() {
    let mut harness = Harness::instantiate("rating", &json!({"userRating": 2}));
    harness.set_options_and_verify(&json!({"userRating": 3.5}));
    assert_eq!(harness.rating().get_user_rating(), 2);
}

#[test]
fn fractional_average_is_kept() {
    let mut harness = Harness::instantiate("rating", &json!({}));
    harness.set_options_and_verify(&json!({"averageRating": 3.25}));
    assert_eq!(harness.rating().get_average_rating(), 3.25);
}

// =============================================================================
// disabled / enableClear
// =============================================================================

#[test]
fn random_non_booleans_are_ignored() {
    let mut generator = OptionGenerator::seeded(SEED + 3);
    let mut harness = Harness::instantiate("rating", &json!({}));
    for _ in 0..50 {
        let disabled = generator.flag();
        let enable_clear = generator.flag();
        harness.set_options_and_verify(&json!({"disabled": disabled, "enableClear": enable_clear}));

        let junk = generator.non_boolean();
        harness.set_options_and_verify(&json!({"disabled": junk, "enableClear": junk}));
        assert_eq!(harness.rating().is_disabled(), disabled);
        assert_eq!(harness.rating().is_clear_enabled(), enable_clear);
    }
}

// =============================================================================
// Bags
// =============================================================================

#[test]
fn invalid_field_does_not_block_valid_fields() {
    let mut harness = Harness::instantiate("rating", &json!({}));
    let applied = harness.set_options(&json!({
        "maxRating": -4,
        "userRating": 3,
        "disabled": "no",
        "enableClear": false,
    }));
    assert!(applied.is_accepted(OptionKey::UserRating));
    assert!(applied.is_accepted(OptionKey::EnableClear));
    assert!(applied.rejection(OptionKey::MaxRating).is_some());
    assert!(applied.rejection(OptionKey::Disabled).is_some());
    assert_eq!(harness.rating().get_user_rating(), 3);
    assert!(!harness.rating().is_clear_enabled());
}

#[test]
fn unknown_keys_are_reported_and_ignored() {
    let mut harness = Harness::instantiate("rating", &json!({}));
    let applied = harness.set_options(&json!({"stars": 9, "userRating": 1}));
    assert_eq!(applied.ignored, vec!["stars".to_string()]);
    assert!(!applied.is_clean());
    assert_eq!(harness.rating().get_max_rating(), 5);
}

#[test]
fn yaml_document_matches_json_bag() {
    let yaml = "maxRating: 7\nuserRating: 4\naverageRating: 3.5\nenableClear: false\n";
    let from_yaml = RatingOptions::from_yaml(yaml).unwrap();
    let from_json = Rating::create("r", &json!({
        "maxRating": 7,
        "userRating": 4,
        "averageRating": 3.5,
        "enableClear": false,
    }));
    assert_eq!(&from_yaml, from_json.options());
}

#[test]
fn malformed_documents_are_errors() {
    assert!(RatingOptions::from_json_str("{maxRating:").is_err());
    assert!(matches!(
        RatingOptions::from_json_str("[1, 2]"),
        Err(OptionError::NotAnObject { .. })
    ));
    assert!(RatingOptions::from_yaml("maxRating: [").is_err());
}

proptest! {
    #[test]
    fn prop_any_bag_keeps_invariants(
        max in -5i64..40,
        user in -5i64..80,
        average in -5.0f64..80.0,
    ) {
        let mut harness = Harness::instantiate("rating", &json!({}));
        harness.set_options_and_verify(&json!({
            "maxRating": max,
            "userRating": user,
            "averageRating": average,
        }));
        let rating = harness.rating();
        prop_assert!(rating.get_max_rating() > 0);
        prop_assert!(rating.get_user_rating() <= rating.get_max_rating());
        prop_assert!(rating.get_average_rating() >= 0.0);
        prop_assert!(rating.get_average_rating() <= f64::from(rating.get_max_rating()));
    }
}
