//! Integration tests for intent normalization.

use proptest::prelude::*;

use stratum_intent::{
    Architecture, Availability, Database, Intent, IntentSource, KeywordIntentSource, RawIntent,
    HA_MIN_APP_COUNT, MAX_APP_COUNT,
};

/// An empty JSON object is a complete request.
#[test]
fn test_empty_request_is_fully_defaulted() {
    let intent: Intent = serde_json::from_str("{}").unwrap();
    assert_eq!(intent, Intent::default());
}

/// Contradictory fields resolve deterministically.
#[test]
fn test_contradictory_request() {
    let json = r#"{
        "architecture": "3-tier",
        "load_balancer": false,
        "availability": "high",
        "app_count": 1,
        "database": "none"
    }"#;
    let intent: Intent = serde_json::from_str(json).unwrap();

    assert!(intent.load_balancer());
    assert_eq!(intent.architecture(), Architecture::ThreeTier);
    assert_eq!(intent.app_count(), HA_MIN_APP_COUNT);
    assert!(!intent.has_database());
}

/// Keyword extraction is a pure function of the description.
#[tokio::test]
async fn test_keyword_source_is_deterministic() {
    let source = KeywordIntentSource::new();
    let description = "java spring service with mongodb, 4 servers, redundant";
    let a = source.produce_intent(description).await.unwrap();
    let b = source.produce_intent(description).await.unwrap();

    assert_eq!(a, b);
    assert_eq!(a.database(), Database::Mongodb);
    assert_eq!(a.app_count(), 4);
    assert_eq!(a.availability(), Availability::High);
}

fn raw_intent_strategy() -> impl Strategy<Value = RawIntent> {
    (
        proptest::option::of("[a-z0-9.\\-]{0,12}"),
        proptest::option::of(prop_oneof![
            Just("mysql".to_string()),
            Just("redis".to_string()),
            Just("none".to_string()),
            "[a-z]{0,8}",
        ]),
        proptest::option::of(prop_oneof![Just("2-tier".to_string()), Just("3-tier".to_string())]),
        proptest::option::of(any::<bool>()),
        proptest::option::of(prop_oneof![Just("standard".to_string()), Just("high".to_string())]),
        proptest::option::of(-5i64..50),
    )
        .prop_map(|(app_stack, database, architecture, load_balancer, availability, app_count)| RawIntent {
            app_stack,
            database,
            architecture,
            load_balancer,
            availability,
            app_count,
            ..Default::default()
        })
}

proptest! {
    #[test]
    fn normalization_invariants_hold(raw in raw_intent_strategy()) {
        let intent = Intent::from(raw);

        prop_assert!(intent.app_count() >= 1);
        prop_assert!(intent.app_count() <= MAX_APP_COUNT);
        if intent.availability() == Availability::High {
            prop_assert!(intent.app_count() >= HA_MIN_APP_COUNT);
        }
        prop_assert_eq!(
            intent.architecture() == Architecture::ThreeTier,
            intent.load_balancer()
        );
        prop_assert!(!intent.region().is_empty());
    }
}
