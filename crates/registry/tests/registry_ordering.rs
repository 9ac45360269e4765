//! Registry ordering and membership laws
//!
//! - distinct priorities resolve strictly descending
//! - equal priorities resolve in registration order
//! - duplicate registration and unknown unregistration change nothing
//! - readers keep a consistent snapshot while writers mutate

mod common;

use broker_core::{BrokerIdentity, FALLBACK_PRIORITY, SubjectType};
use broker_ports::Broker;
use broker_registry::BrokerRegistry;
use common::{RecordingPipeline, ScriptedBroker};
use rust_decimal_macros::dec;
use std::sync::Arc;

fn item() -> SubjectType {
    SubjectType::new("item")
}

fn resolved_ids(registry: &BrokerRegistry, subject_type: &SubjectType) -> Vec<String> {
    registry
        .resolve(subject_type)
        .iter()
        .map(|e| e.descriptor().id.clone())
        .collect()
}

#[test]
fn test_distinct_priorities_resolve_descending() {
    let _ = env_logger::try_init();
    let registry = BrokerRegistry::new();

    for (id, priority) in [("c", 3), ("a", -7), ("e", 120), ("b", 0), ("d", 45)] {
        assert!(registry.register(Arc::new(ScriptedBroker::new(id, priority, &["sword"], None))));
    }

    let priorities: Vec<i8> = registry.resolve(&item()).iter().map(|e| e.priority()).collect();
    assert_eq!(priorities, vec![120, 45, 3, 0, -7]);
    assert!(priorities.windows(2).all(|w| w[0] > w[1]));
}

#[test]
fn test_equal_priorities_keep_registration_order() {
    let registry = BrokerRegistry::new();
    registry.register(Arc::new(ScriptedBroker::new("first", 5, &[], None)));
    registry.register(Arc::new(ScriptedBroker::new("generic", FALLBACK_PRIORITY, &[], None)));
    registry.register(Arc::new(ScriptedBroker::new("second", 5, &[], None)));
    registry.register(Arc::new(ScriptedBroker::new("third", 5, &[], None)));

    assert_eq!(
        resolved_ids(&registry, &item()),
        vec!["first", "second", "third", "generic"]
    );
}

#[test]
fn test_reregistration_goes_to_back_of_its_priority() {
    let registry = BrokerRegistry::new();
    let first = Arc::new(ScriptedBroker::new("first", 0, &[], None));
    registry.register(first.clone());
    registry.register(Arc::new(ScriptedBroker::new("second", 0, &[], None)));

    assert!(registry.unregister(first.as_ref()));
    assert!(registry.register(first));

    assert_eq!(resolved_ids(&registry, &item()), vec!["second", "first"]);
}

#[test]
fn test_duplicate_registration_is_noop() {
    let pipeline = Arc::new(RecordingPipeline::default());
    let registry = BrokerRegistry::with_pipeline(pipeline.clone());

    assert!(registry.register(Arc::new(ScriptedBroker::new("shop", 10, &["sword"], None))));
    // Same identity, different priority and price
    assert!(!registry.register(Arc::new(ScriptedBroker::new(
        "shop",
        90,
        &["sword"],
        Some(dec!(1))
    ))));

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.resolve(&item())[0].priority(), 10);
    assert_eq!(pipeline.registered.lock().len(), 1);
}

#[test]
fn test_same_id_under_other_provider_or_type_is_distinct() {
    let registry = BrokerRegistry::new();
    assert!(registry.register(Arc::new(ScriptedBroker::new("shop", 0, &[], None))));
    assert!(registry.register(Arc::new(
        ScriptedBroker::new("shop", 0, &[], None).provider("Other")
    )));
    assert!(registry.register(Arc::new(
        ScriptedBroker::new("shop", 0, &[], None).subject_type("permission")
    )));

    assert_eq!(registry.len(), 3);
    assert_eq!(
        registry.subject_types(),
        vec![SubjectType::new("item"), SubjectType::new("permission")]
    );
}

#[test]
fn test_unregister_unknown_is_noop() {
    let pipeline = Arc::new(RecordingPipeline::default());
    let registry = BrokerRegistry::with_pipeline(pipeline.clone());
    registry.register(Arc::new(ScriptedBroker::new("shop", 0, &[], None)));

    let stranger = ScriptedBroker::new("stranger", 0, &[], None);
    assert!(!registry.unregister(&stranger));
    assert!(!registry.unregister_by_identity(&BrokerIdentity::new(
        "Scripted", "shop", "vehicle"
    )));

    assert_eq!(resolved_ids(&registry, &item()), vec!["shop"]);
    assert!(pipeline.unregistered.lock().is_empty());
}

#[test]
fn test_unregister_by_identity_notifies() {
    let pipeline = Arc::new(RecordingPipeline::default());
    let registry = BrokerRegistry::with_pipeline(pipeline.clone());
    let broker = Arc::new(ScriptedBroker::new("shop", 0, &[], None));
    registry.register(broker.clone());

    assert!(registry.unregister_by_identity(&broker.descriptor().identity()));
    assert!(registry.is_empty());
    assert_eq!(pipeline.unregistered.lock()[0].id, "shop");
}

#[test]
fn test_concurrent_readers_see_sorted_snapshots() {
    let registry = Arc::new(BrokerRegistry::new());
    registry.register(Arc::new(ScriptedBroker::new("anchor", 0, &["sword"], None)));

    std::thread::scope(|scope| {
        let writer = registry.clone();
        scope.spawn(move || {
            for round in 0..200i32 {
                let priority = (round % 50) as i8;
                let broker = Arc::new(ScriptedBroker::new(
                    &format!("b{}", round),
                    priority,
                    &["sword"],
                    None,
                ));
                writer.register(broker.clone());
                if round % 3 == 0 {
                    writer.unregister(broker.as_ref());
                }
            }
        });

        for _ in 0..4 {
            let reader = registry.clone();
            scope.spawn(move || {
                for _ in 0..500 {
                    let snapshot = reader.resolve(&SubjectType::new("item"));
                    assert!(snapshot.iter().any(|e| e.descriptor().id == "anchor"));
                    assert!(snapshot.windows(2).all(|w| {
                        w[0].priority() > w[1].priority()
                            || (w[0].priority() == w[1].priority()
                                && w[0].sequence() < w[1].sequence())
                    }));
                }
            });
        }
    });

    // 200 registered, every third (67) removed again, plus the anchor
    assert_eq!(registry.len(), 134);
}
