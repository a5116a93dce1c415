//! Integration test: intent registry, traversal and resolution
//!
//! Tests sharing the process-wide registry use distinct intent names and
//! unregister what they add.

use foreshadow::config::IntentConfig;
use foreshadow::intents::{
    global_registry, init_builtin_intents, priority_traverse, register_intent, render_tree,
    unregister_intent, IntentDefinition, IntentDtype, IntentRegistry, IntentResolver,
    BASE_INTENT, CATEGORICAL_INTENT, GENERIC_INTENT, NUMERIC_INTENT,
};
use foreshadow::ForeshadowError;
use polars::prelude::*;

fn names(order: &[std::sync::Arc<foreshadow::intents::IntentClass>]) -> Vec<String> {
    order.iter().map(|c| c.name().to_string()).collect()
}

fn str_intent(name: &str, children: &[&str]) -> IntentDefinition {
    IntentDefinition::new(name)
        .with_dtype(IntentDtype::Str)
        .with_children(children.iter().copied())
}

#[test]
fn test_missing_dtype() {
    let result = register_intent(IntentDefinition::new("MissingDtypeIntent").with_no_children());
    let err = result.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Subclass must define cls.dtype attribute.\nThis attribute should define the dtype of the intent."
    );
    assert!(!global_registry().contains("MissingDtypeIntent"));
}

#[test]
fn test_missing_children() {
    let result = register_intent(IntentDefinition::new("MissingChildrenIntent").with_dtype(IntentDtype::Str));
    let err = result.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Subclass must define cls.children attribute.\nThis attribute should define the children of the intent."
    );
    assert!(!global_registry().contains("MissingChildrenIntent"));
}

#[test]
fn test_base_intent_not_instantiable() {
    let err = global_registry().instantiate("BaseIntent").unwrap_err();
    assert!(matches!(err, ForeshadowError::InstantiationError(_)));
    assert_eq!(err.to_string(), "BaseIntent may not be instantiated");
}

#[test]
fn test_register_and_unregister() {
    register_intent(str_intent("ReregisterIntent", &[])).unwrap();
    assert!(global_registry().contains("ReregisterIntent"));

    // Second registration under the same name is rejected
    assert!(register_intent(str_intent("ReregisterIntent", &[])).is_err());

    assert_eq!(unregister_intent(["ReregisterIntent"]).unwrap(), 1);
    assert!(!global_registry().contains("ReregisterIntent"));

    // Name is free again
    register_intent(str_intent("ReregisterIntent", &[])).unwrap();
    unregister_intent(["ReregisterIntent"]).unwrap();
}

#[test]
fn test_unregister_unknown_leaves_registry_intact() {
    register_intent(str_intent("KeptIntent", &[])).unwrap();
    let err = unregister_intent(["KeptIntent", "NeverRegisteredIntent"]).unwrap_err();
    assert!(matches!(err, ForeshadowError::IntentNotFound(_)));
    assert!(global_registry().contains("KeptIntent"));
    unregister_intent(["KeptIntent"]).unwrap();
}

#[test]
fn test_is_intent_not_implemented() {
    let class = register_intent(str_intent("NoMatcherIntent", &[])).unwrap();
    let column = Series::new("col".into(), &["a", "b"]);
    let err = class.is_intent(&column).unwrap_err();
    assert!(matches!(err, ForeshadowError::NotImplemented(_)));
    assert_eq!(err.to_string(), "is_intent is not implemented");
    unregister_intent(["NoMatcherIntent"]).unwrap();
}

#[test]
fn test_render_tree() {
    register_intent(str_intent("TestIntent", &["TestIntent1", "TestIntent2"])).unwrap();
    register_intent(str_intent("TestIntent1", &["TestIntent11", "TestIntent12"])).unwrap();
    register_intent(str_intent("TestIntent11", &[])).unwrap();
    register_intent(str_intent("TestIntent12", &[])).unwrap();
    register_intent(str_intent("TestIntent2", &[])).unwrap();

    let rendered = render_tree("TestIntent").unwrap();
    assert_eq!(
        rendered,
        "TestIntent\n\tTestIntent1\n\t\tTestIntent11\n\t\tTestIntent12\n\tTestIntent2\n"
    );

    // Depth is the number of leading tabs
    for line in rendered.lines() {
        let depth = line.chars().take_while(|c| *c == '\t').count();
        let name = line.trim_start_matches('\t');
        let expected = match name {
            "TestIntent" => 0,
            "TestIntent1" | "TestIntent2" => 1,
            _ => 2,
        };
        assert_eq!(depth, expected, "unexpected depth for {}", name);
    }

    unregister_intent([
        "TestIntent",
        "TestIntent1",
        "TestIntent11",
        "TestIntent12",
        "TestIntent2",
    ])
    .unwrap();
}

#[test]
fn test_priority_traverse() {
    register_intent(str_intent("PrioA", &["PrioB", "PrioC"])).unwrap();
    register_intent(str_intent("PrioB", &["PrioD", "PrioE"])).unwrap();
    register_intent(str_intent("PrioC", &[])).unwrap();
    register_intent(str_intent("PrioD", &[])).unwrap();
    register_intent(str_intent("PrioE", &[])).unwrap();

    let order = priority_traverse("PrioA").unwrap();
    assert_eq!(names(&order), vec!["PrioD", "PrioE", "PrioB", "PrioC", "PrioA"]);

    // Every node after all of its descendants, root last
    assert_eq!(order.last().unwrap().name(), "PrioA");

    // Each traversal starts fresh
    let again = priority_traverse("PrioA").unwrap();
    assert_eq!(names(&again), names(&order));

    unregister_intent(["PrioA", "PrioB", "PrioC", "PrioD", "PrioE"]).unwrap();
}

#[test]
fn test_missing_child_reported_at_traversal() {
    let registry = IntentRegistry::new();
    registry.register(str_intent("Parent", &["Ghost"])).unwrap();
    let err = registry.priority_traverse("Parent").unwrap_err();
    assert!(matches!(err, ForeshadowError::IntentNotFound(ref name) if name == "Ghost"));
}

#[test]
fn test_resolve_builtin_intents() {
    let config = IntentConfig::new().with_max_categorical_unique(3);
    let resolver = IntentResolver::with_builtin(&config).unwrap();

    let values: Vec<f64> = (0..100).map(|i| i as f64 * 0.5).collect();
    let levels: Vec<&str> = (0..100).map(|i| ["red", "green", "blue"][i % 3]).collect();
    let codes: Vec<i64> = (0..100).map(|i| (i % 2) as i64).collect();
    let df = df!(
        "amount" => &values,
        "color" => &levels,
        "flag" => &codes
    )
    .unwrap();

    let resolved = resolver.resolve(&df).unwrap();
    assert_eq!(resolved.len(), 3);
    assert_eq!(resolved[0].column, "amount");
    assert_eq!(resolved[0].intent.name(), NUMERIC_INTENT);
    assert_eq!(resolved[1].column, "color");
    assert_eq!(resolved[1].intent.name(), CATEGORICAL_INTENT);
    // Numeric storage, but only two distinct values
    assert_eq!(resolved[2].column, "flag");
    assert_eq!(resolved[2].intent.name(), CATEGORICAL_INTENT);
}

#[test]
fn test_resolve_frame_with_unsupported_column() {
    let resolver = IntentResolver::with_builtin(&IntentConfig::default()).unwrap();
    let amounts: Vec<f64> = (0..10).map(|i| i as f64 * 1.1).collect();
    let blobs: Vec<&[u8]> = (0..10).map(|i| if i % 2 == 0 { &b"x"[..] } else { &b"yz"[..] }).collect();
    let df = DataFrame::new(vec![
        Column::new("amount".into(), amounts),
        Column::new("blob".into(), blobs),
    ])
    .unwrap();

    let resolved = resolver.resolve(&df).unwrap();
    assert_eq!(resolved[0].intent.name(), NUMERIC_INTENT);
    assert_eq!(resolved[1].intent.name(), GENERIC_INTENT);
}

#[test]
fn test_base_intent_not_accepted_as_child() {
    let err = register_intent(str_intent("AdoptsBaseIntent", &[BASE_INTENT])).unwrap_err();
    assert!(matches!(err, ForeshadowError::ConfigError(_)));
    assert!(!global_registry().contains("AdoptsBaseIntent"));
}

#[test]
fn test_init_builtin_intents_globally() {
    init_builtin_intents(&IntentConfig::default()).unwrap();
    // Repeated initialization keeps the first registration
    init_builtin_intents(&IntentConfig::default()).unwrap();

    let order = priority_traverse(GENERIC_INTENT).unwrap();
    assert_eq!(names(&order), vec![NUMERIC_INTENT, CATEGORICAL_INTENT, GENERIC_INTENT]);

    let column = Series::new("city".into(), &["Oslo", "Lima", "Oslo"]);
    let intent = global_registry().classify(GENERIC_INTENT, &column).unwrap();
    assert_eq!(intent.name(), CATEGORICAL_INTENT);
}
