// ABOUTME: Tests for building stacks from resolved configurations.
// ABOUTME: Covers ordering, uniqueness, and source reference validation.

mod support;

use proptest::prelude::*;
use stolos::config::AttachmentRef;
use stolos::stack::{BuildError, build_stack};
use support::{config_source, namespace, stack_config};

#[test]
fn services_keep_configuration_order() {
    let config = stack_config(&[("web", 1), ("api", 2), ("db", 1)]);
    let stack = build_stack(&namespace("demo"), &config).unwrap();

    let names: Vec<&str> = stack.services.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["web", "api", "db"]);
    assert_eq!(stack.name, "demo");
    assert_eq!(stack.namespace.as_str(), "demo");
}

#[test]
fn replica_counts_carry_over() {
    let config = stack_config(&[("web", 2), ("db", 3)]);
    let stack = build_stack(&namespace("demo"), &config).unwrap();
    assert_eq!(stack.services[0].replicas, 2);
    assert_eq!(stack.services[1].replicas, 3);
}

#[test]
fn empty_config_is_rejected() {
    let config = stack_config(&[]);
    assert!(matches!(
        build_stack(&namespace("demo"), &config),
        Err(BuildError::NoServices)
    ));
}

#[test]
fn duplicate_service_names_are_rejected() {
    let config = stack_config(&[("web", 1), ("web", 2)]);
    assert!(matches!(
        build_stack(&namespace("demo"), &config),
        Err(BuildError::DuplicateService(name)) if name.as_str() == "web"
    ));
}

#[test]
fn undeclared_config_reference_is_rejected() {
    let mut config = stack_config(&[("web", 1)]);
    config.services[0].configs.push(AttachmentRef {
        source: "missing".to_string(),
        target: None,
    });

    assert!(matches!(
        build_stack(&namespace("demo"), &config),
        Err(BuildError::UnknownConfig { name, .. }) if name == "missing"
    ));
}

#[test]
fn declared_config_reference_is_accepted() {
    let mut config = stack_config(&[("web", 1)]);
    config.configs.push(config_source("app-conf", "key=value"));
    config.services[0].configs.push(AttachmentRef {
        source: "app-conf".to_string(),
        target: Some("/etc/app".to_string()),
    });

    let stack = build_stack(&namespace("demo"), &config).unwrap();
    assert_eq!(stack.config_maps.len(), 1);
    assert_eq!(stack.services[0].configs[0].source, "app-conf");
}

#[test]
fn invalid_source_name_is_rejected() {
    let mut config = stack_config(&[("web", 1)]);
    config.configs.push(config_source("Not_Valid", "data"));

    assert!(matches!(
        build_stack(&namespace("demo"), &config),
        Err(BuildError::InvalidSourceName { kind: "config", .. })
    ));
}

#[test]
fn invalid_port_mapping_is_rejected() {
    let mut config = stack_config(&[("web", 1)]);
    config.services[0].ports.push("eighty:http".to_string());

    assert!(matches!(
        build_stack(&namespace("demo"), &config),
        Err(BuildError::InvalidPort { mapping, .. }) if mapping == "eighty:http"
    ));
}

proptest! {
    /// For any set of distinct valid service names, the built stack has
    /// exactly that many services, in configuration order.
    #[test]
    fn builds_uniquely_named_services_in_order(
        names in prop::collection::hash_set("[a-z][a-z0-9]{0,8}", 1..10)
    ) {
        let names: Vec<String> = names.into_iter().collect();
        let entries: Vec<(&str, u32)> = names.iter().map(|n| (n.as_str(), 1)).collect();
        let config = stack_config(&entries);

        let stack = build_stack(&namespace("demo"), &config).unwrap();
        prop_assert_eq!(stack.services.len(), names.len());
        for (service, name) in stack.services.iter().zip(&names) {
            prop_assert_eq!(service.name.as_str(), name.as_str());
        }
    }
}
