//! Tests for fleet search configuration.

use super::*;
use fleetforge_core::NodeKind;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        time_limit_seconds = 600
        improvement_fraction = 0.5
        oracle_time_limit_seconds = 20

        [init]
        strategy = "greedy"
        oracle_time_limit_seconds = 10

        [removal]
        time_limit_seconds = 90
        patience = 4
        oracle_call_limit = 50

        [switch]
        max_swap_out = 2
    "#;

    let config = FleetConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.time_limit(), Duration::from_secs(600));
    assert_eq!(config.improvement_time_limit(), Duration::from_secs(300));
    assert_eq!(config.oracle_time_limit(), Duration::from_secs(20));
    assert_eq!(config.init.strategy, InitStrategy::Greedy);
    assert_eq!(config.init.oracle_time_limit(), Duration::from_secs(10));
    assert_eq!(config.removal.time_limit(), Duration::from_secs(90));
    assert_eq!(config.removal.patience, 4);
    assert_eq!(config.removal.after_feasible_patience, 1);
    assert_eq!(config.removal.oracle_call_limit, Some(50));
    assert_eq!(config.switch.max_swap_out, 2);
    assert_eq!(config.switch.patience, 1);
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        time_limit_seconds: 120
        init:
          strategy: bisection
        switch:
          patience: 3
          after_feasible_patience: 2
    "#;

    let config = FleetConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.init.strategy, InitStrategy::Bisection);
    assert_eq!(config.switch.patience, 3);
    assert_eq!(config.switch.after_feasible_patience, 2);
    assert_eq!(config.removal, RemovalConfig::default());
}

#[test]
fn test_empty_document_is_default() {
    let config = FleetConfig::from_toml_str("").unwrap();
    assert_eq!(config, FleetConfig::default());
}

#[test]
fn test_builder() {
    let config = FleetConfig::new()
        .with_time_limit_seconds(60.0)
        .with_init_strategy(InitStrategy::Greedy);

    assert_eq!(config.time_limit(), Duration::from_secs(60));
    assert_eq!(config.init.strategy, InitStrategy::Greedy);
    assert!(config.validate().is_ok());
}

#[test]
fn test_rejects_zero_patience() {
    let err = FleetConfig::from_toml_str("[removal]\npatience = 0").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_rejects_bad_fraction() {
    let err = FleetConfig::from_toml_str("improvement_fraction = 1.5").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_rejects_swap_out_beyond_three() {
    let err = FleetConfig::from_yaml_str("switch:\n  max_swap_out: 4").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_rejects_non_positive_oracle_limit() {
    let err = FleetConfig::from_toml_str("oracle_time_limit_seconds = 0").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_rejects_unrepresentable_time_settings() {
    let cases = [
        FleetConfig::default().with_time_limit_seconds(1e20),
        FleetConfig::default().with_time_limit_seconds(f64::INFINITY),
        FleetConfig::default().with_time_limit_seconds(f64::NAN),
        FleetConfig {
            routing_min_time_limit_seconds: f64::NAN,
            ..FleetConfig::default()
        },
        FleetConfig {
            routing_min_time_limit_seconds: f64::INFINITY,
            ..FleetConfig::default()
        },
        FleetConfig {
            routing_min_time_limit_seconds: -1.0,
            ..FleetConfig::default()
        },
        FleetConfig {
            oracle_time_limit_seconds: 1e20,
            ..FleetConfig::default()
        },
    ];

    for config in cases {
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{config:?}");
    }
}

#[test]
fn test_accepts_zero_routing_floor_and_max_time_limit() {
    let config = FleetConfig {
        routing_min_time_limit_seconds: 0.0,
        ..FleetConfig::default().with_time_limit_seconds(MAX_SECONDS)
    };
    assert!(config.validate().is_ok());
    assert_eq!(config.routing_min_time_limit(), Duration::ZERO);
    assert_eq!(config.time_limit(), Duration::from_secs(1_000_000_000));
}

#[test]
fn test_unknown_strategy_is_parse_error() {
    let err = FleetConfig::from_toml_str("[init]\nstrategy = \"random\"").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn test_instance_from_toml() {
    let toml = r#"
        name = "two-node"

        [time]
        step_hours = 0.5
        steps = 8

        [[vehicles]]
        name = "van"
        capacity = 40.0
        power = 20.0
        cost = 3.0

        [[nodes]]
        name = "depot"
        kind = "depot"

        [[nodes]]
        name = "c1"
        kind = "consumer"
        capacity = 100.0
        initial_charge = 50.0
        power = 50.0
        energy = [0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0]
    "#;

    let instance = instance_from_toml_str(toml).unwrap();
    assert_eq!(instance.name, "two-node");
    assert_eq!(instance.vehicles.len(), 1);
    assert_eq!(instance.vehicles[0].initial_charge, 0.0);
    assert_eq!(instance.nodes[1].kind, NodeKind::Consumer);
    assert!(instance.validate().is_ok());
}

#[test]
fn test_instance_from_yaml() {
    let yaml = r#"
        time:
          step_hours: 1.0
          steps: 6
        vehicles:
          - name: truck
            capacity: 80.0
            power: 40.0
            cost: 9.5
        nodes: []
    "#;

    let instance = instance_from_yaml_str(yaml).unwrap();
    assert_eq!(instance.vehicles[0].cost, 9.5);
    assert!(instance.nodes.is_empty());
}
