use crate::sim::{ConfigError, ConfigLoadError, ErConfig};

#[test]
fn default_config_is_valid() {
    ErConfig::default().validate().expect("defaults validate");
}

#[test]
fn rates_convert_to_mean_interarrival_times() {
    let cfg = ErConfig {
        walkin_rate: 0.25,
        ambulance_rate: 0.5,
        ..ErConfig::default()
    };
    assert_eq!(cfg.mean_walkin_interarrival(), 4.0);
    assert_eq!(cfg.mean_ambulance_interarrival(), 2.0);
}

#[test]
fn validate_rejects_non_positive_rates_and_durations() {
    let cfg = ErConfig {
        walkin_rate: 0.0,
        ..ErConfig::default()
    };
    assert_eq!(
        cfg.validate(),
        Err(ConfigError::NonPositiveRate {
            field: "walkin_rate",
            value: 0.0
        })
    );

    let cfg = ErConfig {
        mean_test_duration: -1.0,
        ..ErConfig::default()
    };
    assert_eq!(
        cfg.validate(),
        Err(ConfigError::NonPositiveDuration {
            field: "mean_test_duration",
            value: -1.0
        })
    );

    let cfg = ErConfig {
        duration_cv: -0.5,
        ..ErConfig::default()
    };
    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::InvalidSpread {
            field: "duration_cv",
            ..
        })
    ));
}

#[test]
fn validate_rejects_rates_whose_interarrival_time_overflows() {
    let cfg = ErConfig {
        ambulance_rate: 1e-310,
        ..ErConfig::default()
    };
    assert!(cfg.mean_ambulance_interarrival().is_infinite());
    assert_eq!(
        cfg.validate(),
        Err(ConfigError::NonPositiveRate {
            field: "ambulance_rate",
            value: 1e-310
        })
    );

    let cfg = ErConfig {
        ambulance_rate: 1e-300,
        ..ErConfig::default()
    };
    cfg.validate().expect("tiny but representable rate is valid");
}

#[test]
fn validate_rejects_zero_capacity_and_zero_goal() {
    let cfg = ErConfig {
        labs: 0,
        ..ErConfig::default()
    };
    assert_eq!(
        cfg.validate(),
        Err(ConfigError::ZeroCapacity { field: "labs" })
    );

    let cfg = ErConfig {
        goal_patients: 0,
        ..ErConfig::default()
    };
    assert_eq!(cfg.validate(), Err(ConfigError::ZeroGoal));
}

#[test]
fn validate_rejects_probability_sum_of_one_or_more() {
    let cfg = ErConfig {
        admit_probability: 0.6,
        specialist_probability: 0.4,
        ..ErConfig::default()
    };
    let err = cfg.validate().expect_err("sum of 1.0 is invalid");
    assert!(err.is_probability());
    assert!(matches!(err, ConfigError::ProbabilitySum { .. }));

    let cfg = ErConfig {
        admit_probability: 0.6,
        specialist_probability: 0.39,
        ..ErConfig::default()
    };
    cfg.validate().expect("sum below 1.0 is valid");
}

#[test]
fn json_config_fills_missing_fields_from_defaults() {
    let cfg = ErConfig::from_json_str(r#"{ "doctors": 3, "seed": 99 }"#).expect("parse config");
    assert_eq!(cfg.doctors, 3);
    assert_eq!(cfg.seed, Some(99));
    assert_eq!(cfg.nurses, ErConfig::default().nurses);
}

#[test]
fn json_config_rejects_unknown_fields() {
    let err = ErConfig::from_json_str(r#"{ "surgeons": 3 }"#).expect_err("unknown field");
    assert!(matches!(err, ConfigLoadError::Parse(_)));
}

#[test]
fn missing_config_file_reports_io_error() {
    let err = ErConfig::from_json_file("/nonexistent/edsim/config.json").expect_err("missing");
    assert!(matches!(err, ConfigLoadError::Io { .. }));
}

#[test]
fn overrides_replace_named_fields() {
    let base = ErConfig::default();
    let cfg = base
        .with_overrides(&[("doctors", "4"), ("walkin_rate", "0.5"), ("seed", "7")])
        .expect("apply overrides");
    assert_eq!(cfg.doctors, 4);
    assert_eq!(cfg.walkin_rate, 0.5);
    assert_eq!(cfg.seed, Some(7));
    assert_eq!(cfg.labs, base.labs);

    let cleared = cfg.with_overrides(&[("seed", "null")]).expect("clear seed");
    assert_eq!(cleared.seed, None);
}

#[test]
fn overrides_reject_unknown_keys_and_ill_typed_values() {
    let base = ErConfig::default();
    assert!(matches!(
        base.with_overrides(&[("surgeons", "2")]),
        Err(ConfigLoadError::UnknownKey(k)) if k == "surgeons"
    ));
    assert!(matches!(
        base.with_overrides(&[("doctors", "many")]),
        Err(ConfigLoadError::Parse(_))
    ));
}

#[test]
fn override_lines_split_into_key_value_pairs() {
    let pairs = ErConfig::parse_override_line("doctors=2  labs=3\tseed=1").expect("parse line");
    assert_eq!(
        pairs,
        vec![
            ("doctors".to_string(), "2".to_string()),
            ("labs".to_string(), "3".to_string()),
            ("seed".to_string(), "1".to_string()),
        ]
    );
    assert!(matches!(
        ErConfig::parse_override_line("doctors=2 labs"),
        Err(ConfigLoadError::BadOverride(t)) if t == "labs"
    ));
}
