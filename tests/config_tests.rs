use menu_anchor::config::{PrefixConfig, ScoreWeights, ToleranceConfig};
use menu_anchor::text::CaseRules;
use menu_anchor::{ConfigError, MatcherConfig};
use pretty_assertions::assert_eq;

#[test]
fn test_defaults() {
    let config = MatcherConfig::default();
    assert_eq!(config.case_rules, CaseRules::Turkish);
    assert_eq!(config.region.left_column_fraction, 0.55);
    assert_eq!(
        config.prefixes,
        PrefixConfig {
            long: 5,
            medium: 4,
            short: 3,
            continuation: 3,
            alias: 3
        }
    );
    assert_eq!(config.tolerances.conjunction_band, 25.0);
    assert_eq!(config.tolerances.continuation_band, 30.0);
    assert_eq!(config.tolerances.max_backtrack, 10.0);
    assert_eq!(
        config.weights,
        ScoreWeights {
            emphasized_start: 10,
            conjunction: 2,
            continuation: 3,
            emphasized_continuation: 5,
            parenthetical: 5
        }
    );
    assert_eq!(config.min_score, 0);
    assert!(config.validate().is_ok());
}

#[test]
fn test_builder_sets_fields() {
    let config = MatcherConfig::builder()
        .case_rules(CaseRules::Unicode)
        .single_column()
        .conjunctions(["&", "ve"])
        .min_score(3)
        .build()
        .unwrap();
    assert_eq!(config.case_rules, CaseRules::Unicode);
    assert_eq!(config.region.left_column_fraction, 1.0);
    assert_eq!(config.conjunctions, vec!["&".to_string(), "ve".to_string()]);
    assert_eq!(config.min_score, 3);
}

#[test]
fn test_builder_rejects_bad_values() {
    let err = MatcherConfig::builder()
        .left_column_fraction(0.0)
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidValue {
            field: "region.left_column_fraction",
            ..
        }
    ));

    let err = MatcherConfig::builder()
        .prefixes(PrefixConfig {
            long: 3,
            medium: 4,
            ..PrefixConfig::default()
        })
        .build()
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { field: "prefixes", .. }));

    let err = MatcherConfig::builder()
        .prefixes(PrefixConfig {
            continuation: 0,
            ..PrefixConfig::default()
        })
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidValue {
            field: "prefixes.continuation",
            ..
        }
    ));

    let err = MatcherConfig::builder()
        .tolerances(ToleranceConfig {
            alias_band: -1.0,
            ..ToleranceConfig::default()
        })
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidValue {
            field: "tolerances.alias_band",
            ..
        }
    ));

    let err = MatcherConfig::builder()
        .conjunctions(["&", " "])
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidValue {
            field: "conjunctions",
            ..
        }
    ));
}

#[test]
fn test_toml_partial_override() {
    let config = MatcherConfig::from_toml_str(
        r#"
        case_rules = "unicode"
        min_score = 10

        [region]
        left_column_fraction = 1.0

        [weights]
        parenthetical = 7
        "#,
    )
    .unwrap();

    assert_eq!(config.case_rules, CaseRules::Unicode);
    assert_eq!(config.min_score, 10);
    assert_eq!(config.region.left_column_fraction, 1.0);
    assert_eq!(config.weights.parenthetical, 7);
    assert_eq!(config.weights.emphasized_start, 10);
    assert_eq!(config.tolerances, ToleranceConfig::default());
}

#[test]
fn test_toml_round_trip_of_defaults() {
    let text = toml::to_string(&MatcherConfig::default()).unwrap();
    assert_eq!(
        MatcherConfig::from_toml_str(&text).unwrap(),
        MatcherConfig::default()
    );
}

#[test]
fn test_toml_errors() {
    assert!(matches!(
        MatcherConfig::from_toml_str("min_score = \"high\""),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        MatcherConfig::from_toml_str("[region]\nleft_column_fraction = -0.5"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        MatcherConfig::from_toml_file("does/not/exist.toml"),
        Err(ConfigError::Read { .. })
    ));
}
