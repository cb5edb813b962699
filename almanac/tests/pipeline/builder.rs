use almanac::{Almanac, AlmanacConfig, AlmanacError, FillPolicy, PersistConfig, TableInput};

fn one_table() -> TableInput {
    TableInput::text("x", "Date,V\n2024-01-01,1\n")
}

#[test]
fn build_requires_a_table() {
    let err = Almanac::builder().build().unwrap_err();
    assert!(matches!(err, AlmanacError::InvalidArg(_)));
}

#[test]
fn build_rejects_repeated_namespace_and_source() {
    let err = Almanac::builder()
        .feature_table("N", one_table())
        .feature_table("N", one_table())
        .build()
        .unwrap_err();
    assert!(matches!(err, AlmanacError::InvalidArg(m) if m.contains("twice")));

    let err = Almanac::builder()
        .average_group("AVG", vec![one_table(), one_table()])
        .build()
        .unwrap_err();
    assert!(matches!(err, AlmanacError::InvalidArg(m) if m.contains("source 'x'")));

    let err = Almanac::builder()
        .average_group("AVG", vec![])
        .build()
        .unwrap_err();
    assert!(matches!(err, AlmanacError::InvalidArg(_)));
}

#[test]
fn build_validates_configuration() {
    let err = Almanac::builder()
        .feature_table("N", one_table())
        .fill_policy(FillPolicy {
            max_missing_fraction: 1.5,
        })
        .build()
        .unwrap_err();
    assert!(matches!(err, AlmanacError::InvalidArg(_)));

    let err = Almanac::builder()
        .feature_table("N", one_table())
        .persist(PersistConfig {
            max_attempts: 0,
            ..PersistConfig::default()
        })
        .build()
        .unwrap_err();
    assert!(matches!(err, AlmanacError::InvalidArg(_)));

    let err = Almanac::builder()
        .feature_table("N", one_table())
        .table_name("a/b")
        .build()
        .unwrap_err();
    assert!(matches!(err, AlmanacError::InvalidArg(_)));
}

#[test]
fn builder_accepts_a_deserialized_config() {
    let cfg: AlmanacConfig = serde_json::from_value(serde_json::json!({
        "table_name": "combined_dataset",
        "output_dir": "out",
        "load": { "date_column": "timestamp", "strip_ticker_decorations": true },
        "fill": { "max_missing_fraction": 0.5 },
        "persist": {
            "max_attempts": 2,
            "retry_delay": { "secs": 0, "nanos": 0 },
            "jitter_percent": 0,
            "keep_backup": false
        },
        "bare_columns": ["BTC/USD"],
        "parallel_timeout": null
    }))
    .unwrap();
    let almanac = Almanac::builder()
        .with_config(cfg.clone())
        .feature_table("N", one_table())
        .build()
        .unwrap();
    assert_eq!(almanac.config(), &cfg);
    assert_eq!(almanac.groups()[0].namespace(), "N");
}
