// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use clap::Parser;
use figment::Jail;
use gwr_yield::settings::{DEFAULT_NUM_WAFERS, DEFAULT_SEED, Settings};
use serial_test::serial;

const CONF_FILE: &str = "yield.toml";

fn parse_cli(args: &[&str]) -> Settings {
    let mut all_args = vec!["gwr-yield"];
    all_args.extend_from_slice(args);
    Settings::try_parse_from(all_args).unwrap()
}

fn fractions(settings: &Settings) -> Vec<String> {
    settings
        .experiments()
        .unwrap()
        .iter()
        .map(|e| e.max_fault_fraction().to_string())
        .collect()
}

#[test]
#[serial]
fn defaults() {
    Jail::expect_with(|_jail| {
        let settings = Settings::from_cli(parse_cli(&[])).unwrap();
        assert_eq!(settings.num_wafers, Some(DEFAULT_NUM_WAFERS));
        assert_eq!(settings.seed(), DEFAULT_SEED);
        assert_eq!(settings.report_file(), "-");
        assert_eq!(settings.log_level(), "warn");

        let layout = settings.layout().unwrap();
        assert_eq!(layout.tiles_per_segment(), 10);
        assert_eq!(layout.segments_per_wafer(), 5);

        let experiments = settings.experiments().unwrap();
        assert_eq!(experiments.len(), 1);
        assert_eq!(experiments[0].num_wafers(), DEFAULT_NUM_WAFERS);
        assert_eq!(experiments[0].max_fault_fraction().to_string(), "1/10");
        Ok(())
    });
}

#[test]
#[serial]
fn cli_overrides_defaults() {
    Jail::expect_with(|_jail| {
        let settings = Settings::from_cli(parse_cli(&[
            "--num-wafers",
            "7",
            "--seed",
            "99",
            "--fault-probabilities",
            "0.1,0.2,0.3",
            "--max-fault-fractions",
            "0,3/30",
            "--tiles-per-segment",
            "6",
        ]))
        .unwrap();

        assert_eq!(settings.seed(), 99);
        assert_eq!(settings.layout().unwrap().tiles_per_segment(), 6);
        let experiments = settings.experiments().unwrap();
        assert_eq!(experiments.len(), 6);
        assert!(experiments.iter().all(|e| e.num_wafers() == 7));
        Ok(())
    });
}

#[test]
#[serial]
fn conf_file_values() {
    Jail::expect_with(|jail| {
        jail.create_file(
            CONF_FILE,
            r#"
                num_wafers = 20
                fault_probabilities = [0.01, 0.05]
                max_fault_fractions = ["1/10", "0.2"]
                seed = 7
            "#,
        )?;

        let settings = Settings::from_cli(parse_cli(&["--conf-file", CONF_FILE])).unwrap();
        assert_eq!(settings.num_wafers, Some(20));
        assert_eq!(settings.seed(), 7);
        assert_eq!(settings.fault_probabilities, Some(vec![0.01, 0.05]));
        assert_eq!(fractions(&settings), vec!["1/10", "1/5", "1/10", "1/5"]);
        Ok(())
    });
}

#[test]
#[serial]
fn conf_file_accepts_numeric_fractions() {
    Jail::expect_with(|jail| {
        jail.create_file(
            CONF_FILE,
            r#"
                fault_probabilities = 0.02
                max_fault_fractions = [0.1, "2/30", 1]
            "#,
        )?;

        let settings = Settings::from_cli(parse_cli(&["--conf-file", CONF_FILE])).unwrap();
        assert_eq!(settings.fault_probabilities, Some(vec![0.02]));
        assert_eq!(
            settings.max_fault_fractions,
            Some(vec!["0.1".to_string(), "2/30".to_string(), "1".to_string()])
        );
        assert_eq!(fractions(&settings), vec!["1/10", "1/15", "1"]);
        Ok(())
    });
}

#[test]
#[serial]
fn cli_overrides_conf_file() {
    Jail::expect_with(|jail| {
        jail.create_file(CONF_FILE, "num_wafers = 20\nseed = 7\n")?;

        let settings =
            Settings::from_cli(parse_cli(&["--conf-file", CONF_FILE, "--seed", "8"])).unwrap();
        assert_eq!(settings.num_wafers, Some(20));
        assert_eq!(settings.seed(), 8);
        Ok(())
    });
}

#[test]
#[serial]
fn env_overrides_conf_file() {
    Jail::expect_with(|jail| {
        jail.create_file(CONF_FILE, "num_wafers = 20\nseed = 7\n")?;
        jail.set_env("GWR_YIELD_NUM_WAFERS", 42);

        let settings = Settings::from_cli(parse_cli(&["--conf-file", CONF_FILE])).unwrap();
        assert_eq!(settings.num_wafers, Some(42));
        assert_eq!(settings.seed(), 7);
        Ok(())
    });
}

#[test]
#[serial]
fn cli_overrides_env() {
    Jail::expect_with(|jail| {
        jail.set_env("GWR_YIELD_SEED", 3);

        let from_env = Settings::from_cli(parse_cli(&[])).unwrap();
        assert_eq!(from_env.seed(), 3);

        let from_cli = Settings::from_cli(parse_cli(&["--seed", "4"])).unwrap();
        assert_eq!(from_cli.seed(), 4);
        Ok(())
    });
}

#[test]
#[serial]
fn conf_file_from_env() {
    Jail::expect_with(|jail| {
        jail.create_file(CONF_FILE, "segments_per_wafer = 8\n")?;
        jail.set_env("GWR_YIELD_CONF_FILE", CONF_FILE);

        let settings = Settings::from_cli(parse_cli(&[])).unwrap();
        assert_eq!(settings.layout().unwrap().segments_per_wafer(), 8);
        Ok(())
    });
}

#[test]
#[serial]
fn env_fault_probabilities() {
    let cases: [(&str, Vec<f64>); 5] = [
        ("0.1", vec![0.1]),
        ("0", vec![0.0]),
        ("0.1,0.2", vec![0.1, 0.2]),
        ("0.1, 0.2, 0.3", vec![0.1, 0.2, 0.3]),
        ("[0.1, 0.2]", vec![0.1, 0.2]),
    ];
    for (value, expected) in cases {
        Jail::expect_with(|jail| {
            jail.set_env("GWR_YIELD_FAULT_PROBABILITIES", value);
            let settings = Settings::from_cli(parse_cli(&[])).unwrap();
            assert_eq!(settings.fault_probabilities, Some(expected.clone()), "{value}");
            Ok(())
        });
    }
}

#[test]
#[serial]
fn env_max_fault_fractions() {
    let cases: [(&str, Vec<&str>); 6] = [
        ("1/10", vec!["1/10"]),
        ("0.2", vec!["1/5"]),
        ("1", vec!["1"]),
        ("1/10,0.2", vec!["1/10", "1/5"]),
        ("[0.2]", vec!["1/5"]),
        (r#"["3/30", 0.2]"#, vec!["1/10", "1/5"]),
    ];
    for (value, expected) in cases {
        Jail::expect_with(|jail| {
            jail.set_env("GWR_YIELD_MAX_FAULT_FRACTIONS", value);
            let settings = Settings::from_cli(parse_cli(&[])).unwrap();
            assert_eq!(fractions(&settings), expected, "{value}");
            Ok(())
        });
    }
}

#[test]
#[serial]
fn env_unparsable_probability() {
    Jail::expect_with(|jail| {
        jail.set_env("GWR_YIELD_FAULT_PROBABILITIES", "0.1,lots");
        let result = Settings::from_cli(parse_cli(&[]));
        let message = result.unwrap_err().to_string();
        assert!(
            message.contains("unable to parse fault probability 'lots'"),
            "{message}"
        );
        Ok(())
    });
}

#[test]
#[serial]
#[should_panic(expected = "not found")]
fn missing_conf_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.toml");
    Settings::from_cli(parse_cli(&["--conf-file", &missing.display().to_string()])).unwrap();
}

#[test]
#[serial]
#[should_panic(expected = "is not a file path")]
fn directory_conf_file() {
    let dir = tempfile::tempdir().unwrap();
    Settings::from_cli(parse_cli(&["--conf-file", &dir.path().display().to_string()])).unwrap();
}

#[test]
#[serial]
#[should_panic(expected = "at least one fault probability is required")]
fn no_fault_probabilities() {
    let settings = Settings {
        fault_probabilities: Some(Vec::new()),
        ..Settings::default()
    };
    settings.experiments().unwrap();
}

#[test]
#[serial]
#[should_panic(expected = "at least one max fault fraction is required")]
fn no_max_fault_fractions() {
    let settings = Settings {
        max_fault_fractions: None,
        ..Settings::default()
    };
    settings.experiments().unwrap();
}

#[test]
#[serial]
#[should_panic(expected = "invalid window size")]
fn oversized_device_class() {
    let settings = Settings {
        large_chip_segments: Some(6),
        ..Settings::default()
    };
    let mut output = Vec::new();
    gwr_yield::run_sweep(&settings, &mut output).unwrap();
}
