//! CLI integration tests.
//!
//! Tests cover:
//! - Parameter building from INI files (strategy, risk, data, watchlist)
//! - Symbol resolution and position sizing helpers
//! - Argument parsing, including the --stop / --stop-pct conflict
//! - Full command runs against temp config, history and ledger files

mod common;

use clap::Parser;
use common::*;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tempfile::TempDir;
use twoday::adapters::file_config_adapter::FileConfigAdapter;
use twoday::cli::{self, Cli};
use twoday::domain::error::TwodayError;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// History for three symbols plus a ledger, and an INI pointing at them.
fn workspace() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let history = dir.path().join("history");
    let mirror = dir.path().join("mirror");
    fs::create_dir_all(&history).unwrap();
    fs::create_dir_all(&mirror).unwrap();

    write_history_csv(&history, "2330", &bars_with_tail(5, &[100.0, 110.0, 112.0]));
    write_history_csv(&history, "2317", &bars_with_tail(5, &[100.0, 90.0, 91.0]));
    write_history_csv(&mirror, "0050", &generate_bars("2024-01-01", 12, 150.0));

    let ledger = dir.path().join("transactions.csv");
    fs::write(
        &ledger,
        "date,symbol,side,shares,price\n\
         2024-01-10,2330,BUY,1000,100\n\
         2024-02-10,2330,SELL,400,110\n\
         2024-01-12,0050,BUY,500,150\n",
    )
    .unwrap();

    let ini = format!(
        "[strategy]\nma_short = 3\nma_long = 5\nmode = short\n\n\
         [risk]\ntotal_assets = 1000000\nrisk_fraction = 0.01\nstop_loss_pct = 7\n\n\
         [data]\nhistory_dir = {}\nfallback_dirs = {}\nledger = {}\n\n\
         [watchlist]\nsymbols = 2330, 2317, 0050\npinned = 0050\n",
        history.display(),
        mirror.display(),
        ledger.display(),
    );
    let config = dir.path().join("twoday.ini");
    fs::write(&config, ini).unwrap();
    (dir, config)
}

fn run_args(args: &[&str]) -> ExitCode {
    let mut argv = vec!["twoday"];
    argv.extend_from_slice(args);
    cli::run(Cli::try_parse_from(argv).unwrap())
}

fn path_str(p: &Path) -> &str {
    p.to_str().unwrap()
}

mod params {
    use super::*;

    #[test]
    fn advisor_params_default_when_absent() {
        let config = FileConfigAdapter::from_string("").unwrap();
        let params = cli::build_advisor_params(&config, None).unwrap();
        assert_eq!(params.ma_short_period, 18);
        assert_eq!(params.ma_long_period, 52);
        assert_eq!(params.mode, AnalysisMode::Short);
        assert_eq!(params.required_bars(), 55);
    }

    #[test]
    fn advisor_params_from_config() {
        let file = write_temp_ini("[strategy]\nma_short = 10\nma_long = 60\nmode = LONG\n");
        let config = cli::load_config(&file.path().to_path_buf()).unwrap();
        let params = cli::build_advisor_params(&config, None).unwrap();
        assert_eq!(params.ma_short_period, 10);
        assert_eq!(params.ma_long_period, 60);
        assert_eq!(params.mode, AnalysisMode::Long);
    }

    #[test]
    fn mode_override_wins() {
        let config = FileConfigAdapter::from_string("[strategy]\nmode = long\n").unwrap();
        let params = cli::build_advisor_params(&config, Some("short")).unwrap();
        assert_eq!(params.mode, AnalysisMode::Short);
    }

    #[test]
    fn bad_mode_override_rejected() {
        let config = FileConfigAdapter::from_string("").unwrap();
        assert!(matches!(
            cli::build_advisor_params(&config, Some("weekly")),
            Err(TwodayError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn zero_period_rejected() {
        let config = FileConfigAdapter::from_string("[strategy]\nma_short = 0\n").unwrap();
        assert!(matches!(
            cli::build_advisor_params(&config, None),
            Err(TwodayError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn risk_params_defaults_and_overrides() {
        let config = FileConfigAdapter::from_string("[risk]\ntotal_assets = 500000\n").unwrap();
        let risk = cli::build_risk_params(&config).unwrap();
        assert_eq!(risk.total_assets, 500_000.0);
        assert_eq!(risk.risk_fraction, 0.01);
        assert_eq!(risk.stop_loss_pct, 7.0);
    }

    #[test]
    fn risk_params_reject_unusable_values() {
        for ini in [
            "[risk]\ntotal_assets = abc\n",
            "[risk]\nrisk_fraction = nan\n",
        ] {
            let config = FileConfigAdapter::from_string(ini).unwrap();
            assert!(
                matches!(
                    cli::build_risk_params(&config),
                    Err(TwodayError::ConfigInvalid { .. })
                ),
                "{ini}"
            );
        }
    }

    #[test]
    fn history_port_requires_history_dir() {
        let config = FileConfigAdapter::from_string("[data]\nledger = x.csv\n").unwrap();
        match cli::build_history_port(&config) {
            Err(TwodayError::ConfigMissing { section, key }) => {
                assert_eq!(section, "data");
                assert_eq!(key, "history_dir");
            }
            Err(other) => panic!("expected ConfigMissing, got {other:?}"),
            Ok(_) => panic!("expected ConfigMissing"),
        }
    }

    #[test]
    fn history_port_includes_fallbacks() {
        let config = FileConfigAdapter::from_string(
            "[data]\nhistory_dir = ./a\nfallback_dirs = ./b, ./c\n",
        )
        .unwrap();
        assert_eq!(cli::build_history_port(&config).unwrap().len(), 3);
    }
}

mod symbols_and_sizing {
    use super::*;

    #[test]
    fn overrides_take_precedence() {
        let config = FileConfigAdapter::from_string("[watchlist]\nsymbols = 2330\n").unwrap();
        let symbols = cli::resolve_symbols(&["0050".into()], &config);
        assert_eq!(symbols, vec!["0050"]);
    }

    #[test]
    fn config_symbols_are_normalised() {
        let config =
            FileConfigAdapter::from_string("[watchlist]\nsymbols = 2330, 00878b ,2330\n").unwrap();
        assert_eq!(cli::resolve_symbols(&[], &config), vec!["2330", "00878B"]);
    }

    #[test]
    fn no_symbols_anywhere() {
        let config = FileConfigAdapter::from_string("").unwrap();
        assert!(cli::resolve_symbols(&[], &config).is_empty());
    }

    #[test]
    fn size_with_explicit_stop() {
        assert_eq!(
            cli::compute_size(1_000_000.0, 100.0, Some(93.0), None, None).unwrap(),
            1428
        );
    }

    #[test]
    fn size_with_stop_percentage() {
        assert_eq!(
            cli::compute_size(1_000_000.0, 100.0, None, Some(7.0), None).unwrap(),
            1428
        );
    }

    #[test]
    fn size_with_custom_risk() {
        // 2% of 500k over a 10 point stop.
        assert_eq!(
            cli::compute_size(500_000.0, 60.0, Some(50.0), None, Some(0.02)).unwrap(),
            1000
        );
    }

    #[test]
    fn stop_above_entry_sizes_zero() {
        assert_eq!(
            cli::compute_size(1_000_000.0, 100.0, Some(105.0), None, None).unwrap(),
            0
        );
    }

    #[test]
    fn invalid_risk_rejected() {
        assert!(cli::compute_size(1_000_000.0, 100.0, Some(93.0), None, Some(1.5)).is_err());
        assert!(cli::compute_size(1_000_000.0, 100.0, None, None, None).is_err());
    }
}

mod arg_parsing {
    use super::*;

    #[test]
    fn stop_and_stop_pct_conflict() {
        let result = Cli::try_parse_from([
            "twoday", "size", "--assets", "1000", "--entry", "10", "--stop", "9", "--stop-pct", "5",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn size_requires_a_stop() {
        let result = Cli::try_parse_from(["twoday", "size", "--assets", "1000", "--entry", "10"]);
        assert!(result.is_err());
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["twoday", "validate", "-c", "x.ini", "--verbose"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn repeated_symbols_collected() {
        let cli = Cli::try_parse_from([
            "twoday", "advise", "-c", "x.ini", "-s", "2330", "-s", "2317", "--json",
        ])
        .unwrap();
        match cli.command {
            cli::Command::Advise { symbol, json, .. } => {
                assert_eq!(symbol, vec!["2330", "2317"]);
                assert!(json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}

mod json_output {
    use super::*;
    use serde::ser::{Error as _, Serialize, Serializer};

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("cannot serialize"))
        }
    }

    #[test]
    fn serialization_failure_is_an_error() {
        assert!(matches!(
            cli::to_json(&Unserializable),
            Err(TwodayError::Io(_))
        ));
    }

    #[test]
    fn serializes_pretty_json() {
        let json = cli::to_json(&vec![1, 2]).unwrap();
        assert!(json.contains('\n'));
    }
}

mod commands {
    use super::*;

    #[test]
    fn validate_accepts_workspace_config() {
        let (_dir, config) = workspace();
        assert_eq!(run_args(&["validate", "-c", path_str(&config)]), ExitCode::SUCCESS);
    }

    #[test]
    fn validate_missing_file_is_config_error() {
        assert_eq!(
            run_args(&["validate", "-c", "/nonexistent/twoday.ini"]),
            ExitCode::from(2)
        );
    }

    #[test]
    fn validate_bad_risk_is_config_error() {
        let file = write_temp_ini("[risk]\nrisk_fraction = 2\n");
        assert_eq!(
            run_args(&["validate", "-c", path_str(file.path())]),
            ExitCode::from(2)
        );
    }

    #[test]
    fn advise_watchlist_symbols() {
        let (_dir, config) = workspace();
        assert_eq!(run_args(&["advise", "-c", path_str(&config)]), ExitCode::SUCCESS);
        assert_eq!(
            run_args(&["advise", "-c", path_str(&config), "--json", "--mode", "long"]),
            ExitCode::SUCCESS
        );
    }

    #[test]
    fn advise_json_ignores_risk_section() {
        let (dir, config) = workspace();
        let ini = fs::read_to_string(&config).unwrap();
        let broken = dir.path().join("broken_risk.ini");
        fs::write(&broken, ini.replace("risk_fraction = 0.01", "risk_fraction = 2")).unwrap();

        assert_eq!(
            run_args(&["advise", "-c", path_str(&broken), "--json"]),
            ExitCode::SUCCESS
        );
        assert_eq!(
            run_args(&["advise", "-c", path_str(&broken)]),
            ExitCode::from(2)
        );
    }

    #[test]
    fn advise_unknown_symbol_is_no_data() {
        let (_dir, config) = workspace();
        assert_eq!(
            run_args(&["advise", "-c", path_str(&config), "-s", "9999"]),
            ExitCode::from(5)
        );
    }

    #[test]
    fn watchlist_runs() {
        let (_dir, config) = workspace();
        assert_eq!(run_args(&["watchlist", "-c", path_str(&config)]), ExitCode::SUCCESS);
        assert_eq!(
            run_args(&["watchlist", "-c", path_str(&config), "--json"]),
            ExitCode::SUCCESS
        );
    }

    #[test]
    fn holdings_and_realized_run() {
        let (_dir, config) = workspace();
        assert_eq!(run_args(&["holdings", "-c", path_str(&config)]), ExitCode::SUCCESS);
        assert_eq!(
            run_args(&[
                "realized", "-c", path_str(&config), "--from", "2024-01-01", "--to", "2024-12-31",
            ]),
            ExitCode::SUCCESS
        );
    }

    #[test]
    fn realized_reversed_range_is_invalid_argument() {
        let (_dir, config) = workspace();
        assert_eq!(
            run_args(&[
                "realized", "-c", path_str(&config), "--from", "2024-12-31", "--to", "2024-01-01",
            ]),
            ExitCode::from(4)
        );
    }

    #[test]
    fn holdings_without_ledger_is_config_error() {
        let file = write_temp_ini("[data]\nhistory_dir = /tmp\n");
        assert_eq!(
            run_args(&["holdings", "-c", path_str(file.path())]),
            ExitCode::from(2)
        );
    }

    #[test]
    fn size_prints_shares() {
        assert_eq!(
            run_args(&["size", "--assets", "1000000", "--entry", "100", "--stop-pct", "7"]),
            ExitCode::SUCCESS
        );
    }
}
