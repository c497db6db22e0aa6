//! Subcommand handlers

use crate::commands::{FetchArgs, HoldArgs, LaunchArgs, ListArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{render_table, Reporter};
use jab_fixtures::{AccessDriver, Catalog, Harness, HarnessConfig, OracleApp, WindowWait};
use serde::Serialize;
use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Duration;

/// Load the harness configuration: file (if given), then environment overrides.
pub fn load_harness_config(path: Option<&Path>) -> CliResult<HarnessConfig> {
    let config = match path {
        Some(path) if !path.exists() => {
            return Err(CliError::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::default(),
    };
    Ok(config.with_env_overrides())
}

/// One row of `jabfix list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListRow {
    /// Catalog name
    pub name: String,
    /// Expected window title
    pub window_title: String,
    /// Download URL
    pub url: String,
    /// Local file
    pub file: String,
    /// Whether the local file exists
    pub present: bool,
}

/// Rows for every catalog entry under the configured directory
pub fn list_rows(harness_config: &HarnessConfig) -> CliResult<Vec<ListRow>> {
    let catalog = Catalog::load(&harness_config.files_dir)?;
    Ok(catalog
        .iter()
        .map(|entry| ListRow {
            name: entry.app.name().to_string(),
            window_title: entry.window_title.clone(),
            url: entry.url.clone(),
            file: entry.local_path.display().to_string(),
            present: entry.local_path.exists(),
        })
        .collect())
}

/// Print the catalog
pub fn run_list(
    harness_config: &HarnessConfig,
    args: &ListArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let rows = list_rows(harness_config)?;
    if args.json {
        serde_json::to_writer_pretty(&mut *out, &rows)?;
        writeln!(out)?;
        return Ok(());
    }

    let cells: Vec<Vec<String>> = rows
        .into_iter()
        .map(|row| {
            vec![
                row.name,
                row.window_title,
                row.file,
                if row.present { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    write!(
        out,
        "{}",
        render_table(&["NAME", "WINDOW", "FILE", "PRESENT"], &cells)
    )?;
    Ok(())
}

/// Download missing catalog files
pub fn run_fetch(
    config: &CliConfig,
    harness_config: HarnessConfig,
    args: &FetchArgs,
) -> CliResult<()> {
    let harness_config = match &args.dir {
        Some(dir) => harness_config.with_files_dir(dir),
        None => harness_config,
    };
    let reporter = reporter(config);
    reporter.header(&format!(
        "Fetching demo applications into {}",
        harness_config.files_dir.display()
    ));

    let mut harness = Harness::from_config(harness_config)?;
    let report = harness.ensure_files()?;
    if report.is_up_to_date() {
        reporter.success(&format!("All {} files present", report.skipped.len()));
    } else {
        for app in &report.downloaded {
            reporter.info(&format!("downloaded {app}"));
        }
        reporter.success(&format!(
            "{} downloaded, {} already present",
            report.downloaded.len(),
            report.skipped.len()
        ));
    }
    Ok(())
}

/// Launch a catalog app, hold the session, then tear down
pub fn run_launch(
    config: &CliConfig,
    harness_config: HarnessConfig,
    args: &LaunchArgs,
) -> CliResult<()> {
    let app: OracleApp = args
        .app
        .parse()
        .map_err(|e: jab_fixtures::HarnessError| CliError::invalid_argument(e.to_string()))?;
    let reporter = reporter(config);
    let mut harness = Harness::from_config(apply_wait(harness_config, &args.hold)?)?;

    harness.with_oracle_app(app, |driver| {
        reporter.success(&format!("Bound to window '{}'", driver.window_title()));
        hold(&reporter, &args.hold);
        Ok(())
    })?;
    reporter.info("Session torn down");
    Ok(())
}

/// Launch the Java Control Panel, hold the session, then tear down
pub fn run_control_panel(
    config: &CliConfig,
    harness_config: HarnessConfig,
    args: &HoldArgs,
) -> CliResult<()> {
    let reporter = reporter(config);
    let harness = Harness::from_config(apply_wait(harness_config, args)?)?;

    harness.with_java_control_app(|driver| {
        reporter.success(&format!("Bound to window '{}'", driver.window_title()));
        hold(&reporter, args);
        Ok(())
    })?;
    reporter.info("Session torn down");
    Ok(())
}

/// Print the effective configuration as YAML
pub fn run_config(harness_config: &HarnessConfig, out: &mut dyn Write) -> CliResult<()> {
    write!(out, "{}", harness_config.to_yaml()?)?;
    Ok(())
}

fn apply_wait(harness_config: HarnessConfig, args: &HoldArgs) -> CliResult<HarnessConfig> {
    match args.wait_ms {
        Some(0) => Err(CliError::invalid_argument("--wait-ms must be positive")),
        Some(ms) => Ok(harness_config.with_window_wait(WindowWait::default().with_timeout(ms))),
        None => Ok(harness_config),
    }
}

fn hold(reporter: &Reporter, args: &HoldArgs) {
    if let Some(ms) = args.hold_ms {
        std::thread::sleep(Duration::from_millis(ms));
        return;
    }
    reporter.info("Press Enter to tear down");
    let mut line = String::new();
    // EOF or a read error ends the hold just like Enter.
    let _ = std::io::stdin().lock().read_line(&mut line);
}

fn reporter(config: &CliConfig) -> Reporter {
    Reporter::new(config.color.should_color(), config.verbosity.is_quiet())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> HarnessConfig {
        HarnessConfig::default().with_files_dir(dir.path())
    }

    mod list_tests {
        use super::*;

        #[test]
        fn test_rows_cover_catalog() {
            let dir = TempDir::new().unwrap();
            let rows = list_rows(&config_in(&dir)).unwrap();
            assert_eq!(rows.len(), OracleApp::ALL.len());
            assert_eq!(rows[0].name, "BUTTON");
            assert_eq!(rows[0].window_title, "ButtonDemo");
            assert!(rows.iter().all(|row| !row.present));
        }

        #[test]
        fn test_rows_report_present_files() {
            let dir = TempDir::new().unwrap();
            fs::write(dir.path().join("BUTTON.jnlp"), "").unwrap();
            let rows = list_rows(&config_in(&dir)).unwrap();
            assert!(rows[0].present);
            assert!(!rows[1].present);
        }

        #[test]
        fn test_text_output() {
            let dir = TempDir::new().unwrap();
            let mut out = Vec::new();
            run_list(&config_in(&dir), &ListArgs { json: false }, &mut out).unwrap();
            let text = String::from_utf8(out).unwrap();
            assert!(text.starts_with("NAME"));
            assert!(text.contains("TABLE_FTF_EDIT"));
            assert_eq!(text.lines().count(), OracleApp::ALL.len() + 1);
        }

        #[test]
        fn test_json_output() {
            let dir = TempDir::new().unwrap();
            let mut out = Vec::new();
            run_list(&config_in(&dir), &ListArgs { json: true }, &mut out).unwrap();
            let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
            let rows = value.as_array().unwrap();
            assert_eq!(rows.len(), OracleApp::ALL.len());
            assert_eq!(rows[0]["name"], "BUTTON");
            assert_eq!(rows[0]["present"], false);
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_missing_config_file() {
            let err = load_harness_config(Some(Path::new("/nonexistent/jabfix.yaml")))
                .expect_err("missing file");
            assert!(matches!(err, CliError::Config { .. }));
        }

        #[test]
        fn test_config_file_loaded() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("jabfix.yaml");
            fs::write(&path, "control_panel_title: Panel\n").unwrap();
            let config = load_harness_config(Some(&path)).unwrap();
            assert_eq!(config.control_panel_title, "Panel");
        }

        #[test]
        fn test_run_config_prints_yaml() {
            let mut out = Vec::new();
            run_config(&HarnessConfig::default(), &mut out).unwrap();
            let text = String::from_utf8(out).unwrap();
            assert!(text.contains("launcher: javaws"));
            assert!(text.contains("teardown:"));
        }
    }

    mod wait_tests {
        use super::*;

        fn hold_args(wait_ms: Option<u64>) -> HoldArgs {
            HoldArgs {
                hold_ms: Some(0),
                wait_ms,
            }
        }

        #[test]
        fn test_wait_ms_enables_window_wait() {
            let config = apply_wait(HarnessConfig::default(), &hold_args(Some(900))).unwrap();
            assert_eq!(config.window_wait.unwrap().timeout_ms, 900);
        }

        #[test]
        fn test_no_wait_keeps_config() {
            let config = apply_wait(HarnessConfig::default(), &hold_args(None)).unwrap();
            assert!(config.window_wait.is_none());
        }

        #[test]
        fn test_zero_wait_rejected() {
            let err = apply_wait(HarnessConfig::default(), &hold_args(Some(0))).expect_err("zero");
            assert!(matches!(err, CliError::InvalidArgument { .. }));
        }
    }
}
