use std::io::{BufRead, Write};
use std::path::Path;

use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{Config, ConfigError};
use crate::fuel::{self, CalcMode, RawValues};
use crate::i18n::{self, keys, Translator};
use crate::report::{self, ReportOptions};
use crate::ui_cli::{self, MenuChoice};

/// Errors raised by the command-line front end.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),
    /// stdin reached end of file while a prompt was waiting.
    #[error("input closed")]
    InputClosed,
}

/// Rebuilds the translator after the language setting changed.
pub fn translator_for(cfg: &Config) -> Translator {
    let lang = i18n::resolve_language(&cfg.language, None);
    Translator::new_with_pack(&lang, cfg.language_pack_dir.as_deref())
}

/// Interactive menu loop. Settings are written to `config_path` whenever
/// they change and again on exit.
pub fn run<R: BufRead, W: Write>(
    config: &mut Config,
    config_path: &Path,
    tr: Translator,
    input: &mut R,
    out: &mut W,
) -> Result<(), AppError> {
    let mut tr = tr;
    loop {
        let choice = match ui_cli::main_menu(&tr, input, out) {
            Ok(choice) => choice,
            Err(AppError::InputClosed) => MenuChoice::Exit,
            Err(e) => return Err(e),
        };
        let step = match choice {
            MenuChoice::WorkingToDry => {
                ui_cli::handle_calculation(CalcMode::WorkingToDry, config, &tr, input, out)
            }
            MenuChoice::CombustibleToWorking => {
                ui_cli::handle_calculation(CalcMode::CombustibleToWorking, config, &tr, input, out)
            }
            MenuChoice::Settings => {
                match ui_cli::handle_settings(&tr, config, input, out) {
                    Ok(true) => {
                        config.save_to(config_path)?;
                        info!(path = %config_path.display(), "settings saved");
                        tr = translator_for(config);
                        writeln!(out, "{}", tr.t(keys::SETTINGS_SAVED))?;
                        Ok(())
                    }
                    Ok(false) => Ok(()),
                    Err(e) => Err(e),
                }
            }
            MenuChoice::Exit => {
                config.save_to(config_path)?;
                writeln!(out, "{}", tr.t(keys::APP_EXIT))?;
                break;
            }
        };
        match step {
            Ok(()) => {}
            Err(AppError::InputClosed) => {
                debug!("input closed mid-prompt");
                writeln!(out)?;
                config.save_to(config_path)?;
                writeln!(out, "{}", tr.t(keys::APP_EXIT))?;
                break;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Non-interactive calculation. Writes the report (or JSON) to `out`, or the
/// localized error to `err`, and returns whether the calculation succeeded.
pub fn calculate_once<W: Write, E: Write>(
    mode: CalcMode,
    values: &RawValues,
    opts: &ReportOptions,
    tr: &Translator,
    as_json: bool,
    out: &mut W,
    err: &mut E,
) -> Result<bool, AppError> {
    let outcome = fuel::compute(mode, values);
    debug!(?mode, ok = outcome.is_ok(), "one-shot calculation");
    match outcome {
        Ok(result) => {
            let notes = fuel::advisories(values, &result);
            if as_json {
                let notes: Vec<String> =
                    notes.iter().map(|a| i18n::localize_advisory(a, tr)).collect();
                let body = json!({ "result": result, "notes": notes });
                writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
            } else {
                let report = report::build_report(&result, &notes, opts, tr);
                write!(out, "{}", report.to_text(tr))?;
            }
            Ok(true)
        }
        Err(e) => {
            writeln!(
                err,
                "{}: {}",
                tr.t(keys::ERROR_PREFIX),
                i18n::localize_error(&e, tr)
            )?;
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuel::raw_values;
    use crate::units::HeatingValueUnit;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn session_runs_a_task_and_saves_on_exit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        let mut input = Cursor::new(b"1\n4\n60\n1\n1\n10\n8\n20\n0\n".to_vec());
        let mut out = Vec::new();
        run(&mut cfg, &path, Translator::new("en"), &mut input, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("K_rs"), "{out}");
        assert!(out.ends_with("Exiting application.\n"));
        assert!(path.exists());
    }

    #[test]
    fn settings_change_switches_language() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config {
            language: "en".into(),
            ..Config::default()
        };
        let mut input = Cursor::new(b"3\n1\nuk\n".to_vec());
        let mut out = Vec::new();
        run(&mut cfg, &path, Translator::new("en"), &mut input, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(cfg.language, "uk");
        assert!(out.contains("Налаштування збережено."), "{out}");
        let saved = crate::config::load_or_default_at(&path).unwrap();
        assert_eq!(saved.language, "uk");
    }

    #[test]
    fn eof_ends_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        let mut input = Cursor::new(b"2\n5\n".to_vec());
        let res = run(&mut cfg, &path, Translator::new("en"), &mut input, &mut Vec::new());
        assert!(res.is_ok());
    }

    fn task2() -> RawValues {
        raw_values([
            ("H", "5"),
            ("C", "75"),
            ("S", "2"),
            ("O", "8"),
            ("W", "10"),
            ("A", "15"),
            ("V", "300"),
            ("Qg", "30"),
        ])
    }

    #[test]
    fn one_shot_json_output() {
        let mut out = Vec::new();
        let ok = calculate_once(
            CalcMode::CombustibleToWorking,
            &task2(),
            &ReportOptions::default(),
            &Translator::new("en"),
            true,
            &mut out,
            &mut Vec::new(),
        )
        .unwrap();
        assert!(ok);
        let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(v["notes"], serde_json::json!([]));
        assert_eq!(v["result"]["mode"], "combustible_to_working");
        assert_eq!(v["result"]["k_gr"], 0.75);
    }

    #[test]
    fn one_shot_error_is_localized() {
        let mut values = task2();
        values.insert("W".into(), "90".into());
        let mut out = Vec::new();
        let mut err = Vec::new();
        let ok = calculate_once(
            CalcMode::CombustibleToWorking,
            &values,
            &ReportOptions {
                precision: 2,
                heating_value_unit: HeatingValueUnit::KjPerKg,
            },
            &Translator::new("uk"),
            false,
            &mut out,
            &mut err,
        )
        .unwrap();
        assert!(!ok);
        assert!(out.is_empty());
        assert_eq!(String::from_utf8(err).unwrap(), "Помилка: W + A має бути < 100.\n");
    }
}
