use std::io::{BufRead, Write};

use crate::app::AppError;
use crate::config::{Config, MAX_PRECISION};
use crate::fuel::{self, CalcMode, RawValues};
use crate::i18n::{self, keys, Translator};
use crate::report::{self, ReportOptions};
use crate::units::HeatingValueUnit;

/// Main menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    WorkingToDry,
    CombustibleToWorking,
    Settings,
    Exit,
}

/// Shows the main menu and returns the selection.
pub fn main_menu<R: BufRead, W: Write>(
    tr: &Translator,
    input: &mut R,
    out: &mut W,
) -> Result<MenuChoice, AppError> {
    writeln!(out, "{}", tr.t(keys::MAIN_MENU_TITLE))?;
    writeln!(out, "{}", tr.t(keys::MAIN_MENU_TASK1))?;
    writeln!(out, "{}", tr.t(keys::MAIN_MENU_TASK2))?;
    writeln!(out, "{}", tr.t(keys::MAIN_MENU_SETTINGS))?;
    writeln!(out, "{}", tr.t(keys::MAIN_MENU_EXIT))?;
    loop {
        let sel = read_line(&tr.t(keys::PROMPT_MENU_SELECT), input, out)?;
        match sel.trim() {
            "1" => return Ok(MenuChoice::WorkingToDry),
            "2" => return Ok(MenuChoice::CombustibleToWorking),
            "3" => return Ok(MenuChoice::Settings),
            "0" => return Ok(MenuChoice::Exit),
            _ => writeln!(out, "{}", tr.t(keys::INVALID_SELECTION_RETRY))?,
        }
    }
}

/// Prompts for every field of `mode`, in validation order. Values are kept
/// as typed; an empty line stays empty so the calculator reports it missing.
pub fn collect_values<R: BufRead, W: Write>(
    mode: CalcMode,
    tr: &Translator,
    input: &mut R,
    out: &mut W,
) -> Result<RawValues, AppError> {
    let mut values = RawValues::new();
    for field in mode.fields() {
        let prompt = tr.tf(
            keys::PROMPT_FIELD,
            &[
                ("label", i18n::field_label(*field, tr)),
                ("unit", field.unit().to_string()),
            ],
        );
        let line = read_line(&prompt, input, out)?;
        values.insert(field.key().to_string(), line.trim().to_string());
    }
    Ok(values)
}

/// Runs one calculation interactively and prints the report or the error.
pub fn handle_calculation<R: BufRead, W: Write>(
    mode: CalcMode,
    cfg: &Config,
    tr: &Translator,
    input: &mut R,
    out: &mut W,
) -> Result<(), AppError> {
    writeln!(out, "\n-- {} --", report::mode_title(mode, tr))?;
    let help = match mode {
        CalcMode::WorkingToDry => keys::HELP_WORKING_TO_DRY,
        CalcMode::CombustibleToWorking => keys::HELP_COMBUSTIBLE_TO_WORKING,
    };
    writeln!(out, "{}", tr.t(help))?;

    let values = collect_values(mode, tr, input, out)?;
    match fuel::compute(mode, &values) {
        Ok(result) => {
            let notes = fuel::advisories(&values, &result);
            let opts = ReportOptions {
                precision: cfg.precision,
                heating_value_unit: cfg.heating_value_unit,
            };
            let report = report::build_report(&result, &notes, &opts, tr);
            writeln!(out)?;
            write!(out, "{}", report.to_text(tr))?;
        }
        Err(err) => {
            writeln!(
                out,
                "{}: {}",
                tr.t(keys::ERROR_PREFIX),
                i18n::localize_error(&err, tr)
            )?;
        }
    }
    Ok(())
}

/// Settings menu. Returns `true` when something changed.
pub fn handle_settings<R: BufRead, W: Write>(
    tr: &Translator,
    cfg: &mut Config,
    input: &mut R,
    out: &mut W,
) -> Result<bool, AppError> {
    writeln!(out, "{}", tr.t(keys::SETTINGS_HEADING))?;
    writeln!(
        out,
        "{}",
        tr.tf(
            keys::SETTINGS_CURRENT,
            &[
                ("language", cfg.language.clone()),
                ("precision", cfg.precision.to_string()),
                ("unit", cfg.heating_value_unit.symbol().to_string()),
            ],
        )
    )?;
    writeln!(out, "{}", tr.t(keys::SETTINGS_OPTIONS))?;
    let sel = read_line(&tr.t(keys::SETTINGS_PROMPT_CHANGE), input, out)?;

    let changed = match sel.trim() {
        "" => return Ok(false),
        "1" => {
            let lang = read_line(&tr.t(keys::SETTINGS_PROMPT_LANGUAGE), input, out)?;
            let lang = lang.trim().to_lowercase();
            if lang == "auto" || i18n::normalize_lang(&lang).is_some() {
                cfg.language = lang;
                true
            } else {
                false
            }
        }
        "2" => {
            let p = read_line(&tr.t(keys::SETTINGS_PROMPT_PRECISION), input, out)?;
            match p.trim().parse::<usize>() {
                Ok(p) if p <= MAX_PRECISION => {
                    cfg.precision = p;
                    true
                }
                _ => false,
            }
        }
        "3" => {
            let u = read_line(&tr.t(keys::SETTINGS_PROMPT_UNIT), input, out)?;
            match HeatingValueUnit::from_symbol(&u) {
                Some(unit) => {
                    cfg.heating_value_unit = unit;
                    true
                }
                None => false,
            }
        }
        _ => false,
    };

    if !changed {
        writeln!(out, "{}", tr.t(keys::SETTINGS_INVALID))?;
    }
    Ok(changed)
}

fn read_line<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    out: &mut W,
) -> Result<String, AppError> {
    write!(out, "{prompt}")?;
    out.flush()?;
    let mut buf = String::new();
    if input.read_line(&mut buf)? == 0 {
        return Err(AppError::InputClosed);
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Cursor;

    fn run_menu(script: &str) -> (Result<MenuChoice, AppError>, String) {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        let res = main_menu(&Translator::new("en"), &mut input, &mut out);
        (res, String::from_utf8(out).unwrap())
    }

    #[rstest]
    #[case("1\n", MenuChoice::WorkingToDry)]
    #[case("2\n", MenuChoice::CombustibleToWorking)]
    #[case("3\n", MenuChoice::Settings)]
    #[case(" 0 \n", MenuChoice::Exit)]
    fn menu_selection(#[case] script: &str, #[case] expected: MenuChoice) {
        assert_eq!(run_menu(script).0.unwrap(), expected);
    }

    #[test]
    fn menu_retries_on_bad_input() {
        let (res, out) = run_menu("9\nx\n2\n");
        assert_eq!(res.unwrap(), MenuChoice::CombustibleToWorking);
        assert_eq!(out.matches("Invalid input. Please try again.").count(), 2);
    }

    #[test]
    fn menu_reports_closed_input() {
        assert!(matches!(run_menu("").0, Err(AppError::InputClosed)));
    }

    #[test]
    fn values_are_collected_in_field_order() {
        let mut input = Cursor::new(b"5\n75\n2\n8\n10\n15\n300\n 30,5 \n".to_vec());
        let mut out = Vec::new();
        let values = collect_values(
            CalcMode::CombustibleToWorking,
            &Translator::new("en"),
            &mut input,
            &mut out,
        )
        .unwrap();
        assert_eq!(values.len(), 8);
        assert_eq!(values["Qg"], "30,5");
        assert_eq!(values["V"], "300");
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("Hydrogen H [%]: "), "{out}");
        assert!(out.contains("Vanadium V [mg/kg]: "));
    }

    #[test]
    fn calculation_prints_localized_error() {
        let mut input = Cursor::new(b"4\n60\n1\n1\n10\n\n20\n".to_vec());
        let mut out = Vec::new();
        handle_calculation(
            CalcMode::WorkingToDry,
            &Config::default(),
            &Translator::new("uk"),
            &mut input,
            &mut out,
        )
        .unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Помилка: Поле W є обов'язковим."), "{out}");
    }

    #[test]
    fn calculation_prints_report() {
        let mut input = Cursor::new(b"5\n75\n2\n8\n10\n15\n300\n30\n".to_vec());
        let mut out = Vec::new();
        handle_calculation(
            CalcMode::CombustibleToWorking,
            &Config::default(),
            &Translator::new("en"),
            &mut input,
            &mut out,
        )
        .unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Q_r"), "{out}");
        assert!(out.contains("23.375"));
        assert!(out.contains("225.000"));
    }

    #[rstest]
    #[case("2\n4\n", true)]
    #[case("2\n11\n", false)]
    #[case("3\nkcal/kg\n", true)]
    #[case("3\nBTU\n", false)]
    #[case("1\nen\n", true)]
    #[case("1\nklingon\n", false)]
    #[case("7\n", false)]
    #[case("\n", false)]
    fn settings_changes(#[case] script: &str, #[case] changed: bool) {
        let mut cfg = Config::default();
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        let res = handle_settings(&Translator::new("en"), &mut cfg, &mut input, &mut out).unwrap();
        assert_eq!(res, changed);
        assert_eq!(cfg != Config::default(), changed);
    }

    #[test]
    fn settings_store_new_unit() {
        let mut cfg = Config::default();
        let mut input = Cursor::new(b"3\nkJ/kg\n".to_vec());
        handle_settings(&Translator::new("en"), &mut cfg, &mut input, &mut Vec::new()).unwrap();
        assert_eq!(cfg.heating_value_unit, HeatingValueUnit::KjPerKg);
    }
}
