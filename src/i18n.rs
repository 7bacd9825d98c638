use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

use crate::fuel::{Advisory, Constraint, Field, FuelCalcError};

/// String keys, grouped by screen.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_TITLE: &str = "general.app_title";
    pub const APP_EXIT: &str = "general.app_exit";
    pub const VERSION: &str = "general.version";

    pub const MAIN_MENU_TITLE: &str = "main_menu.title";
    pub const MAIN_MENU_TASK1: &str = "main_menu.task1";
    pub const MAIN_MENU_TASK2: &str = "main_menu.task2";
    pub const MAIN_MENU_SETTINGS: &str = "main_menu.settings";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";

    pub const MODE_WORKING_TO_DRY: &str = "mode.working_to_dry";
    pub const MODE_COMBUSTIBLE_TO_WORKING: &str = "mode.combustible_to_working";
    pub const HELP_WORKING_TO_DRY: &str = "help.working_to_dry";
    pub const HELP_COMBUSTIBLE_TO_WORKING: &str = "help.combustible_to_working";
    pub const PROMPT_FIELD: &str = "prompt.field";

    pub const FIELD_H: &str = "field.H";
    pub const FIELD_C: &str = "field.C";
    pub const FIELD_S: &str = "field.S";
    pub const FIELD_N: &str = "field.N";
    pub const FIELD_O: &str = "field.O";
    pub const FIELD_W: &str = "field.W";
    pub const FIELD_A: &str = "field.A";
    pub const FIELD_V: &str = "field.V";
    pub const FIELD_QG: &str = "field.Qg";

    pub const ERROR_MISSING_FIELD: &str = "error.missing_field";
    pub const ERROR_NON_NUMERIC: &str = "error.non_numeric";
    pub const ERROR_MOISTURE: &str = "error.moisture_below_100";
    pub const ERROR_MOISTURE_ASH: &str = "error.moisture_ash_below_100";

    pub const RESULT_HEADING: &str = "result.heading";
    pub const RESULT_COEFFICIENTS: &str = "result.coefficients";
    pub const RESULT_DRY: &str = "result.dry";
    pub const RESULT_COMBUSTIBLE: &str = "result.combustible";
    pub const RESULT_WORKING: &str = "result.working";
    pub const RESULT_HEATING: &str = "result.heating";
    pub const RESULT_K_RS: &str = "result.k_rs";
    pub const RESULT_K_RG: &str = "result.k_rg";
    pub const RESULT_K_GR: &str = "result.k_gr";
    pub const RESULT_Q_WORKING: &str = "result.q_working";
    pub const RESULT_Q_DRY: &str = "result.q_dry";
    pub const RESULT_Q_COMBUSTIBLE: &str = "result.q_combustible";
    pub const RESULT_V_WORKING: &str = "result.v_working";

    pub const ADVISORY_HEADING: &str = "advisory.heading";
    pub const ADVISORY_NEGATIVE_Q: &str = "advisory.negative_heating_value";
    pub const ADVISORY_COMPOSITION_SUM: &str = "advisory.composition_sum";

    pub const SETTINGS_HEADING: &str = "settings.heading";
    pub const SETTINGS_CURRENT: &str = "settings.current";
    pub const SETTINGS_OPTIONS: &str = "settings.options";
    pub const SETTINGS_PROMPT_CHANGE: &str = "settings.prompt_change";
    pub const SETTINGS_PROMPT_LANGUAGE: &str = "settings.prompt_language";
    pub const SETTINGS_PROMPT_PRECISION: &str = "settings.prompt_precision";
    pub const SETTINGS_PROMPT_UNIT: &str = "settings.prompt_unit";
    pub const SETTINGS_INVALID: &str = "settings.invalid";
    pub const SETTINGS_SAVED: &str = "settings.saved";

    pub const CALCULATE: &str = "action.calculate";
    pub const SAVE_REPORT: &str = "action.save_report";
    pub const REPORT_SAVED: &str = "action.report_saved";
    pub const FORMULA_TITLE: &str = "formula.title";
    pub const FORMULA_TASK1: &str = "formula.task1";
    pub const FORMULA_TASK2: &str = "formula.task2";
    pub const ABOUT_TITLE: &str = "about.title";
    pub const ABOUT_BODY: &str = "about.body";
    pub const LANGUAGE: &str = "settings.language";
    pub const PRECISION: &str = "settings.precision";
    pub const HEATING_UNIT: &str = "settings.heating_unit";
    pub const SAVE_SETTINGS: &str = "settings.save";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Uk,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("en") {
            Language::En
        } else {
            Language::Uk
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Uk => "uk",
            Language::En => "en",
        }
    }
}

/// Runtime string bundle: built-in tables plus optional TOML overrides.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE)
    }
}

/// Fallback when neither the CLI, the config nor the system names a language.
pub const DEFAULT_LANGUAGE: &str = "uk-ua";

impl Translator {
    /// Builds a translator from a code (uk/en). Unknown codes fall back to uk.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// Like [`Translator::new`] but also loads `<code>.toml` from `pack_dir`,
    /// then from `locales/`. Missing files leave only the built-in strings.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let overrides = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides("locales", lang_code));
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    pub fn language_code(&self) -> &'static str {
        self.lang.as_code()
    }

    /// Looks the key up in the loaded pack only.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.overrides.as_ref().and_then(|m| m.get(key).cloned())
    }

    /// Translates a key: pack override, then built-in table, then Ukrainian.
    pub fn t(&self, key: &str) -> String {
        if let Some(v) = self.lookup(key) {
            return v;
        }
        match self.lang {
            Language::En => en(key).unwrap_or_else(|| uk(key)).to_string(),
            Language::Uk => uk(key).to_string(),
        }
    }

    /// Translates and fills `{name}` placeholders.
    pub fn tf(&self, key: &str, vars: &[(&str, String)]) -> String {
        fill_template(&self.t(key), vars)
    }
}

fn fill_template(template: &str, vars: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (k, v) in vars {
        out = out.replace(&format!("{{{k}}}"), v);
    }
    out
}

/// Message shown to the user for a calculation error.
pub fn localize_error(err: &FuelCalcError, tr: &Translator) -> String {
    match err {
        FuelCalcError::MissingField { field } => {
            tr.tf(keys::ERROR_MISSING_FIELD, &[("field", field.key().to_string())])
        }
        FuelCalcError::NonNumeric { field } => {
            tr.tf(keys::ERROR_NON_NUMERIC, &[("field", field.key().to_string())])
        }
        FuelCalcError::DomainViolation(Constraint::MoistureBelow100) => tr.t(keys::ERROR_MOISTURE),
        FuelCalcError::DomainViolation(Constraint::MoistureAshBelow100) => {
            tr.t(keys::ERROR_MOISTURE_ASH)
        }
    }
}

pub fn localize_advisory(advisory: &Advisory, tr: &Translator) -> String {
    match advisory {
        Advisory::NegativeHeatingValue => tr.t(keys::ADVISORY_NEGATIVE_Q),
        Advisory::CompositionSum { total } => {
            tr.tf(keys::ADVISORY_COMPOSITION_SUM, &[("total", format!("{total:.2}"))])
        }
    }
}

/// Descriptive label of an input field, e.g. "Водень H".
pub fn field_label(field: Field, tr: &Translator) -> String {
    let key = match field {
        Field::H => keys::FIELD_H,
        Field::C => keys::FIELD_C,
        Field::S => keys::FIELD_S,
        Field::N => keys::FIELD_N,
        Field::O => keys::FIELD_O,
        Field::W => keys::FIELD_W,
        Field::A => keys::FIELD_A,
        Field::V => keys::FIELD_V,
        Field::Qg => keys::FIELD_QG,
    };
    tr.t(key)
}

/// Picks the language code: CLI flag, then config, then system locale.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}

/// Canonical code for a user-supplied language name; `None` for `auto` or unknown names.
pub fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "uk" | "ua" | "uk-ua" | "uk_ua" => Some("uk-ua".into()),
        "en" | "en-us" | "en-gb" | "en-uk" => Some("en-us".into()),
        "auto" | "" => None,
        other if other.starts_with("uk") => Some("uk-ua".into()),
        other if other.starts_with("en") => Some("en-us".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "uk" => Some("uk-ua".into()),
        "en" => Some("en-us".into()),
        _ => None,
    }
}

/// Guesses the language from the system locale, then `LANG` / `LC_ALL`.
pub fn detect_system_language() -> Option<String> {
    if let Some(lang) = get_locale().as_deref().and_then(normalize_locale_string) {
        return Some(lang);
    }
    ["LANG", "LC_ALL"]
        .into_iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|v| normalize_locale_string(&v))
}

/// Loads a TOML language pack. Nested tables flatten into dotted keys.
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let try_load = |code: &str| -> Option<HashMap<String, String>> {
        let path = Path::new(dir).join(format!("{code}.toml"));
        let content = fs::read_to_string(path).ok()?;
        parse_toml_to_map(&content)
    };

    // full code (uk-ua), then base code (uk)
    if let Some(map) = try_load(lang) {
        return Some(map);
    }
    if let Some((base, _)) = lang.split_once(['-', '_']) {
        if let Some(map) = try_load(base) {
            return Some(map);
        }
    }
    None
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

fn uk(key: &str) -> &'static str {
    use keys::*;
    match key {
        ERROR_PREFIX => "Помилка",
        APP_TITLE => "Калькулятор палива",
        APP_EXIT => "Роботу завершено.",
        VERSION => "Версія",
        MAIN_MENU_TITLE => "\n=== Калькулятор палива ===",
        MAIN_MENU_TASK1 => "1) Робоча маса → суха та горюча",
        MAIN_MENU_TASK2 => "2) Горюча маса → робоча",
        MAIN_MENU_SETTINGS => "3) Налаштування",
        MAIN_MENU_EXIT => "0) Вихід",
        PROMPT_MENU_SELECT => "Оберіть пункт: ",
        INVALID_SELECTION_RETRY => "Невірний вибір. Спробуйте ще раз.",
        MODE_WORKING_TO_DRY => "Завдання 1: робоча маса → суха та горюча",
        MODE_COMBUSTIBLE_TO_WORKING => "Завдання 2: горюча маса → робоча",
        HELP_WORKING_TO_DRY => {
            "Введіть склад робочої маси у % (кома або крапка як десятковий роздільник)."
        }
        HELP_COMBUSTIBLE_TO_WORKING => {
            "Введіть склад горючої маси у %, W та A робочої маси, V у мг/кг та Qг у МДж/кг."
        }
        PROMPT_FIELD => "{label} [{unit}]: ",
        FIELD_H => "Водень H",
        FIELD_C => "Вуглець C",
        FIELD_S => "Сірка S",
        FIELD_N => "Азот N",
        FIELD_O => "Кисень O",
        FIELD_W => "Вологість W",
        FIELD_A => "Зольність A",
        FIELD_V => "Ванадій V",
        FIELD_QG => "Нижча теплота згоряння горючої маси Qг",
        ERROR_MISSING_FIELD => "Поле {field} є обов'язковим.",
        ERROR_NON_NUMERIC => "Поле {field} має бути числом.",
        ERROR_MOISTURE => "W має бути < 100.",
        ERROR_MOISTURE_ASH => "W + A має бути < 100.",
        RESULT_HEADING => "Результати",
        RESULT_COEFFICIENTS => "Коефіцієнти перерахунку",
        RESULT_DRY => "Склад сухої маси, %",
        RESULT_COMBUSTIBLE => "Склад горючої маси, %",
        RESULT_WORKING => "Склад робочої маси, %",
        RESULT_HEATING => "Нижча теплота згоряння",
        RESULT_K_RS => "робоча → суха",
        RESULT_K_RG => "робоча → горюча",
        RESULT_K_GR => "горюча → робоча",
        RESULT_Q_WORKING => "робоча маса",
        RESULT_Q_DRY => "суха маса",
        RESULT_Q_COMBUSTIBLE => "горюча маса",
        RESULT_V_WORKING => "ванадій у робочій масі",
        ADVISORY_HEADING => "Зауваження",
        ADVISORY_NEGATIVE_Q => "Від'ємна теплота згоряння: перевірте вологість і склад палива.",
        ADVISORY_COMPOSITION_SUM => "Сума компонентів робочої маси {total} % відрізняється від 100 %.",
        SETTINGS_HEADING => "\n-- Налаштування --",
        SETTINGS_CURRENT => "Поточні: мова {language}, точність {precision}, одиниця {unit}",
        SETTINGS_OPTIONS => "1) Мова  2) Точність  3) Одиниця теплоти згоряння",
        SETTINGS_PROMPT_CHANGE => "Що змінити (Enter: скасувати): ",
        SETTINGS_PROMPT_LANGUAGE => "Мова (uk/en/auto): ",
        SETTINGS_PROMPT_PRECISION => "Знаків після коми (0-10): ",
        SETTINGS_PROMPT_UNIT => "Одиниця (MJ/kg, kJ/kg, kcal/kg, Btu/lb): ",
        SETTINGS_INVALID => "Невірне значення, налаштування не змінено.",
        SETTINGS_SAVED => "Налаштування збережено.",
        CALCULATE => "Розрахувати",
        SAVE_REPORT => "Зберегти звіт",
        REPORT_SAVED => "Звіт збережено:",
        FORMULA_TITLE => "Формули",
        FORMULA_TASK1 => {
            "K_rs = 100/(100−W); K_rg = 100/(100−W−A); Qр = 339·C + 1030·H − 108,8·(O−S) − 25·W кДж/кг; \
             Qс = (Qр + 0,025·W)·100/(100−W); Qг = (Qр + 0,025·W)·100/(100−W−A)."
        }
        FORMULA_TASK2 => {
            "K_gr = (100−W−A)/100; Xр = Xг·K_gr; Qр = Qг·(100−W−Aр)/100 − 0,025·W МДж/кг."
        }
        ABOUT_TITLE => "Довідка",
        ABOUT_BODY => "Перерахунок складу твердого палива між робочою, сухою та горючою масою.",
        LANGUAGE => "Мова",
        PRECISION => "Точність",
        HEATING_UNIT => "Одиниця теплоти згоряння",
        SAVE_SETTINGS => "Зберегти налаштування",
        _ => "[missing translation]",
    }
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Error",
        APP_TITLE => "Fuel calculator",
        APP_EXIT => "Exiting application.",
        VERSION => "Version",
        MAIN_MENU_TITLE => "\n=== Fuel Calculator ===",
        MAIN_MENU_TASK1 => "1) Working mass → dry & combustible",
        MAIN_MENU_TASK2 => "2) Combustible mass → working",
        MAIN_MENU_SETTINGS => "3) Settings",
        MAIN_MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select menu: ",
        INVALID_SELECTION_RETRY => "Invalid input. Please try again.",
        MODE_WORKING_TO_DRY => "Task 1: working mass → dry & combustible",
        MODE_COMBUSTIBLE_TO_WORKING => "Task 2: combustible mass → working",
        HELP_WORKING_TO_DRY => "Enter the working-mass composition in % (comma or dot decimals).",
        HELP_COMBUSTIBLE_TO_WORKING => {
            "Enter the combustible-mass composition in %, working W and A, V in mg/kg and Qg in MJ/kg."
        }
        PROMPT_FIELD => "{label} [{unit}]: ",
        FIELD_H => "Hydrogen H",
        FIELD_C => "Carbon C",
        FIELD_S => "Sulphur S",
        FIELD_N => "Nitrogen N",
        FIELD_O => "Oxygen O",
        FIELD_W => "Moisture W",
        FIELD_A => "Ash A",
        FIELD_V => "Vanadium V",
        FIELD_QG => "Combustible-mass lower heating value Qg",
        ERROR_MISSING_FIELD => "Field {field} is required.",
        ERROR_NON_NUMERIC => "Field {field} must be a number.",
        ERROR_MOISTURE => "W must be < 100.",
        ERROR_MOISTURE_ASH => "W + A must be < 100.",
        RESULT_HEADING => "Results",
        RESULT_COEFFICIENTS => "Conversion coefficients",
        RESULT_DRY => "Dry mass composition, %",
        RESULT_COMBUSTIBLE => "Combustible mass composition, %",
        RESULT_WORKING => "Working mass composition, %",
        RESULT_HEATING => "Lower heating value",
        RESULT_K_RS => "working → dry",
        RESULT_K_RG => "working → combustible",
        RESULT_K_GR => "combustible → working",
        RESULT_Q_WORKING => "working mass",
        RESULT_Q_DRY => "dry mass",
        RESULT_Q_COMBUSTIBLE => "combustible mass",
        RESULT_V_WORKING => "vanadium in working mass",
        ADVISORY_HEADING => "Notes",
        ADVISORY_NEGATIVE_Q => "Negative heating value: check moisture and composition.",
        ADVISORY_COMPOSITION_SUM => "Working-mass components add up to {total} %, not 100 %.",
        SETTINGS_HEADING => "\n-- Settings --",
        SETTINGS_CURRENT => "Current: language {language}, precision {precision}, unit {unit}",
        SETTINGS_OPTIONS => "1) Language  2) Precision  3) Heating value unit",
        SETTINGS_PROMPT_CHANGE => "Enter number to change (enter to cancel): ",
        SETTINGS_PROMPT_LANGUAGE => "Language (uk/en/auto): ",
        SETTINGS_PROMPT_PRECISION => "Decimal places (0-10): ",
        SETTINGS_PROMPT_UNIT => "Unit (MJ/kg, kJ/kg, kcal/kg, Btu/lb): ",
        SETTINGS_INVALID => "Invalid value; settings unchanged.",
        SETTINGS_SAVED => "Settings saved.",
        CALCULATE => "Calculate",
        SAVE_REPORT => "Save report",
        REPORT_SAVED => "Report saved:",
        FORMULA_TITLE => "Formula reference",
        FORMULA_TASK1 => {
            "K_rs = 100/(100−W); K_rg = 100/(100−W−A); Qr = 339·C + 1030·H − 108.8·(O−S) − 25·W kJ/kg; \
             Qs = (Qr + 0.025·W)·100/(100−W); Qg = (Qr + 0.025·W)·100/(100−W−A)."
        }
        FORMULA_TASK2 => "K_gr = (100−W−A)/100; Xr = Xg·K_gr; Qr = Qg·(100−W−Ar)/100 − 0.025·W MJ/kg.",
        ABOUT_TITLE => "Help / About",
        ABOUT_BODY => "Recasts solid-fuel composition between working, dry and combustible mass.",
        LANGUAGE => "Language",
        PRECISION => "Precision",
        HEATING_UNIT => "Heating value unit",
        SAVE_SETTINGS => "Save settings",
        _ => return None,
    })
}
