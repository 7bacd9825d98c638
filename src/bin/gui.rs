#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui desktop front end.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::{env, fs};

use coal_fuel_calculator::{
    app, config,
    fuel::{self, Advisory, CalcMode, CalcResult, Field, FuelCalcError, RawValues},
    i18n::{self, keys},
    report::{self, Report, ReportOptions},
    units::HeatingValueUnit,
};
use eframe::{egui, App, Frame};
use rfd::FileDialog;

fn main() -> Result<(), eframe::Error> {
    // --lang xx | --lang=xx | -L xx, --config path
    let mut cli_lang: Option<String> = None;
    let mut config_path = PathBuf::from(config::DEFAULT_CONFIG_PATH);
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        let a = &args[i];
        if let Some(val) = a.strip_prefix("--lang=") {
            cli_lang = Some(val.to_string());
        } else if let Some(val) = a.strip_prefix("--config=") {
            config_path = PathBuf::from(val);
        } else if (a == "--lang" || a == "-L") && i + 1 < args.len() {
            cli_lang = Some(args[i + 1].clone());
            i += 1;
        } else if a == "--config" && i + 1 < args.len() {
            config_path = PathBuf::from(&args[i + 1]);
            i += 1;
        }
        i += 1;
    }

    let mut app_cfg = match config::load_or_default_at(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Config error: {e}");
            config::Config::default()
        }
    };
    if let Some(lang_cli) = cli_lang {
        app_cfg.language = i18n::resolve_language(&lang_cli, Some(app_cfg.language.as_str()));
    }

    let title = app::translator_for(&app_cfg).t(keys::APP_TITLE);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([760.0, 680.0]),
        ..Default::default()
    };
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Box::new(GuiApp::new(app_cfg, config_path))),
    )
}

/// "Settings" without the CLI heading decoration.
fn settings_title(tr: &i18n::Translator) -> String {
    tr.t(keys::SETTINGS_HEADING)
        .trim()
        .trim_matches('-')
        .trim()
        .to_string()
}

type Outcome = Result<(CalcResult, Vec<Advisory>), FuelCalcError>;

struct GuiApp {
    config: config::Config,
    config_path: PathBuf,
    tr: i18n::Translator,
    mode: CalcMode,
    inputs: BTreeMap<Field, String>,
    outcome: Option<Outcome>,
    status: Option<String>,
    show_formula_modal: bool,
    show_settings_modal: bool,
    show_help_modal: bool,
    // settings window
    lang_input: String,
    precision_input: usize,
    unit_input: HeatingValueUnit,
}

impl GuiApp {
    fn new(config: config::Config, config_path: PathBuf) -> Self {
        let tr = app::translator_for(&config);
        Self {
            mode: config.default_mode,
            lang_input: config.language.clone(),
            precision_input: config.precision,
            unit_input: config.heating_value_unit,
            config,
            config_path,
            tr,
            inputs: BTreeMap::new(),
            outcome: None,
            status: None,
            show_formula_modal: false,
            show_settings_modal: false,
            show_help_modal: false,
        }
    }

    fn set_mode(&mut self, mode: CalcMode) {
        if self.mode != mode {
            self.mode = mode;
            self.outcome = None;
        }
    }

    /// Raw text of the fields shown for the current mode.
    fn raw_values(&self) -> RawValues {
        self.mode
            .fields()
            .iter()
            .map(|f| {
                let v = self.inputs.get(f).cloned().unwrap_or_default();
                (f.key().to_string(), v)
            })
            .collect()
    }

    fn calculate(&mut self) {
        let values = self.raw_values();
        self.outcome = Some(fuel::compute(self.mode, &values).map(|result| {
            let notes = fuel::advisories(&values, &result);
            (result, notes)
        }));
        self.status = None;
    }

    fn report(&self) -> Option<Report> {
        let Some(Ok((result, notes))) = &self.outcome else {
            return None;
        };
        let opts = ReportOptions {
            precision: self.config.precision,
            heating_value_unit: self.config.heating_value_unit,
        };
        Some(report::build_report(result, notes, &opts, &self.tr))
    }

    fn write_report(&self, path: &Path) -> std::io::Result<bool> {
        match self.report() {
            Some(report) => {
                fs::write(path, report.to_text(&self.tr))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn save_report_dialog(&mut self) {
        let Some(path) = FileDialog::new()
            .set_file_name("fuel_report.txt")
            .add_filter("Text", &["txt"])
            .save_file()
        else {
            return;
        };
        self.status = Some(match self.write_report(&path) {
            Ok(_) => format!("{} {}", self.tr.t(keys::REPORT_SAVED), path.display()),
            Err(e) => format!("{}: {e}", self.tr.t(keys::ERROR_PREFIX)),
        });
    }

    fn apply_settings(&mut self) {
        self.config.language = self.lang_input.clone();
        self.config.precision = self.precision_input.min(config::MAX_PRECISION);
        self.config.heating_value_unit = self.unit_input;
        self.tr = app::translator_for(&self.config);
        self.status = Some(match self.config.save_to(&self.config_path) {
            Ok(()) => self.tr.t(keys::SETTINGS_SAVED),
            Err(e) => format!("{}: {e}", self.tr.t(keys::ERROR_PREFIX)),
        });
    }

    fn ui_form(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for mode in [CalcMode::WorkingToDry, CalcMode::CombustibleToWorking] {
                let selected = self.mode == mode;
                if ui
                    .selectable_label(selected, report::mode_title(mode, &self.tr))
                    .clicked()
                {
                    self.set_mode(mode);
                }
            }
        });
        ui.separator();
        let help = match self.mode {
            CalcMode::WorkingToDry => keys::HELP_WORKING_TO_DRY,
            CalcMode::CombustibleToWorking => keys::HELP_COMBUSTIBLE_TO_WORKING,
        };
        ui.label(egui::RichText::new(self.tr.t(help)).small());
        ui.add_space(6.0);

        egui::Grid::new("inputs")
            .num_columns(3)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                for field in self.mode.fields() {
                    ui.label(i18n::field_label(*field, &self.tr));
                    ui.add(
                        egui::TextEdit::singleline(self.inputs.entry(*field).or_default())
                            .desired_width(120.0),
                    );
                    ui.label(field.unit());
                    ui.end_row();
                }
            });
        ui.add_space(6.0);
        if ui.button(self.tr.t(keys::CALCULATE)).clicked() {
            self.calculate();
        }
    }

    fn ui_result(&mut self, ui: &mut egui::Ui) {
        match &self.outcome {
            None => return,
            Some(Err(err)) => {
                ui.colored_label(
                    ui.visuals().error_fg_color,
                    i18n::localize_error(err, &self.tr),
                );
                return;
            }
            Some(Ok(_)) => {}
        }
        let Some(report) = self.report() else {
            return;
        };

        ui.heading(self.tr.t(keys::RESULT_HEADING));
        for (idx, section) in report.sections.iter().enumerate() {
            ui.label(egui::RichText::new(&section.title).strong());
            egui::Grid::new(("result", idx))
                .num_columns(4)
                .striped(true)
                .show(ui, |ui| {
                    for row in &section.rows {
                        ui.monospace(row.symbol);
                        ui.monospace(report.format_value(row.value));
                        ui.label(row.unit);
                        ui.label(&row.label);
                        ui.end_row();
                    }
                });
            ui.add_space(4.0);
        }
        if !report.notes.is_empty() {
            ui.label(egui::RichText::new(self.tr.t(keys::ADVISORY_HEADING)).strong());
            for note in &report.notes {
                ui.colored_label(ui.visuals().warn_fg_color, format!("• {note}"));
            }
        }
        ui.add_space(6.0);
        if ui.button(self.tr.t(keys::SAVE_REPORT)).clicked() {
            self.save_report_dialog();
        }
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(self.tr.t(keys::APP_TITLE));
                ui.separator();
                if ui.button(self.tr.t(keys::FORMULA_TITLE)).clicked() {
                    self.show_formula_modal = true;
                }
                if ui.button(settings_title(&self.tr)).clicked() {
                    self.show_settings_modal = true;
                }
                if ui.button(self.tr.t(keys::ABOUT_TITLE)).clicked() {
                    self.show_help_modal = true;
                }
            });
        });

        if self.show_settings_modal {
            let mut open = true;
            let mut save = false;
            egui::Window::new(settings_title(&self.tr))
                .collapsible(false)
                .resizable(false)
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.label(self.tr.t(keys::LANGUAGE));
                    egui::ComboBox::from_id_source("lang_choice")
                        .selected_text(&self.lang_input)
                        .show_ui(ui, |ui| {
                            ui.selectable_value(&mut self.lang_input, "auto".into(), "auto");
                            ui.selectable_value(&mut self.lang_input, "uk".into(), "Українська");
                            ui.selectable_value(&mut self.lang_input, "en".into(), "English");
                        });
                    ui.separator();
                    ui.label(self.tr.t(keys::PRECISION));
                    ui.add(egui::Slider::new(
                        &mut self.precision_input,
                        0..=config::MAX_PRECISION,
                    ));
                    ui.separator();
                    ui.label(self.tr.t(keys::HEATING_UNIT));
                    egui::ComboBox::from_id_source("heating_unit")
                        .selected_text(self.unit_input.symbol())
                        .show_ui(ui, |ui| {
                            for unit in HeatingValueUnit::ALL {
                                ui.selectable_value(&mut self.unit_input, unit, unit.symbol());
                            }
                        });
                    ui.separator();
                    if ui.button(self.tr.t(keys::SAVE_SETTINGS)).clicked() {
                        save = true;
                    }
                });
            self.show_settings_modal = open;
            if save {
                self.apply_settings();
            }
        }

        if self.show_help_modal {
            egui::Window::new(self.tr.t(keys::ABOUT_TITLE))
                .collapsible(false)
                .open(&mut self.show_help_modal)
                .show(ctx, |ui| {
                    ui.label(self.tr.t(keys::ABOUT_BODY));
                    ui.label(format!(
                        "{}: v{}",
                        self.tr.t(keys::VERSION),
                        env!("CARGO_PKG_VERSION")
                    ));
                });
        }

        if self.show_formula_modal {
            egui::Window::new(self.tr.t(keys::FORMULA_TITLE))
                .collapsible(true)
                .resizable(true)
                .open(&mut self.show_formula_modal)
                .show(ctx, |ui| {
                    ui.heading(report::mode_title(CalcMode::WorkingToDry, &self.tr));
                    ui.label(self.tr.t(keys::FORMULA_TASK1));
                    ui.separator();
                    ui.heading(report::mode_title(CalcMode::CombustibleToWorking, &self.tr));
                    ui.label(self.tr.t(keys::FORMULA_TASK2));
                });
        }

        if let Some(msg) = &self.status {
            egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
                ui.label(msg);
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    self.ui_form(ui);
                    ui.separator();
                    self.ui_result(ui);
                });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english_app(dir: &Path) -> GuiApp {
        let cfg = config::Config {
            language: "en".into(),
            ..Default::default()
        };
        GuiApp::new(cfg, dir.join("config.toml"))
    }

    fn fill(app: &mut GuiApp, pairs: &[(Field, &str)]) {
        for (f, v) in pairs {
            app.inputs.insert(*f, v.to_string());
        }
    }

    #[test]
    fn starts_in_configured_mode() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config::Config {
            default_mode: CalcMode::CombustibleToWorking,
            ..Default::default()
        };
        let app = GuiApp::new(cfg, dir.path().join("config.toml"));
        assert_eq!(app.mode, CalcMode::CombustibleToWorking);
        assert!(app.outcome.is_none());
    }

    #[test]
    fn calculate_task_two_from_text_fields() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = english_app(dir.path());
        app.set_mode(CalcMode::CombustibleToWorking);
        fill(
            &mut app,
            &[
                (Field::H, "5"),
                (Field::C, "75"),
                (Field::S, "2"),
                (Field::O, "8"),
                (Field::W, "10"),
                (Field::A, "15"),
                (Field::V, "300"),
                (Field::Qg, "30,0"),
            ],
        );
        app.calculate();
        let report = app.report().unwrap();
        assert_eq!(report.format_value(report.row("Q_r").unwrap().value), "23.375");
    }

    #[test]
    fn hidden_fields_are_not_submitted() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = english_app(dir.path());
        fill(&mut app, &[(Field::V, "abc"), (Field::Qg, "")]);
        let values = app.raw_values();
        assert!(!values.contains_key("V"));
        assert_eq!(values.len(), 7);
    }

    #[test]
    fn error_is_kept_and_report_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = english_app(dir.path());
        app.calculate();
        assert!(matches!(
            app.outcome,
            Some(Err(FuelCalcError::MissingField { field: Field::H }))
        ));
        assert!(!app.write_report(&dir.path().join("r.txt")).unwrap());
    }

    #[test]
    fn report_file_contains_results() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = english_app(dir.path());
        fill(
            &mut app,
            &[
                (Field::H, "4"),
                (Field::C, "60"),
                (Field::S, "1"),
                (Field::N, "1"),
                (Field::O, "10"),
                (Field::W, "8"),
                (Field::A, "20"),
            ],
        );
        app.calculate();
        let path = dir.path().join("r.txt");
        assert!(app.write_report(&path).unwrap());
        let text = fs::read_to_string(path).unwrap();
        assert!(text.contains("K_rg"));
        assert!(text.contains("1.389"));
    }

    #[test]
    fn switching_mode_clears_result() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = english_app(dir.path());
        app.calculate();
        app.set_mode(CalcMode::CombustibleToWorking);
        assert!(app.outcome.is_none());
    }

    #[test]
    fn settings_are_applied_and_saved() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = english_app(dir.path());
        app.lang_input = "uk".into();
        app.precision_input = 99;
        app.unit_input = HeatingValueUnit::KcalPerKg;
        app.apply_settings();
        assert_eq!(app.config.precision, config::MAX_PRECISION);
        assert_eq!(app.tr.t(keys::CALCULATE), "Розрахувати");
        let saved = config::load_or_default_at(dir.path().join("config.toml")).unwrap();
        assert_eq!(saved.heating_value_unit, HeatingValueUnit::KcalPerKg);
        assert_eq!(saved.language, "uk");
    }
}
