//! Turns a calculation result into labeled rows for the CLI, GUI and web page.

use crate::fuel::{Advisory, CalcMode, CalcResult, Field};
use crate::i18n::{self, keys, Translator};
use crate::units::{convert_heating_value, HeatingValueUnit};

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub symbol: &'static str,
    pub label: String,
    pub value: f64,
    pub unit: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportSection {
    pub title: String,
    pub rows: Vec<ReportRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub title: String,
    pub sections: Vec<ReportSection>,
    pub notes: Vec<String>,
    pub precision: usize,
}

/// Display options shared by all front ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportOptions {
    pub precision: usize,
    pub heating_value_unit: HeatingValueUnit,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            precision: 3,
            heating_value_unit: HeatingValueUnit::MjPerKg,
        }
    }
}

pub fn mode_title(mode: CalcMode, tr: &Translator) -> String {
    match mode {
        CalcMode::WorkingToDry => tr.t(keys::MODE_WORKING_TO_DRY),
        CalcMode::CombustibleToWorking => tr.t(keys::MODE_COMBUSTIBLE_TO_WORKING),
    }
}

fn coefficient(symbol: &'static str, label_key: &str, value: f64, tr: &Translator) -> ReportRow {
    ReportRow {
        symbol,
        label: tr.t(label_key),
        value,
        unit: "",
    }
}

fn element(symbol: &'static str, field: Field, value: f64, tr: &Translator) -> ReportRow {
    ReportRow {
        symbol,
        label: i18n::field_label(field, tr),
        value,
        unit: "%",
    }
}

fn heating(
    symbol: &'static str,
    label_key: &str,
    value_mj: f64,
    opts: &ReportOptions,
    tr: &Translator,
) -> ReportRow {
    ReportRow {
        symbol,
        label: tr.t(label_key),
        value: convert_heating_value(value_mj, HeatingValueUnit::MjPerKg, opts.heating_value_unit),
        unit: opts.heating_value_unit.symbol(),
    }
}

/// Builds the report for a successful calculation.
pub fn build_report(
    result: &CalcResult,
    advisories: &[Advisory],
    opts: &ReportOptions,
    tr: &Translator,
) -> Report {
    let sections = match result {
        CalcResult::WorkingToDry(r) => vec![
            ReportSection {
                title: tr.t(keys::RESULT_COEFFICIENTS),
                rows: vec![
                    coefficient("K_rs", keys::RESULT_K_RS, r.k_rs, tr),
                    coefficient("K_rg", keys::RESULT_K_RG, r.k_rg, tr),
                ],
            },
            ReportSection {
                title: tr.t(keys::RESULT_DRY),
                rows: vec![
                    element("H_s", Field::H, r.dry.hydrogen, tr),
                    element("C_s", Field::C, r.dry.carbon, tr),
                    element("S_s", Field::S, r.dry.sulphur, tr),
                    element("N_s", Field::N, r.dry.nitrogen, tr),
                    element("O_s", Field::O, r.dry.oxygen, tr),
                    element("A_s", Field::A, r.dry.ash, tr),
                ],
            },
            ReportSection {
                title: tr.t(keys::RESULT_COMBUSTIBLE),
                rows: vec![
                    element("H_g", Field::H, r.combustible.hydrogen, tr),
                    element("C_g", Field::C, r.combustible.carbon, tr),
                    element("S_g", Field::S, r.combustible.sulphur, tr),
                    element("N_g", Field::N, r.combustible.nitrogen, tr),
                    element("O_g", Field::O, r.combustible.oxygen, tr),
                ],
            },
            ReportSection {
                title: tr.t(keys::RESULT_HEATING),
                rows: vec![
                    heating("Q_r", keys::RESULT_Q_WORKING, r.q_working_mj, opts, tr),
                    heating("Q_s", keys::RESULT_Q_DRY, r.q_dry_mj, opts, tr),
                    heating("Q_g", keys::RESULT_Q_COMBUSTIBLE, r.q_combustible_mj, opts, tr),
                ],
            },
        ],
        CalcResult::CombustibleToWorking(r) => vec![
            ReportSection {
                title: tr.t(keys::RESULT_COEFFICIENTS),
                rows: vec![coefficient("K_gr", keys::RESULT_K_GR, r.k_gr, tr)],
            },
            ReportSection {
                title: tr.t(keys::RESULT_WORKING),
                rows: vec![
                    element("H_r", Field::H, r.working.hydrogen, tr),
                    element("C_r", Field::C, r.working.carbon, tr),
                    element("S_r", Field::S, r.working.sulphur, tr),
                    element("O_r", Field::O, r.working.oxygen, tr),
                    element("A_r", Field::A, r.working.ash, tr),
                    ReportRow {
                        symbol: "V_r",
                        label: tr.t(keys::RESULT_V_WORKING),
                        value: r.vanadium_mg_per_kg,
                        unit: "mg/kg",
                    },
                ],
            },
            ReportSection {
                title: tr.t(keys::RESULT_HEATING),
                rows: vec![heating("Q_r", keys::RESULT_Q_WORKING, r.q_working_mj, opts, tr)],
            },
        ],
    };

    Report {
        title: mode_title(result.mode(), tr),
        sections,
        notes: advisories
            .iter()
            .map(|a| i18n::localize_advisory(a, tr))
            .collect(),
        precision: opts.precision,
    }
}

impl Report {
    pub fn format_value(&self, value: f64) -> String {
        format!("{:.*}", self.precision, value)
    }

    /// Plain-text rendering used by the CLI and the saved report file.
    pub fn to_text(&self, tr: &Translator) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", self.title));
        for section in &self.sections {
            out.push_str(&format!("\n{}:\n", section.title));
            for row in &section.rows {
                out.push_str(&format!(
                    "  {:<5} {:>14} {:<8} {}\n",
                    row.symbol,
                    self.format_value(row.value),
                    row.unit,
                    row.label
                ));
            }
        }
        if !self.notes.is_empty() {
            out.push_str(&format!("\n{}:\n", tr.t(keys::ADVISORY_HEADING)));
            for note in &self.notes {
                out.push_str(&format!("  - {note}\n"));
            }
        }
        out
    }

    pub fn row(&self, symbol: &str) -> Option<&ReportRow> {
        self.sections
            .iter()
            .flat_map(|s| s.rows.iter())
            .find(|r| r.symbol == symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuel::{compute, raw_values};
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    fn task2_report(opts: ReportOptions) -> Report {
        let values = raw_values([
            ("H", "5"),
            ("C", "75"),
            ("S", "2"),
            ("O", "8"),
            ("W", "10"),
            ("A", "15"),
            ("V", "300"),
            ("Qg", "30"),
        ]);
        let res = compute(CalcMode::CombustibleToWorking, &values).unwrap();
        build_report(&res, &[], &opts, &Translator::new("en"))
    }

    #[test]
    fn task_two_rows() {
        let report = task2_report(ReportOptions::default());
        let symbols: Vec<_> = report
            .sections
            .iter()
            .flat_map(|s| s.rows.iter().map(|r| r.symbol))
            .collect();
        assert_eq!(symbols, vec!["K_gr", "H_r", "C_r", "S_r", "O_r", "A_r", "V_r", "Q_r"]);
        assert_eq!(report.format_value(report.row("Q_r").unwrap().value), "23.375");
        assert_eq!(report.row("V_r").unwrap().unit, "mg/kg");
    }

    #[test]
    fn heating_values_follow_display_unit() {
        let report = task2_report(ReportOptions {
            precision: 1,
            heating_value_unit: HeatingValueUnit::KjPerKg,
        });
        let q = report.row("Q_r").unwrap();
        assert_relative_eq!(q.value, 23375.0, epsilon = 1e-6);
        assert_eq!(q.unit, "kJ/kg");
        // composition rows are untouched by the heating value unit
        assert_relative_eq!(report.row("C_r").unwrap().value, 56.25, epsilon = 1e-12);
    }

    #[test]
    fn text_rendering_layout() {
        let tr = Translator::new("en");
        let report = task2_report(ReportOptions::default());
        let text = report.to_text(&tr);
        let lines: Vec<&str> = text.lines().collect();
        assert!(text.ends_with('\n'));
        assert_eq!(lines[0], report.title);
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], format!("{}:", report.sections[0].title));
        let k_gr = &report.sections[0].rows[0];
        assert_eq!(k_gr.symbol, "K_gr");
        assert_eq!(
            lines[3],
            format!("  K_gr           0.750 {:<8} {}", k_gr.unit, k_gr.label)
        );
        assert_eq!(lines.len(), 1 + report.sections.len() * 2 + 8);
        assert!(!text.contains("Notes:"));
    }

    #[test]
    fn text_rendering_lists_notes() {
        let values = raw_values([
            ("H", "0"),
            ("C", "0"),
            ("S", "0"),
            ("N", "0"),
            ("O", "0"),
            ("W", "99.6"),
            ("A", "0"),
        ]);
        let tr = Translator::new("en");
        let res = compute(CalcMode::WorkingToDry, &values).unwrap();
        let notes = crate::fuel::advisories(&values, &res);
        let report = build_report(&res, &notes, &ReportOptions::default(), &tr);
        let text = report.to_text(&tr);
        assert!(text.starts_with("Task 1: working mass → dry & combustible"));
        assert!(text.contains("-2.490"), "{text}");
        assert!(text.contains("Notes:"));
        assert!(text.contains("Negative heating value"));
    }
}
