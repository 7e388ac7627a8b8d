//! Tabular summaries of plans, schemes and fold results.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use survey_model::{CodingPlan, ImputationRule};
use survey_standards::SchemeSummary;
use survey_transform::SubjectOutcome;

/// One coded field of a plan, flattened for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodedFieldRow {
    pub field: String,
    pub mode: &'static str,
    pub scheme_id: String,
    pub fold: &'static str,
    pub cleaner: Option<&'static str>,
    pub in_theme_distribution: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRow {
    pub dataset: String,
    pub raw_field: String,
    pub raw_fold: &'static str,
    pub ws_code: Option<String>,
    pub imputation: Option<&'static str>,
    pub coded: Vec<CodedFieldRow>,
}

pub fn plan_rows<'a>(plans: impl IntoIterator<Item = &'a CodingPlan>) -> Vec<PlanRow> {
    plans
        .into_iter()
        .map(|plan| PlanRow {
            dataset: plan.dataset_name().to_string(),
            raw_field: plan.raw_field().to_string(),
            raw_fold: plan.raw_field_fold_strategy().as_str(),
            ws_code: plan.ws_code().map(|code| code.code_id.clone()),
            imputation: plan.code_imputation().map(ImputationRule::as_str),
            coded: plan
                .coding_configurations()
                .iter()
                .map(|config| CodedFieldRow {
                    field: config.coded_field().to_string(),
                    mode: config.coding_mode().as_str(),
                    scheme_id: config.code_scheme().scheme_id().to_string(),
                    fold: config.fold_strategy().as_str(),
                    cleaner: config.cleaner().map(|cleaner| cleaner.as_str()),
                    in_theme_distribution: config.include_in_theme_distribution(),
                })
                .collect(),
        })
        .collect()
}

/// Plain-text plan listing, one line per plan and one indented line per
/// coded field. Stable across terminal widths.
pub fn render_plan_text(rows: &[PlanRow]) -> String {
    let mut out = String::new();
    for row in rows {
        out.push_str(&format!(
            "{} raw={} fold={}",
            row.dataset, row.raw_field, row.raw_fold
        ));
        if let Some(ws) = &row.ws_code {
            out.push_str(&format!(" ws={ws}"));
        }
        if let Some(rule) = row.imputation {
            out.push_str(&format!(" imputation={rule}"));
        }
        out.push('\n');
        for coded in &row.coded {
            out.push_str(&format!(
                "  {} {} {} {}",
                coded.field, coded.mode, coded.scheme_id, coded.fold
            ));
            if let Some(cleaner) = coded.cleaner {
                out.push_str(&format!(" cleaner={cleaner}"));
            }
            if !coded.in_theme_distribution {
                out.push_str(" theme=false");
            }
            out.push('\n');
        }
    }
    out
}

pub fn plan_table(rows: &[PlanRow]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Raw field"),
        header_cell("Raw fold"),
        header_cell("Coded field"),
        header_cell("Mode"),
        header_cell("Scheme"),
        header_cell("Label fold"),
        header_cell("WS code"),
    ]);
    apply_table_style(&mut table);
    for row in rows {
        for (idx, coded) in row.coded.iter().enumerate() {
            let first = idx == 0;
            table.add_row(vec![
                if first {
                    Cell::new(&row.dataset).add_attribute(Attribute::Bold)
                } else {
                    dim_cell("")
                },
                if first { Cell::new(&row.raw_field) } else { dim_cell("") },
                if first { Cell::new(row.raw_fold) } else { dim_cell("") },
                Cell::new(&coded.field),
                Cell::new(coded.mode),
                Cell::new(&coded.scheme_id),
                Cell::new(coded.fold),
                match (&row.ws_code, first) {
                    (Some(ws), true) => Cell::new(ws),
                    _ => dim_cell("-"),
                },
            ]);
        }
    }
    table
}

pub fn scheme_table(summaries: &[SchemeSummary]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Key"),
        header_cell("Scheme"),
        header_cell("Version"),
        header_cell("Codes"),
        header_cell("SHA-256"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for summary in summaries {
        table.add_row(vec![
            Cell::new(&summary.key).add_attribute(Attribute::Bold),
            Cell::new(&summary.scheme_id),
            summary
                .version
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(summary.code_count),
            dim_cell(&summary.sha256),
        ]);
    }
    table
}

/// Failed fields per subject. Error messages carry no participant data.
pub fn failure_table(outcomes: &[SubjectOutcome]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Subject"),
        header_cell("Field"),
        header_cell("Error"),
    ]);
    apply_table_style(&mut table);
    for outcome in outcomes {
        for error in &outcome.errors {
            table.add_row(vec![
                Cell::new(&error.subject_id),
                Cell::new(&error.field).fg(Color::Yellow),
                Cell::new(error.source.to_string()).fg(Color::Red),
            ]);
        }
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
