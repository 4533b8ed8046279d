use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::recommend::{BudgetCategory, RecommendationReport, RecommendationResult};
use crate::registry::ItemStatus;

pub fn render_report_table(report: &RecommendationReport) -> String {
    let mut out = String::new();
    let sections: [(&str, &[RecommendationResult]); 3] = [
        ("Within budget", report.recommendations.within_budget.as_slice()),
        ("Alternatives (up to 10% over)", report.recommendations.alternatives.as_slice()),
        ("Over budget", report.recommendations.over_budget.as_slice()),
    ];
    for (heading, results) in sections {
        if results.is_empty() {
            continue;
        }
        out.push_str(heading);
        out.push('\n');
        out.push_str(&render_results_table(results));
        out.push_str("\n\n");
    }
    out.push_str(&report.summary());
    out
}

pub fn render_results_table(results: &[RecommendationResult]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Rank", "Item", "Price", "Status", "Score", "Budget"]);

    for (idx, result) in results.iter().enumerate() {
        table.add_row(Row::from(vec![
            Cell::new((idx + 1).to_string()),
            Cell::new(result.item.title.clone()),
            Cell::new(
                result
                    .item
                    .price
                    .map(|p| format!("{p:.2}"))
                    .unwrap_or_else(|| "-".to_string()),
            ),
            status_cell(result.item.status),
            Cell::new(format!("{:.2}", result.score)),
            Cell::new(proximity_label(result)),
        ]));
    }
    table.to_string()
}

fn status_cell(status: ItemStatus) -> Cell {
    let cell = Cell::new(status.to_string());
    match status {
        ItemStatus::Available => cell.fg(Color::Green),
        ItemStatus::Reserved => cell.fg(Color::Yellow),
        ItemStatus::Purchased => cell.fg(Color::DarkGrey),
    }
}

fn proximity_label(result: &RecommendationResult) -> String {
    match result.category {
        BudgetCategory::WithinBudget => "within".to_string(),
        BudgetCategory::SlightlyOver | BudgetCategory::OverBudget => {
            format!("+{}% over budget", result.budget_proximity)
        }
    }
}
