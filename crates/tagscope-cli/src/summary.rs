use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use rust_decimal::Decimal;

use tagscope_model::AggregateGroup;
use tagscope_report::{
    ComplianceReport, CostReport, DatasetOverview, RecordSummary, RemediationSummary,
};

use crate::commands::ValueCount;

pub fn print_overview(overview: &DatasetOverview) {
    if let Some(source) = &overview.source {
        println!("Dataset: {source}");
    }
    println!("SHA-256: {}", overview.fingerprint);
    println!(
        "Shape: {} rows x {} columns",
        overview.rows,
        overview.columns.len()
    );

    let summary = &overview.summary;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Resources"), Cell::new(summary.total_resources)]);
    if let Some(accounts) = summary.accounts {
        table.add_row(vec![Cell::new("Accounts"), Cell::new(accounts)]);
    }
    table.add_row(vec![
        Cell::new("Tagged"),
        Cell::new(overview.totals.tagged).fg(Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("Untagged"),
        count_cell(summary.untagged_resources, Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Untagged share"),
        Cell::new(percent(summary.untagged_resource_percentage)),
    ]);
    table.add_row(vec![
        Cell::new("Total monthly cost"),
        Cell::new(money(summary.total_cost)).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("Untagged cost"),
        Cell::new(money(summary.untagged_cost)).fg(Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Untagged cost share"),
        Cell::new(percent(summary.untagged_cost_percentage)),
    ]);
    println!("{table}");

    let mut missing = Table::new();
    missing.set_header(vec![header_cell("Column"), header_cell("Missing")]);
    apply_table_style(&mut missing);
    align_column(&mut missing, 1, CellAlignment::Right);
    for column in &overview.missing_values {
        missing.add_row(vec![
            Cell::new(&column.column),
            count_cell(column.missing, Color::Yellow),
        ]);
    }
    println!();
    println!("Missing values:");
    println!("{missing}");

    if !overview.rejected.is_empty() {
        let mut rejected = Table::new();
        rejected.set_header(vec![
            header_cell("Line"),
            header_cell("Resource"),
            header_cell("Reason"),
        ]);
        apply_table_style(&mut rejected);
        align_column(&mut rejected, 0, CellAlignment::Right);
        for row in &overview.rejected {
            rejected.add_row(vec![
                Cell::new(row.line),
                optional_cell(row.resource_id.as_deref()),
                Cell::new(&row.reason).fg(Color::Red),
            ]);
        }
        println!();
        println!("Rejected rows ({}):", overview.rejected.len());
        println!("{rejected}");
    }
}

pub fn print_cost_report(report: &CostReport, rows: usize) {
    let visibility = &report.visibility;
    println!(
        "Resources in view: {rows}, total {} (tagged {}, untagged {} = {})",
        money(visibility.total_cost),
        money(visibility.tagged_cost),
        money(visibility.untagged_cost),
        percent(visibility.untagged_percentage),
    );
    let title = if report.grouping.is_empty() {
        "All resources".to_string()
    } else {
        report
            .grouping
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" / ")
    };
    println!();
    println!("{title}:");
    println!("{}", group_table(&report.groups));

    for breakdown in &report.breakdowns {
        println!();
        if breakdown.group_count > breakdown.groups.len() {
            println!(
                "By {} (top {} of {}):",
                breakdown.dimension,
                breakdown.groups.len(),
                breakdown.group_count
            );
        } else {
            println!("By {}:", breakdown.dimension);
        }
        println!("{}", group_table(&breakdown.groups));
    }
}

fn group_table(groups: &[AggregateGroup]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Group"),
        header_cell("Resources"),
        header_cell("Total"),
        header_cell("Tagged"),
        header_cell("Untagged"),
        header_cell("Untagged %"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for group in groups {
        table.add_row(vec![
            Cell::new(group.key.to_string())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(group.record_count),
            Cell::new(money(group.total_cost)),
            Cell::new(money(group.tagged_cost)),
            cost_cell(group.untagged_cost),
            Cell::new(percent(group.untagged_percentage())),
        ]);
    }
    table
}

pub fn print_compliance_report(report: &ComplianceReport, untagged_limit: usize) {
    println!("Expected tags: {}", report.expected_fields.join(", "));
    println!(
        "Resources: {} tagged, {} untagged, average completeness {:.1}%",
        report.totals.tagged, report.totals.untagged, report.average_completeness
    );

    println!();
    println!("Lowest completeness:");
    println!("{}", record_table(&report.lowest));

    let mut missing = Table::new();
    missing.set_header(vec![header_cell("Tag"), header_cell("Resources missing")]);
    apply_table_style(&mut missing);
    align_column(&mut missing, 1, CellAlignment::Right);
    for entry in &report.missing_fields {
        missing.add_row(vec![
            Cell::new(&entry.field),
            count_cell(entry.missing, Color::Yellow),
        ]);
    }
    println!();
    println!("Missing tags:");
    println!("{missing}");

    let mut distribution = Table::new();
    distribution.set_header(vec![
        header_cell("Tags present"),
        header_cell("Completeness"),
        header_cell("Resources"),
    ]);
    apply_table_style(&mut distribution);
    align_column(&mut distribution, 1, CellAlignment::Right);
    align_column(&mut distribution, 2, CellAlignment::Right);
    for bucket in &report.distribution {
        distribution.add_row(vec![
            Cell::new(format!("{}/{}", bucket.present, report.expected_fields.len())),
            Cell::new(format!("{:.0}%", bucket.completeness * 100.0)),
            Cell::new(bucket.records),
        ]);
    }
    println!();
    println!("Completeness distribution:");
    println!("{distribution}");

    if !report.untagged.is_empty() {
        let shown = &report.untagged[..report.untagged.len().min(untagged_limit)];
        println!();
        if shown.len() < report.untagged.len() {
            println!(
                "Untagged resources by cost (top {} of {}):",
                shown.len(),
                report.untagged.len()
            );
        } else {
            println!("Untagged resources by cost:");
        }
        println!("{}", record_table(shown));
    }

    if !report.mismatches.is_empty() {
        let mut mismatches = Table::new();
        mismatches.set_header(vec![
            header_cell("Resource"),
            header_cell("Declared"),
            header_cell("Derived"),
        ]);
        apply_table_style(&mut mismatches);
        for mismatch in &report.mismatches {
            mismatches.add_row(vec![
                Cell::new(&mismatch.resource_id),
                Cell::new(&mismatch.declared).fg(Color::Yellow),
                Cell::new(mismatch.derived),
            ]);
        }
        println!();
        println!("Declared status mismatches:");
        println!("{mismatches}");
    }
}

fn record_table(rows: &[RecordSummary]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Resource"),
        header_cell("Cost"),
        header_cell("Completeness"),
        header_cell("Missing"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.resource_id),
            Cell::new(money(row.cost)),
            completeness_cell(row.completeness_percentage),
            missing_cell(&row.missing),
        ]);
    }
    table
}

pub fn print_candidates(candidates: &[RecordSummary]) {
    if candidates.is_empty() {
        println!("Every resource in view is fully tagged.");
        return;
    }
    println!(
        "{} resources need tags. Pass --edit ID:FIELD=VALUE or --edits-file to simulate fixes.",
        candidates.len()
    );
    println!("{}", record_table(candidates));
}

pub fn print_remediation(summary: &RemediationSummary) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Metric"),
        header_cell("Before"),
        header_cell("After"),
        header_cell("Change"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new("Tagged resources"),
        Cell::new(summary.before.tagged),
        Cell::new(summary.after.tagged),
        delta_cell(summary.tagged_delta, true),
    ]);
    table.add_row(vec![
        Cell::new("Untagged resources"),
        Cell::new(summary.before.untagged),
        Cell::new(summary.after.untagged),
        delta_cell(summary.untagged_delta, false),
    ]);
    table.add_row(vec![
        Cell::new("Untagged cost"),
        Cell::new(money(summary.before.untagged_cost)),
        Cell::new(money(summary.after.untagged_cost)),
        cost_delta_cell(summary.untagged_cost_delta),
    ]);
    println!("{table}");
    println!(
        "Compliance improvement: {}, cost visibility gain: {}",
        percent(summary.compliance_improvement_percentage),
        money(summary.cost_visibility_gain)
    );

    let mut outcomes = Table::new();
    outcomes.set_header(vec![
        header_cell("Resource"),
        header_cell("Cost"),
        header_cell("Before"),
        header_cell("After"),
        header_cell("Tagged"),
        header_cell("Still missing"),
    ]);
    apply_table_style(&mut outcomes);
    for index in 1..=3 {
        align_column(&mut outcomes, index, CellAlignment::Right);
    }
    align_column(&mut outcomes, 4, CellAlignment::Center);
    for outcome in &summary.outcomes {
        outcomes.add_row(vec![
            Cell::new(&outcome.resource_id),
            Cell::new(money(outcome.cost)),
            completeness_cell(outcome.before_percentage),
            completeness_cell(outcome.after_percentage),
            if outcome.newly_tagged {
                Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold)
            } else {
                dim_cell("-")
            },
            missing_cell(&outcome.still_missing),
        ]);
    }
    println!();
    println!("Edited resources:");
    println!("{outcomes}");
}

pub fn print_values(dimension: &str, values: &[ValueCount]) {
    let mut table = Table::new();
    table.set_header(vec![header_cell(dimension), header_cell("Resources")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for entry in values {
        table.add_row(vec![Cell::new(&entry.value), Cell::new(entry.records)]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn money(amount: Decimal) -> String {
    if amount < Decimal::ZERO {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${amount:.2}")
    }
}

fn percent(value: Decimal) -> String {
    format!("{value:.2}%")
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn cost_cell(amount: Decimal) -> Cell {
    if amount.is_zero() {
        dim_cell(money(amount))
    } else {
        Cell::new(money(amount)).fg(Color::Red)
    }
}

fn completeness_cell(percentage: f64) -> Cell {
    let color = if percentage >= 100.0 {
        Color::Green
    } else if percentage >= 50.0 {
        Color::Yellow
    } else {
        Color::Red
    };
    Cell::new(format!("{percentage:.0}%")).fg(color)
}

fn delta_cell(delta: i64, higher_is_better: bool) -> Cell {
    let text = if delta > 0 {
        format!("+{delta}")
    } else {
        delta.to_string()
    };
    let improved = (delta > 0) == higher_is_better;
    if delta == 0 {
        dim_cell(text)
    } else if improved {
        Cell::new(text).fg(Color::Green)
    } else {
        Cell::new(text).fg(Color::Red)
    }
}

fn cost_delta_cell(delta: Decimal) -> Cell {
    if delta.is_zero() {
        dim_cell(money(delta))
    } else if delta < Decimal::ZERO {
        Cell::new(money(delta)).fg(Color::Green)
    } else {
        Cell::new(money(delta)).fg(Color::Red)
    }
}

fn missing_cell(missing: &[String]) -> Cell {
    if missing.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(missing.join(", ")).fg(Color::Yellow)
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
