//! PDF export of the KPI summary.

use std::path::Path;

use chrono::Local;
use genpdf::{Alignment, Document, Element, SimplePageDecorator, elements, style};

use crate::config::ReportConfig;
use crate::error::{AppError, Result};
use crate::kpi::{GroupIncome, KpiSummary, format_amount};

/// Column order of a grouped income table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOrder {
    CountryDate,
    DateCountry,
}

impl GroupOrder {
    pub fn title(self) -> &'static str {
        match self {
            GroupOrder::CountryDate => "Net income by country and date",
            GroupOrder::DateCountry => "Net income by date and country",
        }
    }

    pub fn headers(self) -> [&'static str; 3] {
        match self {
            GroupOrder::CountryDate => ["Country", "Date", "Net Income"],
            GroupOrder::DateCountry => ["Date", "Country", "Net Income"],
        }
    }
}

/// Summary paragraphs, in display order.
pub fn summary_lines(summary: &KpiSummary, currency: &str) -> Vec<String> {
    vec![
        format!("Total Revenue: {}", format_amount(summary.total_revenue, currency)),
        format!("Total Costs: {}", format_amount(summary.total_costs, currency)),
        format!(
            "Total Advertising Costs: {}",
            format_amount(summary.total_advertising, currency)
        ),
        format!("Net Income: {}", format_amount(summary.net_income(), currency)),
        format!(
            "Records: {}  |  Sales volume: {}  |  New clients: {}  |  Avg. satisfaction: {:.1} %",
            summary.record_count, summary.total_sales_volume, summary.total_new_clients, summary.average_satisfaction
        ),
    ]
}

/// Cell text of a grouped income table.
pub fn group_rows(groups: &[GroupIncome], order: GroupOrder, currency: &str) -> Vec<[String; 3]> {
    groups
        .iter()
        .map(|g| {
            let income = format_amount(g.net_income(), currency);
            match order {
                GroupOrder::CountryDate => [g.country.clone(), g.date.clone(), income],
                GroupOrder::DateCountry => [g.date.clone(), g.country.clone(), income],
            }
        })
        .collect()
}

fn group_table(rows: Vec<[String; 3]>, order: GroupOrder) -> Result<elements::TableLayout> {
    let mut table = elements::TableLayout::new(vec![3, 2, 2]);
    table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

    let bold = style::Style::new().bold();
    let [h1, h2, h3] = order.headers();
    table
        .row()
        .element(elements::Paragraph::new(h1).styled(bold))
        .element(elements::Paragraph::new(h2).styled(bold))
        .element(elements::Paragraph::new(h3).styled(bold))
        .push()
        .map_err(|e| AppError::export(format!("Table header: {e}")))?;

    for [a, b, income] in rows {
        let mut income = elements::Paragraph::new(income);
        income.set_alignment(Alignment::Right);
        table
            .row()
            .element(elements::Paragraph::new(a))
            .element(elements::Paragraph::new(b))
            .element(income)
            .push()
            .map_err(|e| AppError::export(format!("Table row: {e}")))?;
    }

    Ok(table)
}

/// Render the KPI report to `path`.
///
/// Fonts are loaded from `font_dir` as `<family>-Regular.ttf`, `-Bold`,
/// `-Italic` and `-BoldItalic`.
pub fn write_kpi_report(summary: &KpiSummary, config: &ReportConfig, font_dir: &Path, path: &Path) -> Result<()> {
    let font_family = genpdf::fonts::from_files(font_dir, &config.font_family, None).map_err(|e| {
        AppError::export(format!(
            "Font '{}' not found in {}: {e}",
            config.font_family,
            font_dir.display()
        ))
    })?;

    let mut doc = Document::new(font_family);
    doc.set_title(config.title.clone());
    let mut decorator = SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    doc.push(elements::Paragraph::new(config.title.clone()).styled(style::Style::new().bold().with_font_size(18)));
    doc.push(
        elements::Paragraph::new(format!("Generated {}", Local::now().format("%Y-%m-%d %H:%M")))
            .styled(style::Style::new().italic().with_font_size(9)),
    );
    doc.push(elements::Break::new(1.5));

    for line in summary_lines(summary, &config.currency_symbol) {
        doc.push(elements::Paragraph::new(line));
    }

    for (order, groups) in [
        (GroupOrder::CountryDate, &summary.by_country_date),
        (GroupOrder::DateCountry, &summary.by_date_country),
    ] {
        doc.push(elements::Break::new(2));
        doc.push(elements::Paragraph::new(order.title()).styled(style::Style::new().bold().with_font_size(13)));
        doc.push(elements::Break::new(0.5));
        doc.push(group_table(group_rows(groups, order, &config.currency_symbol), order)?);
    }

    doc.render_to_file(path)
        .map_err(|e| AppError::export(format!("Failed to write {}: {e}", path.display())))?;

    tracing::info!("KPI report written to {}", path.display());
    Ok(())
}
