//! Excel export and save dialogs.

use chrono::Local;
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::sales::{SalesField, SalesRecord};

/// Export all sales records to an Excel file.
pub fn export_records_to_excel(records: &[SalesRecord], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet.set_name("Sales Data")?;

    // Header format
    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x4472C4))
        .set_font_color(Color::White)
        .set_border(FormatBorder::Thin);

    let money_format = Format::new().set_num_format("#,##0.00");

    worksheet.write_string_with_format(0, 0, "ID", &header_format)?;
    worksheet.set_column_width(0, 8)?;
    for field in SalesField::ALL {
        let col = field.index() as u16 + 1;
        worksheet.write_string_with_format(0, col, field.header(), &header_format)?;
        let width = match field {
            SalesField::FilialeName => 25,
            SalesField::Country => 18,
            _ => 14,
        };
        worksheet.set_column_width(col, width)?;
    }

    // Data rows
    for (idx, record) in records.iter().enumerate() {
        let row = (idx + 1) as u32;

        worksheet.write_number(row, 0, record.id)?;
        worksheet.write_string(row, 1, &record.filiale_name)?;
        worksheet.write_string(row, 2, &record.country)?;
        worksheet.write_string(row, 3, &record.date)?;
        worksheet.write_number_with_format(row, 4, record.monthly_revenue, &money_format)?;
        worksheet.write_number_with_format(row, 5, record.monthly_costs, &money_format)?;
        worksheet.write_number(row, 6, record.sales_volume as f64)?;
        worksheet.write_number(row, 7, record.new_clients as f64)?;
        worksheet.write_number(row, 8, record.satisfaction_rate)?;
        worksheet.write_number_with_format(row, 9, record.advertising_costs, &money_format)?;
    }

    // Autofilter
    if !records.is_empty() {
        let last_row = records.len() as u32;
        worksheet.autofilter(0, 0, last_row, 9)?;
    }

    // Freeze top row
    worksheet.set_freeze_panes(1, 0)?;

    workbook.save(path)?;
    Ok(())
}

/// Open save file dialog and return selected path.
pub fn show_save_dialog(default_name: &str, filter_name: &str, extension: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_file_name(default_name)
        .add_filter(filter_name, &[extension])
        .save_file()
}

/// Generate default filename for export.
pub fn generate_export_filename(prefix: &str, extension: &str) -> String {
    let now = Local::now();
    format!("{prefix}_{ts}.{extension}", ts = now.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_export_filename() {
        let name = generate_export_filename("sales", "xlsx");
        assert!(name.starts_with("sales_"));
        assert!(name.ends_with(".xlsx"));
        // sales_YYYYMMDD_HHMMSS.xlsx
        assert_eq!(name.len(), "sales_".len() + 15 + ".xlsx".len());
    }

    #[test]
    fn test_export_records_writes_file() {
        let records = vec![SalesRecord {
            id: 7,
            filiale_name: "Lyon".to_string(),
            country: "France".to_string(),
            date: "2024-01-31".to_string(),
            monthly_revenue: 1200.0,
            monthly_costs: 300.0,
            sales_volume: 12,
            new_clients: 3,
            satisfaction_rate: 88,
            advertising_costs: 45.5,
        }];
        let path = std::env::temp_dir().join(format!("filiale-sales-export-{}.xlsx", std::process::id()));

        export_records_to_excel(&records, &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);

        std::fs::remove_file(&path).ok();
    }
}
