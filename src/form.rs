//! Entry form state and the collector that turns it into a record.

use chrono::{Local, NaiveDate};

use crate::error::AppError;
use crate::models::sales::{CreateSalesRecord, DATE_FORMAT, FIELD_COUNT, SalesField, parse_cells, validate};

/// Raw input of the entry form, one string per text field.
#[derive(Debug, Clone)]
pub struct SalesForm {
    pub filiale_name: String,
    pub country: String,
    pub date: NaiveDate,
    pub monthly_revenue: String,
    pub monthly_costs: String,
    pub sales_volume: String,
    pub new_clients: String,
    pub satisfaction_rate: String,
    pub advertising_costs: String,
}

impl Default for SalesForm {
    fn default() -> Self {
        Self {
            filiale_name: String::new(),
            country: String::new(),
            date: Local::now().date_naive(),
            monthly_revenue: String::new(),
            monthly_costs: String::new(),
            sales_volume: String::new(),
            new_clients: String::new(),
            satisfaction_rate: String::new(),
            advertising_costs: String::new(),
        }
    }
}

impl SalesForm {
    /// Clear all inputs, keeping the selected date for the next entry.
    pub fn reset(&mut self) {
        *self = Self {
            date: self.date,
            ..Self::default()
        };
    }

    /// Text input backing `field`, or `None` for the date picker.
    pub fn text_mut(&mut self, field: SalesField) -> Option<&mut String> {
        match field {
            SalesField::FilialeName => Some(&mut self.filiale_name),
            SalesField::Country => Some(&mut self.country),
            SalesField::Date => None,
            SalesField::MonthlyRevenue => Some(&mut self.monthly_revenue),
            SalesField::MonthlyCosts => Some(&mut self.monthly_costs),
            SalesField::SalesVolume => Some(&mut self.sales_volume),
            SalesField::NewClients => Some(&mut self.new_clients),
            SalesField::SatisfactionRate => Some(&mut self.satisfaction_rate),
            SalesField::AdvertisingCosts => Some(&mut self.advertising_costs),
        }
    }

    fn cells(&self) -> [String; FIELD_COUNT] {
        [
            self.filiale_name.clone(),
            self.country.clone(),
            self.date.format(DATE_FORMAT).to_string(),
            self.monthly_revenue.clone(),
            self.monthly_costs.clone(),
            self.sales_volume.clone(),
            self.new_clients.clone(),
            self.satisfaction_rate.clone(),
            self.advertising_costs.clone(),
        ]
    }

    /// Parse and validate the form.
    ///
    /// Conversion failures yield [`AppError::Parse`], range violations and
    /// blank text fields yield [`AppError::Validation`].
    pub fn collect(&self) -> Result<CreateSalesRecord, AppError> {
        let data = parse_cells(&self.cells())?;
        validate(&data)?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> SalesForm {
        SalesForm {
            filiale_name: "Test Filiale".to_string(),
            country: "Test Country".to_string(),
            date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            monthly_revenue: "1000.0".to_string(),
            monthly_costs: "500.0".to_string(),
            sales_volume: "100".to_string(),
            new_clients: "10".to_string(),
            satisfaction_rate: "90".to_string(),
            advertising_costs: "200.0".to_string(),
        }
    }

    #[test]
    fn test_collect_valid_inputs() {
        let data = filled_form().collect().unwrap();

        assert_eq!(
            data,
            CreateSalesRecord {
                filiale_name: "Test Filiale".to_string(),
                country: "Test Country".to_string(),
                date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                monthly_revenue: 1000.0,
                monthly_costs: 500.0,
                sales_volume: 100,
                new_clients: 10,
                satisfaction_rate: 90,
                advertising_costs: 200.0,
            }
        );
    }

    #[test]
    fn test_collect_trims_text_fields() {
        let mut form = filled_form();
        form.filiale_name = "  Lyon Centre ".to_string();
        form.monthly_revenue = " 12.5 ".to_string();

        let data = form.collect().unwrap();
        assert_eq!(data.filiale_name, "Lyon Centre");
        assert_eq!(data.monthly_revenue, 12.5);
    }

    #[test]
    fn test_collect_non_numeric_revenue() {
        let mut form = filled_form();
        form.filiale_name = String::new();
        form.country = String::new();
        form.monthly_revenue = "abc".to_string();

        let err = form.collect().unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }

    #[test]
    fn test_collect_each_numeric_field_rejects_text() {
        let numeric = [
            SalesField::MonthlyRevenue,
            SalesField::MonthlyCosts,
            SalesField::SalesVolume,
            SalesField::NewClients,
            SalesField::SatisfactionRate,
            SalesField::AdvertisingCosts,
        ];

        for field in numeric {
            let mut form = filled_form();
            if let Some(text) = form.text_mut(field) {
                *text = "n/a".to_string();
            }
            assert!(form.collect().is_err(), "{field} accepted non-numeric text");
        }
    }

    #[test]
    fn test_collect_out_of_range() {
        let mut form = filled_form();
        form.satisfaction_rate = "101".to_string();
        assert!(matches!(form.collect(), Err(AppError::Validation(_))));

        let mut form = filled_form();
        form.new_clients = "-2".to_string();
        assert!(matches!(form.collect(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_collect_missing_name() {
        let mut form = filled_form();
        form.filiale_name = "   ".to_string();
        assert!(matches!(form.collect(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_reset_keeps_date() {
        let mut form = filled_form();
        form.reset();
        assert!(form.filiale_name.is_empty());
        assert!(form.monthly_revenue.is_empty());
        assert_eq!(form.date, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
    }
}
