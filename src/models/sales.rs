//! Sales record DTOs and the shared parse/validate rules.
//!
//! Both the entry form and the grid's bulk save go through [`parse_cells`]
//! followed by [`validate`], so a record accepted by one path is accepted by
//! the other.

use std::fmt;

use chrono::NaiveDate;

use crate::entities::sales_data;
use crate::error::AppError;

/// Persisted sales record.
pub type SalesRecord = sales_data::Model;

/// Number of editable fields (everything except `id`).
pub const FIELD_COUNT: usize = 9;

/// Storage format for `date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Expected type of a field's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Date,
    Real,
    Integer,
}

/// Editable column of `sales_data`, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SalesField {
    FilialeName,
    Country,
    Date,
    MonthlyRevenue,
    MonthlyCosts,
    SalesVolume,
    NewClients,
    SatisfactionRate,
    AdvertisingCosts,
}

impl SalesField {
    pub const ALL: [SalesField; FIELD_COUNT] = [
        SalesField::FilialeName,
        SalesField::Country,
        SalesField::Date,
        SalesField::MonthlyRevenue,
        SalesField::MonthlyCosts,
        SalesField::SalesVolume,
        SalesField::NewClients,
        SalesField::SatisfactionRate,
        SalesField::AdvertisingCosts,
    ];

    /// Position in [`SalesField::ALL`] and in a row's cell array.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Grid header text.
    pub fn header(self) -> &'static str {
        match self {
            SalesField::FilialeName => "Filiale Name",
            SalesField::Country => "Country",
            SalesField::Date => "Date",
            SalesField::MonthlyRevenue => "Revenue €",
            SalesField::MonthlyCosts => "Costs €",
            SalesField::SalesVolume => "Volume",
            SalesField::NewClients => "Clients",
            SalesField::SatisfactionRate => "Satisfaction %",
            SalesField::AdvertisingCosts => "Ad Costs",
        }
    }

    /// Database column name.
    pub fn column_name(self) -> &'static str {
        match self {
            SalesField::FilialeName => "filiale_name",
            SalesField::Country => "country",
            SalesField::Date => "date",
            SalesField::MonthlyRevenue => "monthly_revenue",
            SalesField::MonthlyCosts => "monthly_costs",
            SalesField::SalesVolume => "sales_volume",
            SalesField::NewClients => "new_clients",
            SalesField::SatisfactionRate => "satisfaction_rate",
            SalesField::AdvertisingCosts => "advertising_costs",
        }
    }

    /// Form label text.
    pub fn label(self) -> &'static str {
        match self {
            SalesField::FilialeName => "Filiale name",
            SalesField::Country => "Country",
            SalesField::Date => "Date",
            SalesField::MonthlyRevenue => "Monthly revenue",
            SalesField::MonthlyCosts => "Monthly costs",
            SalesField::SalesVolume => "Sales volume",
            SalesField::NewClients => "New clients",
            SalesField::SatisfactionRate => "Satisfaction rate",
            SalesField::AdvertisingCosts => "Advertising costs",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            SalesField::FilialeName | SalesField::Country => FieldKind::Text,
            SalesField::Date => FieldKind::Date,
            SalesField::MonthlyRevenue | SalesField::MonthlyCosts | SalesField::AdvertisingCosts => FieldKind::Real,
            SalesField::SalesVolume | SalesField::NewClients | SalesField::SatisfactionRate => FieldKind::Integer,
        }
    }

    /// Look up a field by its exact grid header.
    pub fn from_header(header: &str) -> Option<Self> {
        let header = header.trim();
        Self::ALL.into_iter().find(|f| f.header() == header)
    }

    /// Render a record's value for this field as cell text.
    pub fn format_value(self, record: &SalesRecord) -> String {
        match self {
            SalesField::FilialeName => record.filiale_name.clone(),
            SalesField::Country => record.country.clone(),
            SalesField::Date => record.date.clone(),
            SalesField::MonthlyRevenue => record.monthly_revenue.to_string(),
            SalesField::MonthlyCosts => record.monthly_costs.to_string(),
            SalesField::SalesVolume => record.sales_volume.to_string(),
            SalesField::NewClients => record.new_clients.to_string(),
            SalesField::SatisfactionRate => record.satisfaction_rate.to_string(),
            SalesField::AdvertisingCosts => record.advertising_costs.to_string(),
        }
    }
}

impl fmt::Display for SalesField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A parse or validation failure tied to the field that caused it.
#[derive(Debug)]
pub struct FieldError {
    pub field: SalesField,
    pub error: AppError,
}

impl FieldError {
    fn parse(field: SalesField, msg: impl Into<String>) -> Self {
        Self {
            field,
            error: AppError::parse(msg),
        }
    }

    fn invalid(field: SalesField, msg: impl Into<String>) -> Self {
        Self {
            field,
            error: AppError::validation(msg),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl From<FieldError> for AppError {
    fn from(e: FieldError) -> Self {
        e.error
    }
}

/// DTO for inserting a sales record.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateSalesRecord {
    pub filiale_name: String,
    pub country: String,
    pub date: NaiveDate,
    pub monthly_revenue: f64,
    pub monthly_costs: f64,
    pub sales_volume: i64,
    pub new_clients: i64,
    pub satisfaction_rate: i32,
    pub advertising_costs: f64,
}

/// DTO for a partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSalesRecord {
    pub filiale_name: Option<String>,
    pub country: Option<String>,
    pub date: Option<NaiveDate>,
    pub monthly_revenue: Option<f64>,
    pub monthly_costs: Option<f64>,
    pub sales_volume: Option<i64>,
    pub new_clients: Option<i64>,
    pub satisfaction_rate: Option<i32>,
    pub advertising_costs: Option<f64>,
}

impl From<CreateSalesRecord> for UpdateSalesRecord {
    fn from(data: CreateSalesRecord) -> Self {
        Self {
            filiale_name: Some(data.filiale_name),
            country: Some(data.country),
            date: Some(data.date),
            monthly_revenue: Some(data.monthly_revenue),
            monthly_costs: Some(data.monthly_costs),
            sales_volume: Some(data.sales_volume),
            new_clients: Some(data.new_clients),
            satisfaction_rate: Some(data.satisfaction_rate),
            advertising_costs: Some(data.advertising_costs),
        }
    }
}

impl UpdateSalesRecord {
    /// Full update restoring every column of `record`.
    ///
    /// Dates that no longer parse are left untouched.
    pub fn restore(record: &SalesRecord) -> Self {
        Self {
            filiale_name: Some(record.filiale_name.clone()),
            country: Some(record.country.clone()),
            date: NaiveDate::parse_from_str(&record.date, DATE_FORMAT).ok(),
            monthly_revenue: Some(record.monthly_revenue),
            monthly_costs: Some(record.monthly_costs),
            sales_volume: Some(record.sales_volume),
            new_clients: Some(record.new_clients),
            satisfaction_rate: Some(record.satisfaction_rate),
            advertising_costs: Some(record.advertising_costs),
        }
    }

    /// True when no column would be written.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl sales_data::Model {
    /// Net income for this record.
    pub fn net_income(&self) -> f64 {
        net_income(self.monthly_revenue, self.monthly_costs, self.advertising_costs)
    }
}

/// `revenue - costs - advertising`.
pub fn net_income(revenue: f64, costs: f64, advertising: f64) -> f64 {
    revenue - costs - advertising
}

fn parse_real(field: SalesField, text: &str) -> Result<f64, FieldError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(FieldError::parse(field, format!("{field} is required")));
    }
    text.parse::<f64>()
        .map_err(|_| FieldError::parse(field, format!("{field} must be a number, got '{text}'")))
}

fn parse_integer<T: std::str::FromStr>(field: SalesField, text: &str) -> Result<T, FieldError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(FieldError::parse(field, format!("{field} is required")));
    }
    text.parse::<T>()
        .map_err(|_| FieldError::parse(field, format!("{field} must be a whole number, got '{text}'")))
}

fn parse_date(field: SalesField, text: &str) -> Result<NaiveDate, FieldError> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|_| FieldError::parse(field, format!("{field} must be a date (YYYY-MM-DD), got '{text}'")))
}

/// Convert raw cell text (indexed by [`SalesField::index`]) to a typed record.
///
/// Only type conversion happens here; ranges are checked by [`validate`].
pub fn parse_cells(cells: &[String; FIELD_COUNT]) -> Result<CreateSalesRecord, FieldError> {
    let cell = |field: SalesField| cells[field.index()].as_str();

    Ok(CreateSalesRecord {
        filiale_name: cell(SalesField::FilialeName).trim().to_string(),
        country: cell(SalesField::Country).trim().to_string(),
        date: parse_date(SalesField::Date, cell(SalesField::Date))?,
        monthly_revenue: parse_real(SalesField::MonthlyRevenue, cell(SalesField::MonthlyRevenue))?,
        monthly_costs: parse_real(SalesField::MonthlyCosts, cell(SalesField::MonthlyCosts))?,
        sales_volume: parse_integer(SalesField::SalesVolume, cell(SalesField::SalesVolume))?,
        new_clients: parse_integer(SalesField::NewClients, cell(SalesField::NewClients))?,
        satisfaction_rate: parse_integer(SalesField::SatisfactionRate, cell(SalesField::SatisfactionRate))?,
        advertising_costs: parse_real(SalesField::AdvertisingCosts, cell(SalesField::AdvertisingCosts))?,
    })
}

fn check_amount(field: SalesField, value: f64) -> Result<(), FieldError> {
    if !value.is_finite() {
        return Err(FieldError::invalid(field, format!("{field} must be a finite number")));
    }
    if value < 0.0 {
        return Err(FieldError::invalid(field, format!("{field} must not be negative")));
    }
    Ok(())
}

fn check_count(field: SalesField, value: i64) -> Result<(), FieldError> {
    if value < 0 {
        return Err(FieldError::invalid(field, format!("{field} must not be negative")));
    }
    Ok(())
}

/// Check every field is present and within range.
pub fn validate(data: &CreateSalesRecord) -> Result<(), FieldError> {
    if data.filiale_name.trim().is_empty() {
        return Err(FieldError::invalid(SalesField::FilialeName, "Filiale name is required"));
    }
    if data.country.trim().is_empty() {
        return Err(FieldError::invalid(SalesField::Country, "Country is required"));
    }
    check_amount(SalesField::MonthlyRevenue, data.monthly_revenue)?;
    check_amount(SalesField::MonthlyCosts, data.monthly_costs)?;
    check_count(SalesField::SalesVolume, data.sales_volume)?;
    check_count(SalesField::NewClients, data.new_clients)?;
    if !(0..=100).contains(&data.satisfaction_rate) {
        return Err(FieldError::invalid(
            SalesField::SatisfactionRate,
            "Satisfaction rate must be between 0 and 100",
        ));
    }
    check_amount(SalesField::AdvertisingCosts, data.advertising_costs)?;
    Ok(())
}
