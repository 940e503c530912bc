//! Sales record DTOs, field mapping and validation.

pub mod sales;

pub use sales::{
    CreateSalesRecord, FIELD_COUNT, FieldError, FieldKind, SalesField, SalesRecord, UpdateSalesRecord, net_income,
    parse_cells, validate,
};
