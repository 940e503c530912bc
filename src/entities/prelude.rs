pub use super::sales_data::Entity as SalesData;
