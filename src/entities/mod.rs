//! SeaORM entity definitions.

pub mod prelude;
pub mod sales_data;
