//! Entity for the `sales_data` table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One sales record for a filiale and month.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales_data")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub filiale_name: String,
    #[sea_orm(column_type = "Text")]
    pub country: String,
    /// ISO `YYYY-MM-DD`.
    #[sea_orm(column_type = "Text")]
    pub date: String,
    pub monthly_revenue: f64,
    pub monthly_costs: f64,
    pub sales_volume: i64,
    pub new_clients: i64,
    pub satisfaction_rate: i32,
    pub advertising_costs: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
