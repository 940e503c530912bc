//! Sales record store with CRUD operations.

use sea_orm::*;

use super::connection::{connect, initialize_schema};
use crate::entities::{prelude::*, sales_data};
use crate::models::sales::{CreateSalesRecord, DATE_FORMAT, SalesRecord, UpdateSalesRecord};

/// Owner of the database connection for `sales_data`.
///
/// Cloning is cheap; clones share the same underlying pool.
#[derive(Clone)]
pub struct SalesStore {
    db: DatabaseConnection,
}

impl SalesStore {
    /// Wrap an existing connection. The schema is assumed to exist.
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Connect to `database_url` and create the table if needed.
    pub async fn open(database_url: &str) -> Result<Self, DbErr> {
        let db = connect(database_url).await?;
        initialize_schema(&db).await?;
        Ok(Self::new(db))
    }

    /// Insert a new record and return it with its assigned id.
    pub async fn add(&self, data: CreateSalesRecord) -> Result<SalesRecord, DbErr> {
        let model = sales_data::ActiveModel {
            filiale_name: Set(data.filiale_name),
            country: Set(data.country),
            date: Set(data.date.format(DATE_FORMAT).to_string()),
            monthly_revenue: Set(data.monthly_revenue),
            monthly_costs: Set(data.monthly_costs),
            sales_volume: Set(data.sales_volume),
            new_clients: Set(data.new_clients),
            satisfaction_rate: Set(data.satisfaction_rate),
            advertising_costs: Set(data.advertising_costs),
            ..Default::default()
        };

        model
            .insert(&self.db)
            .await
            .inspect_err(|e| tracing::error!("Insert into sales_data failed: {}", e))
    }

    /// List all records ordered by id.
    pub async fn fetch_all(&self) -> Result<Vec<SalesRecord>, DbErr> {
        SalesData::find()
            .order_by_asc(sales_data::Column::Id)
            .all(&self.db)
            .await
    }

    /// Get record by ID.
    pub async fn get_by_id(&self, id: i32) -> Result<Option<SalesRecord>, DbErr> {
        SalesData::find_by_id(id).one(&self.db).await
    }

    /// Update the columns set in `data`. Returns `None` when the id is unknown.
    pub async fn update(&self, id: i32, data: UpdateSalesRecord) -> Result<Option<SalesRecord>, DbErr> {
        let existing = SalesData::find_by_id(id).one(&self.db).await?;

        match existing {
            Some(model) => {
                if data.is_empty() {
                    return Ok(Some(model));
                }

                let mut active: sales_data::ActiveModel = model.into();

                if let Some(filiale_name) = data.filiale_name {
                    active.filiale_name = Set(filiale_name);
                }
                if let Some(country) = data.country {
                    active.country = Set(country);
                }
                if let Some(date) = data.date {
                    active.date = Set(date.format(DATE_FORMAT).to_string());
                }
                if let Some(monthly_revenue) = data.monthly_revenue {
                    active.monthly_revenue = Set(monthly_revenue);
                }
                if let Some(monthly_costs) = data.monthly_costs {
                    active.monthly_costs = Set(monthly_costs);
                }
                if let Some(sales_volume) = data.sales_volume {
                    active.sales_volume = Set(sales_volume);
                }
                if let Some(new_clients) = data.new_clients {
                    active.new_clients = Set(new_clients);
                }
                if let Some(satisfaction_rate) = data.satisfaction_rate {
                    active.satisfaction_rate = Set(satisfaction_rate);
                }
                if let Some(advertising_costs) = data.advertising_costs {
                    active.advertising_costs = Set(advertising_costs);
                }

                let updated = active
                    .update(&self.db)
                    .await
                    .inspect_err(|e| tracing::error!("Update of sales_data row {} failed: {}", id, e))?;
                Ok(Some(updated))
            }
            None => Ok(None),
        }
    }

    /// Delete a record by ID.
    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = SalesData::delete_by_id(id)
            .exec(&self.db)
            .await
            .inspect_err(|e| tracing::error!("Delete of sales_data row {} failed: {}", id, e))?;
        Ok(result.rows_affected > 0)
    }

    /// Total record count.
    pub async fn count(&self) -> Result<u64, DbErr> {
        SalesData::find().count(&self.db).await
    }
}
