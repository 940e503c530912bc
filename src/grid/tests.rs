//! Grid synchronization tests against an in-memory database.

use chrono::NaiveDate;

use sea_orm::ConnectionTrait;

use super::{SaveReport, SalesGrid};
use crate::db::{SalesStore, connect, initialize_schema};
use crate::models::sales::{CreateSalesRecord, SalesField};

fn record(filiale: &str, revenue: f64) -> CreateSalesRecord {
    CreateSalesRecord {
        filiale_name: filiale.to_string(),
        country: "France".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
        monthly_revenue: revenue,
        monthly_costs: 300.0,
        sales_volume: 40,
        new_clients: 4,
        satisfaction_rate: 75,
        advertising_costs: 50.0,
    }
}

async fn seeded(names: &[&str]) -> (SalesStore, SalesGrid) {
    let store = SalesStore::open("sqlite::memory:").await.unwrap();
    for (i, name) in names.iter().enumerate() {
        store.add(record(name, 1000.0 + i as f64)).await.unwrap();
    }
    let mut grid = SalesGrid::default();
    grid.load(store.fetch_all().await.unwrap());
    (store, grid)
}

/// Validate, write and fold the result back into the grid.
async fn save(grid: &mut SalesGrid, store: &SalesStore) -> SaveReport {
    let report = grid.prepare_save().apply(store).await;
    grid.apply_report(&report);
    report
}

#[test]
fn test_headers() {
    let headers = SalesGrid::headers();
    assert_eq!(headers.len(), 10);
    assert_eq!(headers[0], "ID");
    assert_eq!(headers[4], "Revenue €");
    assert_eq!(SalesField::from_header(headers[9]), Some(SalesField::AdvertisingCosts));
}

#[tokio::test]
async fn test_load_renders_cells_clean() {
    let (_store, grid) = seeded(&["Lyon", "Nice"]).await;

    assert_eq!(grid.len(), 2);
    let row = &grid.rows()[0];
    assert_eq!(row.cell(SalesField::FilialeName), "Lyon");
    assert_eq!(row.cell(SalesField::Date), "2024-05-31");
    assert_eq!(row.cell(SalesField::MonthlyRevenue), "1000");
    assert!(!row.is_dirty());
    assert_eq!(grid.dirty_count(), 0);
}

#[tokio::test]
async fn test_delete_row_removes_exactly_that_id() {
    let (store, mut grid) = seeded(&["A", "B", "C", "D"]).await;
    let ids: Vec<_> = grid.rows().iter().map(|r| r.id).collect();

    let target = grid.id_at(2).unwrap();
    assert!(store.delete(target).await.unwrap());
    let removed = grid.remove_id(target).unwrap();
    assert_eq!(removed.id, ids[2]);

    let grid_ids: Vec<_> = grid.rows().iter().map(|r| r.id).collect();
    let store_ids: Vec<_> = store.fetch_all().await.unwrap().into_iter().map(|r| r.id).collect();
    let expected = vec![ids[0], ids[1], ids[3]];
    assert_eq!(grid_ids, expected);
    assert_eq!(store_ids, expected);
}

#[tokio::test]
async fn test_selection_follows_removal() {
    let (_store, mut grid) = seeded(&["A", "B", "C"]).await;

    grid.select(Some(2));
    let third = grid.selected_id();
    grid.remove_row(0);
    assert_eq!(grid.selected(), Some(1));
    assert_eq!(grid.selected_id(), third);

    grid.remove_row(1);
    assert_eq!(grid.selected(), None);

    grid.select(Some(10));
    assert_eq!(grid.selected(), None);
}

#[tokio::test]
async fn test_save_all_reverts_only_invalid_row() {
    let (store, mut grid) = seeded(&["A", "B", "C"]).await;
    let ids: Vec<_> = grid.rows().iter().map(|r| r.id).collect();

    *grid.rows_mut()[0].cell_mut(SalesField::MonthlyRevenue) = "1500.25".to_string();
    *grid.rows_mut()[1].cell_mut(SalesField::SalesVolume) = "lots".to_string();
    *grid.rows_mut()[1].cell_mut(SalesField::Country) = "Belgium".to_string();
    *grid.rows_mut()[2].cell_mut(SalesField::Country) = "Italy".to_string();

    let report = save(&mut grid, &store).await;

    assert!(!report.is_success());
    assert_eq!(report.saved.len(), 2);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].id, ids[1]);
    assert_eq!(report.rejected[0].field, SalesField::SalesVolume);
    assert!(report.first_problem().unwrap().starts_with("Row 2"));

    let stored = store.fetch_all().await.unwrap();
    assert_eq!(stored[0].monthly_revenue, 1500.25);
    assert_eq!(stored[1].country, "France");
    assert_eq!(stored[1].sales_volume, 40);
    assert_eq!(stored[2].country, "Italy");

    assert_eq!(grid.rows()[1].cell(SalesField::SalesVolume), "40");
    assert_eq!(grid.rows()[1].cell(SalesField::Country), "France");
    assert_eq!(grid.dirty_count(), 0);
}

#[tokio::test]
async fn test_save_all_rejects_out_of_range_value() {
    let (store, mut grid) = seeded(&["A"]).await;

    *grid.rows_mut()[0].cell_mut(SalesField::SatisfactionRate) = "140".to_string();
    let report = save(&mut grid, &store).await;

    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].field, SalesField::SatisfactionRate);
    assert_eq!(store.fetch_all().await.unwrap()[0].satisfaction_rate, 75);
    assert_eq!(grid.rows()[0].cell(SalesField::SatisfactionRate), "75");
}

#[tokio::test]
async fn test_save_all_without_edits_writes_nothing() {
    let (store, mut grid) = seeded(&["A", "B"]).await;

    let report = save(&mut grid, &store).await;

    assert!(report.is_success());
    assert!(report.saved.is_empty());
    assert_eq!(report.unchanged, 2);
    assert!(report.first_problem().is_none());
    assert_eq!(store.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_save_reports_missing_record() {
    let (store, mut grid) = seeded(&["A", "B"]).await;
    let gone = grid.id_at(0).unwrap();

    *grid.rows_mut()[0].cell_mut(SalesField::FilialeName) = "A2".to_string();
    *grid.rows_mut()[1].cell_mut(SalesField::FilialeName) = "B2".to_string();
    let plan = grid.prepare_save();
    assert_eq!(plan.updates.len(), 2);

    store.delete(gone).await.unwrap();
    let report = plan.apply(&store).await;
    grid.apply_report(&report);

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].id, gone);
    assert_eq!(report.saved.len(), 1);
    assert_eq!(report.saved[0].filiale_name, "B2");
    assert_eq!(grid.rows()[0].cell(SalesField::FilialeName), "A");
}

#[tokio::test]
async fn test_update_row_refreshes_snapshot() {
    let (store, mut grid) = seeded(&["A"]).await;
    let id = grid.id_at(0).unwrap();

    *grid.rows_mut()[0].cell_mut(SalesField::NewClients) = "9".to_string();
    assert!(grid.rows()[0].is_cell_dirty(SalesField::NewClients));
    assert!(!grid.rows()[0].is_cell_dirty(SalesField::Country));

    let fresh = store.get_by_id(id).await.unwrap().unwrap();
    assert!(grid.update_row(fresh));
    assert!(!grid.rows()[0].is_dirty());
}

#[tokio::test]
async fn test_failed_write_restores_snapshot() {
    let db = connect("sqlite::memory:").await.unwrap();
    initialize_schema(&db).await.unwrap();
    db.execute_unprepared(
        "CREATE TRIGGER reject_revenue BEFORE UPDATE ON sales_data \
         WHEN NEW.monthly_revenue = 666 BEGIN SELECT RAISE(ABORT, 'revenue rejected'); END",
    )
    .await
    .unwrap();
    let store = SalesStore::new(db);
    store.add(record("A", 1000.0)).await.unwrap();
    store.add(record("B", 1000.0)).await.unwrap();

    let mut grid = SalesGrid::default();
    grid.load(store.fetch_all().await.unwrap());
    let ids: Vec<_> = grid.rows().iter().map(|r| r.id).collect();

    *grid.rows_mut()[0].cell_mut(SalesField::MonthlyRevenue) = "666".to_string();
    *grid.rows_mut()[1].cell_mut(SalesField::Country) = "Spain".to_string();

    let report = save(&mut grid, &store).await;

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].id, ids[0]);
    assert!(report.failed[0].restored);
    assert!(report.first_problem().unwrap().starts_with("Row 1"));
    assert_eq!(report.saved.len(), 1);
    assert_eq!(report.saved[0].id, ids[1]);

    let stored = store.fetch_all().await.unwrap();
    assert_eq!(stored[0].monthly_revenue, 1000.0);
    assert_eq!(stored[1].country, "Spain");

    assert_eq!(grid.rows()[0].cell(SalesField::MonthlyRevenue), "1000");
    assert_eq!(grid.rows()[1].cell(SalesField::Country), "Spain");
    assert_eq!(grid.dirty_count(), 0);
}

#[tokio::test]
async fn test_edit_during_save_is_kept() {
    let (store, mut grid) = seeded(&["A"]).await;

    *grid.rows_mut()[0].cell_mut(SalesField::Country) = "Spain".to_string();
    let plan = grid.prepare_save();

    // Typed while the write is in flight.
    *grid.rows_mut()[0].cell_mut(SalesField::Country) = "Portugal".to_string();

    let report = plan.apply(&store).await;
    grid.apply_report(&report);

    assert_eq!(report.saved[0].country, "Spain");
    let row = &grid.rows()[0];
    assert_eq!(row.snapshot().country, "Spain");
    assert_eq!(row.cell(SalesField::Country), "Portugal");
    assert!(row.is_cell_dirty(SalesField::Country));
    assert!(!row.is_cell_dirty(SalesField::FilialeName));
}
