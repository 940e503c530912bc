//! Editable mirror of the `sales_data` table.
//!
//! Each row keeps the record it was loaded from as a snapshot. Edits happen on
//! the cell text only; [`SalesGrid::prepare_save`] decides which rows are
//! written and which are reverted, and [`SavePlan::apply`] performs the writes.

#[cfg(test)]
mod tests;

use crate::db::SalesStore;
use crate::models::sales::{FIELD_COUNT, SalesField, SalesRecord, UpdateSalesRecord, parse_cells, validate};

/// One grid row: editable cell text plus the record it was loaded from.
#[derive(Debug, Clone)]
pub struct GridRow {
    pub id: i32,
    pub cells: [String; FIELD_COUNT],
    snapshot: SalesRecord,
}

impl GridRow {
    pub fn from_record(record: SalesRecord) -> Self {
        Self {
            id: record.id,
            cells: render_cells(&record),
            snapshot: record,
        }
    }

    /// Record as last loaded from or written to the store.
    pub fn snapshot(&self) -> &SalesRecord {
        &self.snapshot
    }

    /// True when any cell differs from the snapshot.
    pub fn is_dirty(&self) -> bool {
        self.cells != render_cells(&self.snapshot)
    }

    /// True when `field`'s cell differs from the snapshot.
    pub fn is_cell_dirty(&self, field: SalesField) -> bool {
        self.cells[field.index()] != field.format_value(&self.snapshot)
    }

    /// Restore every cell to the snapshot.
    pub fn revert(&mut self) {
        self.cells = render_cells(&self.snapshot);
    }

    /// True when the cells parse to exactly the values stored in `record`.
    fn holds(&self, record: &SalesRecord) -> bool {
        parse_cells(&self.cells).is_ok_and(|data| UpdateSalesRecord::from(data) == UpdateSalesRecord::restore(record))
    }

    pub fn cell(&self, field: SalesField) -> &str {
        &self.cells[field.index()]
    }

    pub fn cell_mut(&mut self, field: SalesField) -> &mut String {
        &mut self.cells[field.index()]
    }
}

fn render_cells(record: &SalesRecord) -> [String; FIELD_COUNT] {
    SalesField::ALL.map(|field| field.format_value(record))
}

/// A dirty row that failed to parse or validate.
#[derive(Debug, Clone)]
pub struct RejectedRow {
    /// Position in the grid at the time of the save.
    pub row: usize,
    pub id: i32,
    pub field: SalesField,
    pub reason: String,
}

/// A valid edit waiting to be written.
#[derive(Debug, Clone)]
pub struct PendingUpdate {
    pub row: usize,
    pub id: i32,
    pub update: UpdateSalesRecord,
    pub snapshot: SalesRecord,
}

/// Outcome of validating the grid for a bulk save.
#[derive(Debug, Clone, Default)]
pub struct SavePlan {
    pub updates: Vec<PendingUpdate>,
    pub rejected: Vec<RejectedRow>,
    /// Rows with no edits.
    pub unchanged: usize,
}

/// A write that failed in the store.
#[derive(Debug, Clone)]
pub struct FailedWrite {
    pub row: usize,
    pub id: i32,
    pub reason: String,
    /// Whether the snapshot could be written back.
    pub restored: bool,
}

/// Result of a bulk save.
#[derive(Debug, Clone, Default)]
pub struct SaveReport {
    pub saved: Vec<SalesRecord>,
    pub rejected: Vec<RejectedRow>,
    pub failed: Vec<FailedWrite>,
    pub unchanged: usize,
}

impl SaveReport {
    pub fn is_success(&self) -> bool {
        self.rejected.is_empty() && self.failed.is_empty()
    }

    /// Message for the first row that could not be saved, in grid order.
    pub fn first_problem(&self) -> Option<String> {
        let rejected = self
            .rejected
            .iter()
            .map(|r| (r.row, format!("Row {} (ID {}): {}", r.row + 1, r.id, r.reason)));
        let failed = self
            .failed
            .iter()
            .map(|f| (f.row, format!("Row {} (ID {}): {}", f.row + 1, f.id, f.reason)));

        rejected.chain(failed).min_by_key(|(row, _)| *row).map(|(_, msg)| msg)
    }

    /// One-line summary for the activity log.
    pub fn summary(&self) -> String {
        format!(
            "{} saved, {} reverted, {} failed, {} unchanged",
            self.saved.len(),
            self.rejected.len(),
            self.failed.len(),
            self.unchanged
        )
    }
}

impl SavePlan {
    /// Write every pending update.
    ///
    /// A failed write is followed by writing the row's snapshot back; the
    /// remaining updates still go through.
    pub async fn apply(self, store: &SalesStore) -> SaveReport {
        let mut report = SaveReport {
            rejected: self.rejected,
            unchanged: self.unchanged,
            ..Default::default()
        };

        for pending in self.updates {
            match store.update(pending.id, pending.update).await {
                Ok(Some(record)) => report.saved.push(record),
                Ok(None) => {
                    tracing::warn!("Row {} vanished before save", pending.id);
                    report.failed.push(FailedWrite {
                        row: pending.row,
                        id: pending.id,
                        reason: "Record no longer exists".to_string(),
                        restored: false,
                    });
                }
                Err(e) => {
                    let restored = store
                        .update(pending.id, UpdateSalesRecord::restore(&pending.snapshot))
                        .await
                        .is_ok();
                    report.failed.push(FailedWrite {
                        row: pending.row,
                        id: pending.id,
                        reason: e.to_string(),
                        restored,
                    });
                }
            }
        }

        tracing::info!("Bulk save: {}", report.summary());
        report
    }
}

/// Grid state: rows in display order and the selected row.
#[derive(Debug, Clone, Default)]
pub struct SalesGrid {
    rows: Vec<GridRow>,
    selected: Option<usize>,
}

impl SalesGrid {
    /// Header labels, `ID` first.
    pub fn headers() -> Vec<&'static str> {
        std::iter::once("ID").chain(SalesField::ALL.iter().map(|f| f.header())).collect()
    }

    /// Replace all rows. Clears the selection.
    pub fn load(&mut self, records: Vec<SalesRecord>) {
        self.rows = records.into_iter().map(GridRow::from_record).collect();
        self.selected = None;
    }

    /// Append a row.
    pub fn add_row(&mut self, record: SalesRecord) {
        self.rows.push(GridRow::from_record(record));
    }

    /// Replace the cells and snapshot of the row with `record.id`.
    pub fn update_row(&mut self, record: SalesRecord) -> bool {
        match self.rows.iter_mut().find(|r| r.id == record.id) {
            Some(row) => {
                *row = GridRow::from_record(record);
                true
            }
            None => false,
        }
    }

    /// Remove the row at `index`.
    pub fn remove_row(&mut self, index: usize) -> Option<GridRow> {
        if index >= self.rows.len() {
            return None;
        }
        let row = self.rows.remove(index);
        self.selected = match self.selected {
            Some(sel) if sel == index => None,
            Some(sel) if sel > index => Some(sel - 1),
            other => other,
        };
        Some(row)
    }

    /// Remove the row with `id`.
    pub fn remove_id(&mut self, id: i32) -> Option<GridRow> {
        let index = self.rows.iter().position(|r| r.id == id)?;
        self.remove_row(index)
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [GridRow] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Id of the row at `index`.
    pub fn id_at(&self, index: usize) -> Option<i32> {
        self.rows.get(index).map(|r| r.id)
    }

    /// Select a row; out-of-range indices clear the selection.
    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|i| *i < self.rows.len());
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_id(&self) -> Option<i32> {
        self.selected.and_then(|i| self.id_at(i))
    }

    pub fn dirty_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_dirty()).count()
    }

    /// Snapshots of all rows, ignoring unsaved edits.
    pub fn records(&self) -> Vec<SalesRecord> {
        self.rows.iter().map(|r| r.snapshot.clone()).collect()
    }

    /// Re-parse every edited row.
    ///
    /// Rows that fail are reverted to their snapshot and listed in
    /// `rejected`; valid edits become pending updates.
    pub fn prepare_save(&mut self) -> SavePlan {
        let mut plan = SavePlan::default();

        for (index, row) in self.rows.iter_mut().enumerate() {
            if !row.is_dirty() {
                plan.unchanged += 1;
                continue;
            }

            let parsed = parse_cells(&row.cells).and_then(|data| validate(&data).map(|()| data));
            match parsed {
                Ok(data) => plan.updates.push(PendingUpdate {
                    row: index,
                    id: row.id,
                    update: data.into(),
                    snapshot: row.snapshot.clone(),
                }),
                Err(e) => {
                    tracing::warn!(
                        "Row {} (ID {}) rejected at column {}: {}",
                        index + 1,
                        row.id,
                        e.field.column_name(),
                        e
                    );
                    plan.rejected.push(RejectedRow {
                        row: index,
                        id: row.id,
                        field: e.field,
                        reason: e.to_string(),
                    });
                    row.revert();
                }
            }
        }

        plan
    }

    /// Take the stored values of saved rows as their new snapshots.
    ///
    /// Cells edited again while the save was running are kept and show up
    /// as dirty against the new snapshot.
    pub fn apply_report(&mut self, report: &SaveReport) {
        for record in &report.saved {
            let Some(row) = self.rows.iter_mut().find(|r| r.id == record.id) else {
                continue;
            };
            if row.holds(record) {
                self.update_row(record.clone());
            } else {
                row.snapshot = record.clone();
            }
        }
        for failed in &report.failed {
            if let Some(row) = self.rows.iter_mut().find(|r| r.id == failed.id) {
                row.revert();
            }
        }
    }
}
