//! Building, unit, and occupancy repositories.
//!
//! These tables are written by their own CRUD surface; the core only reads
//! them to validate scoping and occupancy.

use resida_core::Result;
use resida_sheets::RowStore;

use super::TRACING_TARGET;
use crate::model::{Building, Occupancy, Unit};
use crate::types::Role;

/// Repository for building lookups.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuildingQuery;

impl BuildingQuery {
    /// Finds a building by its `ID` cell.
    pub async fn find_by_id(store: &RowStore, building_id: &str) -> Result<Option<Building>> {
        if building_id.trim().is_empty() {
            return Ok(None);
        }
        let Some(row) = store
            .find_row(Building::TABLE, "ID", building_id, false)
            .await?
        else {
            return Ok(None);
        };

        let record = store.record_at(Building::TABLE, row).await?;
        Building::from_record(&record).map(Some)
    }
}

/// Repository for unit lookups.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnitQuery;

impl UnitQuery {
    /// Finds a unit by its `ID` cell.
    pub async fn find_by_id(store: &RowStore, unit_id: &str) -> Result<Option<Unit>> {
        if unit_id.trim().is_empty() {
            return Ok(None);
        }
        let Some(row) = store.find_row(Unit::TABLE, "ID", unit_id, false).await? else {
            return Ok(None);
        };

        let record = store.record_at(Unit::TABLE, row).await?;
        Unit::from_record(&record).map(Some)
    }
}

/// Repository for occupancy lookups.
#[derive(Debug, Default, Clone, Copy)]
pub struct OccupancyQuery;

impl OccupancyQuery {
    /// Finds an active occupancy record blocking (`unit_id`, `role`).
    ///
    /// Deployments without an `Occupancies` table simply have no occupancy
    /// records; a missing header row reads as empty rather than failing.
    pub async fn find_active_for_unit(
        store: &RowStore,
        unit_id: &str,
        role: Role,
    ) -> Result<Option<Occupancy>> {
        let records = match store.all_records(Occupancy::TABLE).await {
            Ok(records) => records,
            Err(resida_sheets::SheetError::MissingHeaders { .. }) => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        for (idx, record) in records.iter().enumerate() {
            match Occupancy::from_record(record) {
                Ok(occupancy) if occupancy.blocks(unit_id, role) => return Ok(Some(occupancy)),
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        table = Occupancy::TABLE,
                        row = idx as u32 + 2,
                        reason = err.reason(),
                        "skipping malformed occupancy row"
                    );
                }
            }
        }
        Ok(None)
    }
}
