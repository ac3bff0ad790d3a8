// ==========================================
// Parking occupancy - report API
// ==========================================
// Read-only queries over the current snapshots plus CSV export.
// ==========================================

use crate::api::error::ApiResult;
use crate::api::parking_api::ParkingLogView;
use crate::domain::Vehicle;
use crate::engine::{FormattedLogRecord, ReportQueryEngine};
use crate::export::{log_report_filename, to_csv_bytes, VEHICLE_LIST_FILENAME};
use crate::repository::ParkingStore;
use chrono::NaiveDate;
use std::sync::Arc;

/// A generated CSV document and its suggested file name
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub filename: String,
    pub content: Vec<u8>,
    pub rows: usize,
}

pub struct ReportApi {
    store: Arc<dyn ParkingStore>,
}

impl ReportApi {
    pub fn new(store: Arc<dyn ParkingStore>) -> Self {
        Self { store }
    }

    /// Logs in `[start, end]` matching `term` on plate or owner, most recent first
    pub async fn search_logs(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        term: Option<&str>,
    ) -> ApiResult<Vec<FormattedLogRecord>> {
        let vehicles = self.store.list_vehicles().await?;
        // an inverted range reads nothing; the engine reports it
        let logs = self.store.list_logs_between(start, end).await?;
        let records = ReportQueryEngine::query_logs(&vehicles, &logs, start, end, term)?;
        tracing::debug!(%start, %end, rows = records.len(), "log report computed");
        Ok(records)
    }

    /// Vehicles matching `term` on plate, owner or model, sorted by owner
    pub async fn search_vehicles(&self, term: Option<&str>) -> ApiResult<Vec<Vehicle>> {
        let vehicles = self.store.list_vehicles().await?;
        Ok(ReportQueryEngine::search_vehicles(&vehicles, term)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Every log of one day with its vehicle, earliest entry first
    pub async fn daily_logs(
        &self,
        date: NaiveDate,
        term: Option<&str>,
    ) -> ApiResult<Vec<ParkingLogView>> {
        let vehicles = self.store.list_vehicles().await?;
        let logs = self.store.list_logs_between(date, date).await?;
        Ok(ReportQueryEngine::daily_logs(&vehicles, &logs, date, term)
            .into_iter()
            .map(ParkingLogView::from)
            .collect())
    }

    pub async fn export_logs_csv(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        term: Option<&str>,
    ) -> ApiResult<CsvExport> {
        let records = self.search_logs(start, end, term).await?;
        let content = to_csv_bytes(&records)?;
        Ok(CsvExport {
            filename: log_report_filename(start, end),
            content,
            rows: records.len(),
        })
    }

    pub async fn export_vehicles_csv(&self, term: Option<&str>) -> ApiResult<CsvExport> {
        let vehicles = self.store.list_vehicles().await?;
        let selected = ReportQueryEngine::search_vehicles(&vehicles, term);
        let records = ReportQueryEngine::vehicle_export_records(&selected);
        let content = to_csv_bytes(&records)?;
        Ok(CsvExport {
            filename: VEHICLE_LIST_FILENAME.to_string(),
            content,
            rows: records.len(),
        })
    }
}
