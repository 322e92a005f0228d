// ShipSearch - app/session.rs
//
// Interactive session state: the loaded dataset, the last request and the
// current page. Everything here is in memory; nothing is persisted between
// runs.
//
// The page number is the only state carried from one interaction to the
// next. It resets to 1 whenever the dataset or the request changes.

use crate::app::cache::DatasetCache;
use crate::app::pipeline::{self, QueryRequest, QueryResponse};
use crate::core::model::Table;
use crate::core::policy::ColumnPolicy;
use crate::core::query::ColumnSelector;
use crate::platform::config::AppConfig;
use crate::util::error::{ExportError, LoadError, QueryError, ShipSearchError};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One user's view over a dataset.
#[derive(Debug)]
pub struct Session {
    policy: ColumnPolicy,
    page_size: usize,
    max_export_rows: usize,
    export_file: PathBuf,
    cache: DatasetCache,

    dataset: Option<Arc<Table>>,
    dataset_path: Option<PathBuf>,
    request: QueryRequest,
    page: usize,
    response: Option<QueryResponse>,
}

impl Session {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            policy: config.policy.clone(),
            page_size: config.page_size,
            max_export_rows: config.max_export_rows,
            export_file: config.export_file.clone(),
            cache: DatasetCache::new(),
            dataset: None,
            dataset_path: None,
            request: QueryRequest::default(),
            page: 1,
            response: None,
        }
    }

    pub fn policy(&self) -> &ColumnPolicy {
        &self.policy
    }

    /// Current 1-based page number.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn request(&self) -> &QueryRequest {
        &self.request
    }

    /// Response of the most recent successful run.
    pub fn response(&self) -> Option<&QueryResponse> {
        self.response.as_ref()
    }

    /// Load (or reuse) the dataset at `path` and make it current.
    ///
    /// On failure the previous dataset and response are cleared so no stale
    /// results remain visible.
    pub fn open(&mut self, path: &Path) -> Result<Arc<Table>, LoadError> {
        match self.cache.get_or_load(path, &self.policy) {
            Ok(table) => {
                let changed = self
                    .dataset
                    .as_ref()
                    .map_or(true, |current| !Arc::ptr_eq(current, &table));
                if changed || self.dataset_path.as_deref() != Some(path) {
                    self.page = 1;
                }
                self.dataset = Some(Arc::clone(&table));
                self.dataset_path = Some(path.to_path_buf());
                Ok(table)
            }
            Err(e) => {
                self.dataset = None;
                self.dataset_path = None;
                self.response = None;
                Err(e)
            }
        }
    }

    /// Column picker entries for the current dataset.
    pub fn columns(&self) -> Vec<ColumnSelector> {
        match &self.dataset {
            Some(table) => pipeline::list_searchable_columns(table, &self.policy),
            None => vec![ColumnSelector::Unselected],
        }
    }

    /// Load `path` and run `request` on it. A request that differs from the
    /// previous one starts again at page 1.
    pub fn run(
        &mut self,
        path: &Path,
        request: QueryRequest,
    ) -> Result<&QueryResponse, ShipSearchError> {
        self.open(path)?;
        if request != self.request {
            self.page = 1;
            self.request = request;
        }
        Ok(self.refresh()?)
    }

    /// Jump to `page` (clamped into range) and re-run the current request.
    pub fn set_page(&mut self, page: usize) -> Result<&QueryResponse, QueryError> {
        self.page = page.max(1);
        self.refresh()
    }

    /// Advance one page; stays put on the last page.
    pub fn next_page(&mut self) -> Result<&QueryResponse, QueryError> {
        if self.response.as_ref().is_some_and(|r| r.info.has_next()) {
            self.page += 1;
        }
        self.refresh()
    }

    /// Go back one page; stays put on the first page.
    pub fn previous_page(&mut self) -> Result<&QueryResponse, QueryError> {
        if self.page > 1 {
            self.page -= 1;
        }
        self.refresh()
    }

    /// Export the current result set to `path`, or the configured export file.
    ///
    /// Returns `Ok(None)` when the last response does not allow export
    /// (no keyword or date selection, or no rows).
    pub fn export(&self, path: Option<&Path>) -> Result<Option<PathBuf>, ExportError> {
        let Some(response) = self.response.as_ref().filter(|r| r.export_allowed) else {
            tracing::info!("Nothing to export for the current request");
            return Ok(None);
        };
        let target = path.unwrap_or(&self.export_file);
        pipeline::export(&response.results, target, &self.policy, self.max_export_rows).map(Some)
    }

    fn refresh(&mut self) -> Result<&QueryResponse, QueryError> {
        let table = match &self.dataset {
            Some(table) => Arc::clone(table),
            None => Arc::new(Table::default()),
        };
        let response = pipeline::execute(
            &table,
            &self.request,
            self.page,
            &self.policy,
            self.page_size,
        )?;
        self.page = response.info.page_number;
        Ok(self.response.insert(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_dataset(dir: &TempDir, rows: usize) -> PathBuf {
        let mut content = String::from("NOMOR AJU,HS,TANGGAL PENGAJUAN,KODE DOKUMEN\n");
        for i in 0..rows {
            content.push_str(&format!("AJU-{i:04},8471.{i:02},2024-01-{:02},860\n", i % 28 + 1));
        }
        let path = dir.path().join("data.csv");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn config(page_size: usize) -> AppConfig {
        AppConfig {
            page_size,
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let dir = TempDir::new().unwrap();
        let path = write_dataset(&dir, 25);
        let mut session = Session::new(&config(10));

        let info = session.run(&path, QueryRequest::default()).unwrap().info;
        assert_eq!(info.total_pages, 3);

        assert_eq!(session.previous_page().unwrap().info.page_number, 1);
        session.next_page().unwrap();
        let last = session.next_page().unwrap().info;
        assert_eq!(last.page_number, 3);
        assert_eq!(last.len(), 5);
        assert_eq!(session.next_page().unwrap().info.page_number, 3);
    }

    #[test]
    fn test_changed_request_resets_page() {
        let dir = TempDir::new().unwrap();
        let path = write_dataset(&dir, 25);
        let mut session = Session::new(&config(10));

        session.run(&path, QueryRequest::default()).unwrap();
        session.set_page(3).unwrap();
        assert_eq!(session.page(), 3);

        // Same request keeps the page.
        session.run(&path, QueryRequest::default()).unwrap();
        assert_eq!(session.page(), 3);

        let request = QueryRequest {
            column: ColumnSelector::Named("HS".into()),
            keyword: "8471".into(),
            ..QueryRequest::default()
        };
        session.run(&path, request).unwrap();
        assert_eq!(session.page(), 1);
    }

    #[test]
    fn test_set_page_is_clamped() {
        let dir = TempDir::new().unwrap();
        let path = write_dataset(&dir, 25);
        let mut session = Session::new(&config(10));
        session.run(&path, QueryRequest::default()).unwrap();

        assert_eq!(session.set_page(40).unwrap().info.page_number, 3);
        assert_eq!(session.set_page(0).unwrap().info.page_number, 1);
    }

    #[test]
    fn test_export_requires_keyword_or_date_selection() {
        let dir = TempDir::new().unwrap();
        let path = write_dataset(&dir, 5);
        let out = dir.path().join("hasil.csv");
        let mut session = Session::new(&config(10));

        session.run(&path, QueryRequest::default()).unwrap();
        assert_eq!(session.export(Some(&out)).unwrap(), None);
        assert!(!out.exists());

        let request = QueryRequest {
            column: ColumnSelector::Named("DOKUMEN".into()),
            keyword: "e-coo".into(),
            ..QueryRequest::default()
        };
        session.run(&path, request).unwrap();
        assert_eq!(session.export(Some(&out)).unwrap(), Some(out.clone()));
        assert!(out.exists());
    }

    #[test]
    fn test_failed_load_clears_results() {
        let dir = TempDir::new().unwrap();
        let path = write_dataset(&dir, 5);
        let mut session = Session::new(&config(10));
        session.run(&path, QueryRequest::default()).unwrap();
        assert!(session.response().is_some());

        let err = session
            .run(&dir.path().join("absent.xlsx"), QueryRequest::default())
            .unwrap_err();
        assert!(matches!(err, ShipSearchError::Load(LoadError::NotFound { .. })));
        assert!(session.response().is_none());
        assert_eq!(session.columns(), vec![ColumnSelector::Unselected]);
    }
}
