//! Runtime status of the service

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

use super::ApiResult;
use crate::build_info::BuildInfo;
use crate::db::{migrations, Database};

/// Status payload served at `/status`
#[derive(Debug, Clone, Serialize)]
pub struct ServerStatus {
    #[serde(flatten)]
    pub build: BuildInfo,

    pub schema_version: i32,
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    pub server_time: String,
    pub uptime_seconds: u64,
}

/// Tracks process start time for uptime reporting
#[derive(Debug, Clone)]
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    pub fn get_status(&self, db: &Database) -> ApiResult<ServerStatus> {
        let schema_version = db.with_conn(|conn| migrations::get_schema_version(conn))?;

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        Ok(ServerStatus {
            build: BuildInfo::current(),
            schema_version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            server_time: chrono::Utc::now().to_rfc3339(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_and_migrate;

    #[test]
    fn test_status_reports_schema_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.db");
        let db = open_and_migrate(&path).unwrap();

        let status = StatusTracker::new(path).get_status(&db).unwrap();
        assert_eq!(status.schema_version, migrations::SCHEMA_VERSION);
        assert!(status.database_size_bytes.unwrap_or(0) > 0);
        assert_eq!(status.build.name, "foodbuddy");
    }
}
