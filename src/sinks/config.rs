use serde::Deserialize;

/// First summary row used when a destination holds no earlier runs.
pub const DEFAULT_FIRST_ROW: u64 = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReportConfig {
    pub json_dir: Option<String>,
    pub sqlite_path: Option<String>,
    pub first_row: Option<u64>,
}

impl ReportConfig {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.json_dir.is_none() && self.sqlite_path.is_none()
    }

    #[must_use]
    pub fn first_row(&self) -> u64 {
        self.first_row.unwrap_or(DEFAULT_FIRST_ROW)
    }
}
