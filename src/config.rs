//! Data-path resolution.
//!
//! Paths come from (highest precedence first): per-file flags, `--data-dir`,
//! `DASH_DATA_DIR` (environment or `.env`), the `../data` default.

use std::path::{Path, PathBuf};

use crate::cli::DataArgs;
use crate::domain::Granularity;
use crate::error::AppError;

/// Resolved locations of the four extracts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub transactions: PathBuf,
    pub monthly: PathBuf,
    pub weekly: PathBuf,
    pub daily: PathBuf,
}

impl DataPaths {
    /// Default file names inside one directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            transactions: dir.join(Granularity::Transaction.file_name()),
            monthly: dir.join(Granularity::Monthly.file_name()),
            weekly: dir.join(Granularity::Weekly.file_name()),
            daily: dir.join(Granularity::Daily.file_name()),
        }
    }

    pub fn from_args(args: &DataArgs) -> Self {
        let defaults = Self::in_dir(&args.data_dir);
        Self {
            transactions: args.final_csv.clone().unwrap_or(defaults.transactions),
            monthly: args.monthly_csv.clone().unwrap_or(defaults.monthly),
            weekly: args.weekly_csv.clone().unwrap_or(defaults.weekly),
            daily: args.daily_csv.clone().unwrap_or(defaults.daily),
        }
    }

    pub fn get(&self, granularity: Granularity) -> &Path {
        match granularity {
            Granularity::Transaction => &self.transactions,
            Granularity::Monthly => &self.monthly,
            Granularity::Weekly => &self.weekly,
            Granularity::Daily => &self.daily,
        }
    }

    /// Fail early (exit code 2) when any extract is missing.
    pub fn validate(&self) -> Result<(), AppError> {
        for granularity in Granularity::ALL {
            let path = self.get(granularity);
            if !path.is_file() {
                return Err(AppError::new(
                    2,
                    format!(
                        "{} extract not found: {} (set --data-dir or DASH_DATA_DIR)",
                        granularity.display_name(),
                        path.display()
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Load `.env` into the process environment, if present.
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}
