// Run configuration with compiled defaults.
//
// The converter takes no CLI flags or environment variables; paths, sheet
// names, the percentage clamp policy, and the watch interval are all plain
// values here so a deployment can adjust them in one place.
use crate::util::ClampMode;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_WORKBOOK: &str = "dashboard.xlsx";
pub const DEFAULT_OUTPUT: &str = "data/dashboard.json";
pub const DEFAULT_POLL_SECS: u64 = 5;

/// Names of the logical sheets inside the workbook. Any sheet may be absent;
/// the summary sheet in particular varies across source workbooks, so its
/// name is configuration rather than a constant.
#[derive(Debug, Clone)]
pub struct SheetNames {
    pub levels: String,
    pub zones: String,
    pub summary: String,
    pub waves: String,
    pub orders: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            levels: "levels".to_string(),
            zones: "zones".to_string(),
            summary: "summary".to_string(),
            waves: "waves".to_string(),
            orders: "orders".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub workbook_path: PathBuf,
    pub output_path: PathBuf,
    pub sheets: SheetNames,
    pub clamp: ClampMode,
    pub poll_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workbook_path: PathBuf::from(DEFAULT_WORKBOOK),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            sheets: SheetNames::default(),
            clamp: ClampMode::Clamp,
            poll_interval: Duration::from_secs(DEFAULT_POLL_SECS),
        }
    }
}
