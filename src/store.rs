use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};
use tokio::fs;
use tokio::sync::Mutex;

use crate::table::Table;

pub const TABLE_FILE: &str = "roulette_table.json";

/// Keeps the table snapshot in a JSON file between restarts.
pub struct TableStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl TableStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TableStore {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is a fresh table. A corrupt one is discarded.
    pub async fn load(&self) -> Result<Table> {
        if !self.path.exists() {
            info!("no table snapshot at {}, starting fresh", self.path.display());
            return Ok(Table::default());
        }

        let content = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading {}", self.path.display()))?;
        let mut table = match serde_json::from_str::<Table>(&content) {
            Ok(table) => table,
            Err(why) => {
                warn!(
                    "discarding unreadable table snapshot {}: {}",
                    self.path.display(),
                    why
                );
                fs::remove_file(&self.path).await?;
                return Ok(Table::default());
            }
        };

        let aborted = table.abort_unsettled_spins();
        if aborted > 0 {
            warn!("refunded {} spins interrupted by a restart", aborted);
        }
        Ok(table)
    }

    /// Writes the snapshot next to the target and renames it into place, so a
    /// reader only ever sees a complete file. Concurrent saves are serialized.
    pub async fn save(&self, table: &Table) -> Result<()> {
        let content = serde_json::to_string_pretty(table)?;
        let _guard = self.write_lock.lock().await;
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, content)
            .await
            .with_context(|| format!("writing {}", staging.display()))?;
        fs::rename(&staging, &self.path)
            .await
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}
