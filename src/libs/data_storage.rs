use anyhow::Result;
use std::env::consts::OS;
use std::env::var;
use std::path::{Path, PathBuf};
use std::fs;

pub const VENDOR_NAME: &str = "devrhythm";
pub const APP_NAME: &str = "devrhythm";
const SESSIONS_DIR: &str = "sessions";

/// Platform data directory holding config, ledgers, status records and the
/// session registry.
#[derive(Debug, Clone)]
pub struct DataStorage {
    base_path: PathBuf,
}

impl DataStorage {
    pub fn new() -> Self {
        let base_path = match OS {
            "windows" => var("LOCALAPPDATA").unwrap_or_else(|_| ".".into()),
            "macos" => var("HOME").unwrap_or_else(|_| ".".into()) + "/Library/Application Support",
            _ => var("HOME").unwrap_or_else(|_| ".".into()) + "/.local/share",
        };
        let base_path = Path::new(&base_path).join(VENDOR_NAME).join(APP_NAME);

        Self { base_path }
    }

    /// Storage rooted at an explicit directory.
    pub fn at(base_path: impl Into<PathBuf>) -> Self {
        Self { base_path: base_path.into() }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn get_path(&self, file_name: &str) -> Result<PathBuf> {
        if !self.base_path.exists() {
            fs::create_dir_all(&self.base_path)?;
        }
        Ok(self.base_path.join(file_name))
    }

    /// Root of the session registry.
    pub fn sessions_dir(&self) -> Result<PathBuf> {
        let dir = self.base_path.join(SESSIONS_DIR);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

impl Default for DataStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// Login name of the current user, as used in ledger file names.
pub fn current_user() -> String {
    ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .find_map(|key| var(key).ok().filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| "user".to_string())
}
