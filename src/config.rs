//! Runtime configuration from the environment

use std::path::{Path, PathBuf};

use crate::provider::UsdaConfig;

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub export_dir: PathBuf,
    pub usda: UsdaConfig,
}

impl Config {
    /// Read `NUTRIFACTS_DATABASE_PATH`, `NUTRIFACTS_EXPORT_DIR` and the USDA variables
    pub fn from_env() -> Self {
        let root = project_root();
        Self {
            database_path: std::env::var("NUTRIFACTS_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| root.join("data").join("nutrifacts.db")),
            export_dir: std::env::var("NUTRIFACTS_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| root.join("exports")),
            usda: UsdaConfig::from_env(),
        }
    }

    /// Resolve an export path; relative paths land in the export directory
    pub fn resolve_export_path(&self, path: &str) -> PathBuf {
        resolve_against(&self.export_dir, path)
    }
}

fn resolve_against(base: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Directory holding the executable, or the project root when run from `target/`
fn project_root() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path
}
