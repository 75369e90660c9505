//! Manifest file parsing and discovery

use crate::config::types::Manifest;
use crate::error::{ConfigError, ConfigResult, GantryError};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default manifest file names to search for
const MANIFEST_FILE_NAMES: &[&str] = &["gantry.yml", "gantry.yaml"];

/// Find the manifest file by searching current and parent directories
pub fn find_manifest_file() -> ConfigResult<PathBuf> {
    find_manifest_file_from(env::current_dir().map_err(|e| {
        ConfigError::Invalid(format!("Failed to get current directory: {}", e))
    })?)
}

/// Find the manifest file starting from a specific directory
pub fn find_manifest_file_from(start_dir: PathBuf) -> ConfigResult<PathBuf> {
    let mut current_dir = start_dir;
    let mut searched_paths = Vec::new();

    loop {
        for file_name in MANIFEST_FILE_NAMES {
            let manifest_path = current_dir.join(file_name);
            searched_paths.push(manifest_path.display().to_string());

            if manifest_path.exists() && manifest_path.is_file() {
                return Ok(manifest_path);
            }
        }

        // Try parent directory
        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => {
                // Reached root without finding a manifest
                return Err(ConfigError::NotFound(searched_paths.join(", ")));
            }
        }
    }
}

/// Parse a manifest file from a path
pub fn parse_manifest_file(path: &Path) -> Result<Manifest, GantryError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ConfigError::Invalid(format!("Failed to read file: {}", e)))?;

    parse_manifest(&contents)
}

/// Parse a manifest from a string
pub fn parse_manifest(yaml: &str) -> Result<Manifest, GantryError> {
    let manifest: Manifest = serde_yaml::from_str(yaml)?;
    Ok(manifest)
}

/// Parse a manifest with automatic file discovery
pub fn parse_manifest_auto() -> Result<(Manifest, PathBuf), GantryError> {
    let manifest_path = find_manifest_file()?;
    let manifest = parse_manifest_file(&manifest_path)?;
    Ok((manifest, manifest_path))
}
