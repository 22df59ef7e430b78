//! Replay configuration document.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::error::DataError;

/// Configuration for a replay session, loaded from a JSON document.
///
/// `data_path` and `auto_generate` are carried for the integration layer;
/// the engine itself does not interpret them.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayConfig {
    /// Object id to scene-handle mapping.
    #[serde(default)]
    pub prim_map: HashMap<String, String>,
    /// Ordered notable-event timestamps.
    #[serde(default)]
    pub event_summary: Vec<String>,
    /// Location of the trajectory table.
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    /// Whether the host should auto-generate missing scene objects.
    #[serde(default)]
    pub auto_generate: bool,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./data/merged_trajectory.csv")
}

/// Load a [`ReplayConfig`] from a JSON file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ReplayConfig, DataError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DataError::MissingSource(path.to_path_buf()));
    }
    let file = File::open(path)?;
    let config: ReplayConfig = serde_json::from_reader(BufReader::new(file))?;
    info!(
        "Config loaded: {} mappings, {} events",
        config.prim_map.len(),
        config.event_summary.len()
    );
    Ok(config)
}
