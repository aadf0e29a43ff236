use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

/// Session state the caller chooses to carry between runs. The core never
/// reads this on its own; load it, pass it around, save it back explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub version: u32,
    #[serde(default)]
    pub last_dir: Option<String>,
    #[serde(default)]
    pub include_subfolders: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            version: 1,
            last_dir: None,
            include_subfolders: false,
        }
    }
}

#[must_use]
pub fn settings_file(base_dir: &Path) -> PathBuf {
    base_dir.join("duptree.json")
}

#[must_use]
pub fn load_settings(path: &Path) -> Option<AppSettings> {
    let data = fs::read(path).ok()?;
    serde_json::from_slice::<AppSettings>(&data).ok()
}

/// Atomic save: write a sibling temp file, then rename over the target.
pub fn save_settings(path: &Path, settings: &AppSettings) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");

    let data = serde_json::to_vec_pretty(settings).map_err(|e| io::Error::other(e.to_string()))?;

    fs::write(&tmp, data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
