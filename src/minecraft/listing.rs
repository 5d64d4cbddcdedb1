use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::Error;
use crate::util::json::read_json;

/// Summary of one locally installed version.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InstalledVersion {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_time: Option<String>,
}

/// Lists the versions installed under `<dir>/versions`. Entries without
/// a readable descriptor are skipped.
pub async fn installed_versions(dir: &Path) -> crate::Result<Vec<InstalledVersion>> {
    let versions_dir = dir.join("versions");
    if !versions_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut versions = Vec::new();
    let mut entries = fs::read_dir(&versions_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let Some(id) = name.to_str() else {
            continue;
        };
        let descriptor_path = entry.path().join(format!("{id}.json"));
        match read_json::<InstalledVersion, _>(&descriptor_path).await {
            Ok(version) => versions.push(version),
            Err(_) => continue,
        }
    }
    versions.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(versions)
}

/// Reads the newline-separated list of installed server version ids
/// from `<dir>/server.txt`.
pub async fn server_versions(dir: &Path) -> crate::Result<Vec<String>> {
    let path = dir.join("server.txt");
    let contents = match fs::read_to_string(&path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::ServerListMissing(path));
        }
        Err(e) => return Err(e.into()),
    };
    Ok(contents.lines().map(str::to_string).collect())
}

/// Platform default `.minecraft` directory.
pub fn default_game_directory() -> Option<PathBuf> {
    let base = BaseDirs::new()?;
    if cfg!(target_os = "windows") {
        Some(base.config_dir().join(".minecraft"))
    } else if cfg!(target_os = "macos") {
        Some(base.config_dir().join("minecraft"))
    } else {
        Some(base.home_dir().join(".minecraft"))
    }
}
