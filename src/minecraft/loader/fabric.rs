use std::env::temp_dir;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::error::Error;
use crate::http::{downloader::download, fetch::fetch_json};
use crate::maven::fetch_metadata;
use crate::minecraft::engine::InstallEngine;
use crate::minecraft::progress::ProgressState;

const META_ENDPOINT: &str = "https://meta.fabricmc.net/v2";
const INSTALLER_MAVEN_URL: &str =
    "https://maven.fabricmc.net/net/fabricmc/fabric-installer/maven-metadata.xml";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GameVersion {
    pub version: String,
    pub stable: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoaderVersion {
    pub version: String,
    pub stable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maven: Option<String>,
}

// Remote version lists change rarely; both are fetched once per process.
static GAME_VERSIONS: OnceCell<Vec<GameVersion>> = OnceCell::const_new();
static LOADER_VERSIONS: OnceCell<Vec<LoaderVersion>> = OnceCell::const_new();

/// All Minecraft versions fabric has loader support for.
pub async fn all_game_versions() -> crate::Result<&'static [GameVersion]> {
    let versions = GAME_VERSIONS
        .get_or_try_init(|| fetch_json(format!("{META_ENDPOINT}/versions/game")))
        .await?;
    Ok(versions.as_slice())
}

/// The stable subset of [`all_game_versions`].
pub async fn stable_game_versions() -> crate::Result<Vec<String>> {
    Ok(all_game_versions()
        .await?
        .iter()
        .filter(|v| v.stable)
        .map(|v| v.version.clone())
        .collect())
}

/// Latest fabric-supported Minecraft version; may be a snapshot.
pub async fn latest_game_version() -> crate::Result<String> {
    all_game_versions()
        .await?
        .first()
        .map(|v| v.version.clone())
        .ok_or_else(|| Error::VersionNotFound("fabric game version".to_string()))
}

/// Latest stable fabric-supported Minecraft version.
pub async fn latest_stable_game_version() -> crate::Result<String> {
    stable_game_versions()
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| Error::VersionNotFound("stable fabric game version".to_string()))
}

pub async fn is_game_version_supported(version: &str) -> crate::Result<bool> {
    Ok(all_game_versions()
        .await?
        .iter()
        .any(|v| v.version == version))
}

pub async fn all_loader_versions() -> crate::Result<&'static [LoaderVersion]> {
    let versions = LOADER_VERSIONS
        .get_or_try_init(|| fetch_json(format!("{META_ENDPOINT}/versions/loader")))
        .await?;
    Ok(versions.as_slice())
}

pub async fn latest_loader_version() -> crate::Result<String> {
    all_loader_versions()
        .await?
        .first()
        .map(|v| v.version.clone())
        .ok_or_else(|| Error::VersionNotFound("fabric loader version".to_string()))
}

/// Latest fabric installer artifact version, from maven metadata.
pub async fn latest_installer_version() -> crate::Result<String> {
    fetch_metadata(INSTALLER_MAVEN_URL)
        .await?
        .versioning
        .latest
        .ok_or_else(|| Error::VersionNotFound("fabric installer".to_string()))
}

/// Version id the fabric installer registers on disk.
pub fn composite_version_id(loader_version: &str, minecraft_version: &str) -> String {
    format!("fabric-loader-{loader_version}-{minecraft_version}")
}

fn installer_command(
    java: Option<&Path>,
    installer_path: &Path,
    dir: &Path,
    minecraft_version: &str,
    loader_version: &str,
) -> Vec<String> {
    vec![
        java.map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| "java".to_string()),
        "-jar".to_string(),
        installer_path.to_string_lossy().into_owned(),
        "client".to_string(),
        "-dir".to_string(),
        dir.to_string_lossy().into_owned(),
        "-mcversion".to_string(),
        minecraft_version.to_string(),
        "-loader".to_string(),
        loader_version.to_string(),
        "-noprofile".to_string(),
        "-snapshot".to_string(),
    ]
}

/// Installs a fabric loader version on top of a Minecraft version.
///
/// Validates the request up front, ensures the base version is installed
/// through the engine, runs the official installer headlessly and
/// finally installs the generated composite version id.
pub async fn install_fabric(
    minecraft_version: &str,
    dir: &Path,
    loader_version: Option<&str>,
    engine: &dyn InstallEngine,
    progress: &mut ProgressState<'_>,
    java: Option<&Path>,
) -> crate::Result<()> {
    if !engine.version_exists(minecraft_version, dir).await? {
        return Err(Error::VersionNotFound(minecraft_version.to_string()));
    }
    if !is_game_version_supported(minecraft_version).await? {
        return Err(Error::UnsupportedVersion(minecraft_version.to_string()));
    }

    let loader_version = match loader_version {
        Some(version) => version.to_string(),
        None => latest_loader_version().await?,
    };

    engine
        .install_version(minecraft_version, dir, progress)
        .await?;

    let installer_version = latest_installer_version().await?;
    let installer_url = format!(
        "https://maven.fabricmc.net/net/fabricmc/fabric-installer/{installer_version}/fabric-installer-{installer_version}.jar"
    );
    let installer_path = temp_dir().join(format!("fabric-installer-{}.tmp", Uuid::new_v4()));
    download(installer_url, &installer_path, progress).await?;

    progress.status("Running fabric installer");
    let command = installer_command(java, &installer_path, dir, minecraft_version, &loader_version);
    info!("running fabric installer: {command:?}");
    let output = Command::new(&command[0])
        .args(&command[1..])
        .output()
        .await?;
    if !output.status.success() {
        return Err(Error::ExternalProgram {
            command,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    tokio::fs::remove_file(&installer_path).await?;

    let composite = composite_version_id(&loader_version, minecraft_version);
    engine.install_version(&composite, dir, progress).await
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn composite_id_embeds_loader_and_game_version() {
        assert_eq!(
            composite_version_id("0.15.6", "1.20.1"),
            "fabric-loader-0.15.6-1.20.1"
        );
    }

    #[test]
    fn installer_invocation_uses_fixed_flag_set() {
        let command = installer_command(
            None,
            &PathBuf::from("/tmp/fabric-installer.tmp"),
            &PathBuf::from("/games/minecraft"),
            "1.20.1",
            "0.15.6",
        );
        assert_eq!(
            command,
            vec![
                "java",
                "-jar",
                "/tmp/fabric-installer.tmp",
                "client",
                "-dir",
                "/games/minecraft",
                "-mcversion",
                "1.20.1",
                "-loader",
                "0.15.6",
                "-noprofile",
                "-snapshot",
            ]
        );
    }

    #[test]
    fn installer_invocation_honors_explicit_java() {
        let command = installer_command(
            Some(Path::new("/opt/jdk17/bin/java")),
            &PathBuf::from("/tmp/i.tmp"),
            &PathBuf::from("/games/minecraft"),
            "1.20.1",
            "0.15.6",
        );
        assert_eq!(command[0], "/opt/jdk17/bin/java");
    }
}
