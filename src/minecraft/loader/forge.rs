use std::env::temp_dir;
use std::path::{Path, PathBuf};

use log::info;
use tokio::process::Command;
use uuid::Uuid;

use crate::error::Error;
use crate::http::downloader::download;
use crate::json::profile::InstallProfile;
use crate::maven::fetch_metadata;
use crate::minecraft::engine::InstallEngine;
use crate::minecraft::progress::ProgressState;
use crate::util::extract::{extract_archive_file, read_archive_file, try_extract_archive_file};

pub use super::processor::StepFailurePolicy;

const MAVEN_METADATA_URL: &str =
    "https://files.minecraftforge.net/maven/net/minecraftforge/forge/maven-metadata.xml";

/// Options for [`install_forge_version`]; the defaults use `java` from
/// the search path and abort on the first failing processor step.
#[derive(Debug, Clone, Default)]
pub struct ForgeInstallOptions {
    pub java: Option<PathBuf>,
    pub step_failure: StepFailurePolicy,
}

fn installer_url(version_id: &str) -> String {
    format!(
        "https://files.minecraftforge.net/maven/net/minecraftforge/forge/{version_id}/forge-{version_id}-installer.jar"
    )
}

/// Installs a Forge version id (`<minecraft>-<forge>`), including its
/// embedded post-install processor pipeline.
pub async fn install_forge_version(
    version_id: &str,
    dir: &Path,
    engine: &dyn InstallEngine,
    progress: &mut ProgressState<'_>,
    options: &ForgeInstallOptions,
) -> crate::Result<()> {
    let installer_path = temp_dir().join(format!("forge-installer-{}.tmp", Uuid::new_v4()));
    match download(installer_url(version_id), &installer_path, progress).await {
        Ok(()) => {}
        Err(Error::Download { .. }) => {
            return Err(Error::VersionNotFound(version_id.to_string()));
        }
        Err(e) => return Err(e),
    }

    let profile: InstallProfile =
        serde_json::from_slice(&read_archive_file(&installer_path, "install_profile.json").await?)?;
    let forge_version_id = profile.version.clone();
    info!("installing forge {forge_version_id} on top of {}", profile.minecraft);

    // The base version and the profile's own library set come first.
    engine
        .install_version(&profile.minecraft, dir, progress)
        .await?;
    engine
        .install_libraries(&profile.libraries, dir, progress)
        .await?;

    let descriptor_path = dir
        .join("versions")
        .join(&forge_version_id)
        .join(format!("{forge_version_id}.json"));
    extract_archive_file(&installer_path, "version.json", &descriptor_path).await?;

    // Forge's own jars ship inside the installer; older formats lack
    // some of these entries.
    let forge_lib_dir = dir
        .join("libraries")
        .join("net")
        .join("minecraftforge")
        .join("forge")
        .join(version_id);
    try_extract_archive_file(
        &installer_path,
        &format!("maven/net/minecraftforge/forge/{version_id}/forge-{version_id}.jar"),
        &forge_lib_dir.join(format!("forge-{version_id}.jar")),
    )
    .await?;
    try_extract_archive_file(
        &installer_path,
        &format!("maven/net/minecraftforge/forge/{version_id}/forge-{version_id}-universal.jar"),
        &forge_lib_dir.join(format!("forge-{version_id}-universal.jar")),
    )
    .await?;

    let binpatch_path = temp_dir().join(format!("forge-binpatch-{}.tmp", Uuid::new_v4()));
    try_extract_archive_file(&installer_path, "data/client.lzma", &binpatch_path).await?;

    // Bootstraps the new version's library set before the processors
    // patch it into a runnable client.
    engine
        .install_version(&forge_version_id, dir, progress)
        .await?;

    super::processor::run_processors(
        &profile,
        dir,
        &installer_path,
        &binpatch_path,
        options.java.as_deref(),
        options.step_failure,
        progress,
    )
    .await?;

    tokio::fs::remove_file(&installer_path).await?;
    tokio::fs::remove_file(&binpatch_path).await.ok();
    Ok(())
}

/// Downloads and runs the interactive Forge installer, inheriting
/// standard I/O.
pub async fn run_forge_installer(version_id: &str, java: Option<&Path>) -> crate::Result<()> {
    let installer_path = temp_dir().join(format!("forge-installer-{}.tmp", Uuid::new_v4()));
    download(
        installer_url(version_id),
        &installer_path,
        &mut ProgressState::none(),
    )
    .await?;

    let command = vec![
        java.map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| "java".to_string()),
        "-jar".to_string(),
        installer_path.to_string_lossy().into_owned(),
    ];
    let status = Command::new(&command[0])
        .args(&command[1..])
        .spawn()?
        .wait()
        .await?;
    tokio::fs::remove_file(&installer_path).await.ok();

    if !status.success() {
        return Err(Error::ExternalProgram {
            command,
            stdout: String::new(),
            stderr: String::new(),
        });
    }
    Ok(())
}

/// All published Forge versions, newest first.
pub async fn list_forge_versions() -> crate::Result<Vec<String>> {
    Ok(fetch_metadata(MAVEN_METADATA_URL)
        .await?
        .versioning
        .versions
        .versions)
}

/// Latest Forge version compatible with the given vanilla version.
pub async fn find_forge_version(vanilla_version: &str) -> crate::Result<Option<String>> {
    Ok(match_forge_version(
        &list_forge_versions().await?,
        vanilla_version,
    ))
}

fn match_forge_version(versions: &[String], vanilla_version: &str) -> Option<String> {
    versions
        .iter()
        .find(|version| version.split('-').next() == Some(vanilla_version))
        .cloned()
}

pub async fn is_forge_version_valid(forge_version: &str) -> crate::Result<bool> {
    Ok(list_forge_versions()
        .await?
        .iter()
        .any(|version| version == forge_version))
}

/// Whether [`install_forge_version`] can handle the version. The
/// processor-pipeline installer format starts at Minecraft 1.13.
pub fn supports_automatic_install(forge_version: &str) -> bool {
    let Some((vanilla_version, _)) = forge_version.split_once('-') else {
        return false;
    };
    let minor = vanilla_version
        .split('.')
        .nth(1)
        .and_then(|part| part.parse::<u32>().ok());
    matches!(minor, Some(minor) if minor >= 13)
}

/// Version id Forge registers on disk for a `<minecraft>-<forge>`
/// version string.
pub fn forge_to_installed_version(forge_version: &str) -> crate::Result<String> {
    match forge_version.split_once('-') {
        Some((vanilla_part, forge_part)) if !forge_part.contains('-') => {
            Ok(format!("{vanilla_part}-forge-{forge_part}"))
        }
        _ => Err(Error::InvalidVersion(forge_version.to_string())),
    }
}
