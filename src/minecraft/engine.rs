use std::path::Path;

use async_trait::async_trait;

use crate::json::profile::ProfileLibrary;
use crate::minecraft::progress::ProgressState;

/// Seam to the external install/download engine.
///
/// The loader installers orchestrate an engine but never resolve
/// packages or download version data themselves; the embedding launcher
/// supplies the implementation.
#[async_trait]
pub trait InstallEngine: Send + Sync {
    /// Installs (or repairs) a version id into the given directory.
    /// Composite loader ids are resolved from the descriptor already
    /// placed under `versions/<id>/`.
    async fn install_version(
        &self,
        version: &str,
        dir: &Path,
        progress: &mut ProgressState<'_>,
    ) -> crate::Result<()>;

    /// Downloads the libraries declared by a Forge install profile into
    /// `<dir>/libraries`.
    async fn install_libraries(
        &self,
        libraries: &[ProfileLibrary],
        dir: &Path,
        progress: &mut ProgressState<'_>,
    ) -> crate::Result<()>;

    /// Whether the version id is installed locally or resolvable
    /// remotely.
    async fn version_exists(&self, version: &str, dir: &Path) -> crate::Result<bool>;
}
