use std::path::{Path, PathBuf};

/// Platform directory name used by the bundled runtime layout.
const fn runtime_platform() -> &'static str {
    if cfg!(target_os = "windows") {
        if cfg!(target_arch = "x86") {
            "windows-x86"
        } else if cfg!(target_arch = "aarch64") {
            "windows-arm64"
        } else {
            "windows-x64"
        }
    } else if cfg!(target_os = "macos") {
        if cfg!(target_arch = "aarch64") {
            "mac-os-arm64"
        } else {
            "mac-os"
        }
    } else if cfg!(target_arch = "x86") {
        "linux-i386"
    } else {
        "linux"
    }
}

/// Looks up the Java executable of an installed runtime component under
/// `<dir>/runtime/<component>/<platform>/<component>`.
///
/// Returns `None` when the component is not installed; callers fall back
/// to `java` from the search path.
pub fn executable_path(component: &str, dir: &Path) -> Option<PathBuf> {
    let base = dir
        .join("runtime")
        .join(component)
        .join(runtime_platform())
        .join(component);

    let java = if cfg!(target_os = "windows") {
        "java.exe"
    } else {
        "java"
    };

    let candidate = base.join("bin").join(java);
    if candidate.is_file() {
        return Some(candidate);
    }

    // macOS runtimes ship the executable inside a jre bundle.
    let bundled = base
        .join("jre.bundle")
        .join("Contents")
        .join("Home")
        .join("bin")
        .join(java);
    if bundled.is_file() {
        return Some(bundled);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_dir() -> PathBuf {
        std::env::temp_dir().join(format!("kindling-test-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn missing_component_resolves_to_none() {
        let dir = fixture_dir();
        assert_eq!(executable_path("java-runtime-gamma", &dir), None);
    }

    #[test]
    fn finds_installed_component() {
        let dir = fixture_dir();
        let bin = dir
            .join("runtime")
            .join("java-runtime-gamma")
            .join(runtime_platform())
            .join("java-runtime-gamma")
            .join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        let exe = bin.join(if cfg!(target_os = "windows") {
            "java.exe"
        } else {
            "java"
        });
        std::fs::write(&exe, b"").unwrap();

        assert_eq!(executable_path("java-runtime-gamma", &dir), Some(exe));
        std::fs::remove_dir_all(dir).ok();
    }
}
