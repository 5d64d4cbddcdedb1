use std::{
    io::{BufRead, BufReader, Cursor, Read},
    path::{Path, PathBuf},
};

use tokio::{
    fs::{self, File},
    io::AsyncWriteExt,
    task::block_in_place,
};
use zip::{result::ZipError, ZipArchive};

use crate::error::Error;

/// Reads a single entry out of a zip/jar archive into memory.
pub async fn read_archive_file(archive_path: &Path, entry: &str) -> crate::Result<Vec<u8>> {
    let archive_data = fs::read(archive_path).await?;
    let cursor = Cursor::new(archive_data);

    let mut archive = block_in_place(|| ZipArchive::new(cursor))?;
    let mut file = block_in_place(|| archive.by_name(entry))?;

    let mut content = Vec::with_capacity(file.size() as usize);
    block_in_place(|| file.read_to_end(&mut content))?;

    Ok(content)
}

/// Extracts a single archive entry to exactly `destination`, creating
/// parent directories as needed.
pub async fn extract_archive_file(
    archive_path: &Path,
    entry: &str,
    destination: &Path,
) -> crate::Result<()> {
    let content = read_archive_file(archive_path, entry).await?;

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut output = File::create(destination).await?;
    output.write_all(&content).await?;

    Ok(())
}

/// Like [`extract_archive_file`] but tolerates a missing entry, returning
/// whether anything was written. Older installer formats lack some
/// entries and their absence is not an error.
pub async fn try_extract_archive_file(
    archive_path: &Path,
    entry: &str,
    destination: &Path,
) -> crate::Result<bool> {
    match extract_archive_file(archive_path, entry, destination).await {
        Ok(()) => Ok(true),
        Err(Error::Zip(ZipError::FileNotFound)) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Reads the `Main-Class` attribute from a jar's manifest.
pub async fn jar_main_class(jar_path: &Path) -> crate::Result<Option<String>> {
    let path = PathBuf::from(jar_path);
    let main_class = tokio::task::spawn_blocking(move || {
        let file = std::fs::File::open(&path)?;
        let mut archive = ZipArchive::new(file)?;
        let manifest = archive.by_name("META-INF/MANIFEST.MF")?;

        let reader = BufReader::new(manifest);
        for line in reader.lines() {
            let mut line = line?;
            line.retain(|c| !c.is_whitespace());
            if let Some(class) = line.strip_prefix("Main-Class:") {
                return Ok::<Option<String>, Error>(Some(class.to_string()));
            }
        }
        Ok(None)
    })
    .await
    .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))??;

    Ok(main_class)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::write::FileOptions;

    use super::*;

    fn write_test_archive(entries: &[(&str, &str)]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("kindling-test-{}.jar", uuid::Uuid::new_v4()));
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for (name, content) in entries {
            writer.start_file(*name, FileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
        path
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn reads_named_entry() {
        let path = write_test_archive(&[("install_profile.json", r#"{"version":"x"}"#)]);
        let content = read_archive_file(&path, "install_profile.json").await.unwrap();
        assert_eq!(content, br#"{"version":"x"}"#);
        std::fs::remove_file(path).ok();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn missing_entry_is_tolerated_by_try_extract() {
        let path = write_test_archive(&[("version.json", "{}")]);
        let dest = std::env::temp_dir().join(format!("kindling-test-{}", uuid::Uuid::new_v4()));
        assert!(!try_extract_archive_file(&path, "data/client.lzma", &dest)
            .await
            .unwrap());
        assert!(try_extract_archive_file(&path, "version.json", &dest)
            .await
            .unwrap());
        std::fs::remove_file(path).ok();
        std::fs::remove_file(dest).ok();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn reads_main_class_from_manifest() {
        let path = write_test_archive(&[(
            "META-INF/MANIFEST.MF",
            "Manifest-Version: 1.0\nMain-Class: net.example.Installer\n",
        )]);
        let main_class = jar_main_class(&path).await.unwrap();
        assert_eq!(main_class.as_deref(), Some("net.example.Installer"));
        std::fs::remove_file(path).ok();
    }
}
