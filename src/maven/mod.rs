use std::path::{Path, PathBuf};

use reqwest::IntoUrl;
use serde::Deserialize;

use crate::error::Error;
use crate::http::fetch::fetch_text;

/// Turns a maven coordinate (`group:artifact:version[:classifier][@ext]`)
/// into its repository-relative path.
///
/// The extension defaults to `jar` when no `@ext` suffix is present:
/// `net.minecraftforge:forge:1.2.3@zip` becomes
/// `net/minecraftforge/forge/1.2.3/forge-1.2.3.zip`.
pub fn artifact_path(coordinate: &str) -> crate::Result<String> {
    let items: Vec<&str> = coordinate.split(':').collect();
    if items.len() < 3 || items.len() > 4 {
        return Err(Error::InvalidCoordinate(coordinate.to_string()));
    }

    let group = items[0];
    let name = items[1];
    if group.is_empty() || name.is_empty() {
        return Err(Error::InvalidCoordinate(coordinate.to_string()));
    }

    if items.len() == 3 {
        let (version, ext) = split_extension(items[2]);
        Ok(format!(
            "{}/{}/{}/{}-{}.{}",
            group.replace('.', "/"),
            name,
            version,
            name,
            version,
            ext
        ))
    } else {
        let version = items[2];
        let (classifier, ext) = split_extension(items[3]);
        Ok(format!(
            "{}/{}/{}/{}-{}-{}.{}",
            group.replace('.', "/"),
            name,
            version,
            name,
            version,
            classifier,
            ext
        ))
    }
}

fn split_extension(segment: &str) -> (&str, &str) {
    match segment.split_once('@') {
        Some((value, ext)) => (value, ext),
        None => (segment, "jar"),
    }
}

/// Resolves a coordinate to its location inside `<dir>/libraries`.
pub fn library_path(coordinate: &str, dir: &Path) -> crate::Result<PathBuf> {
    let mut path = dir.join("libraries");
    for segment in artifact_path(coordinate)?.split('/') {
        path.push(segment);
    }
    Ok(path)
}

/// The `<versioning>` block of a maven-metadata.xml document.
#[derive(Deserialize, Debug, Clone)]
pub struct MavenMetadata {
    pub versioning: Versioning,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Versioning {
    #[serde(default)]
    pub latest: Option<String>,
    #[serde(default)]
    pub release: Option<String>,
    #[serde(default)]
    pub versions: VersionList,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct VersionList {
    #[serde(default, rename = "version")]
    pub versions: Vec<String>,
}

impl MavenMetadata {
    pub fn parse(xml: &str) -> crate::Result<Self> {
        Ok(quick_xml::de::from_str(xml)?)
    }
}

/// Fetches and parses a remote maven-metadata.xml document.
pub async fn fetch_metadata(url: impl IntoUrl) -> crate::Result<MavenMetadata> {
    MavenMetadata::parse(&fetch_text(url).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_coordinate() {
        assert_eq!(
            artifact_path("net.fabricmc:fabric-loader:0.15.6").unwrap(),
            "net/fabricmc/fabric-loader/0.15.6/fabric-loader-0.15.6.jar"
        );
    }

    #[test]
    fn extension_override() {
        assert_eq!(
            artifact_path("net.minecraftforge:forge:1.2.3@zip").unwrap(),
            "net/minecraftforge/forge/1.2.3/forge-1.2.3.zip"
        );
    }

    #[test]
    fn classifier() {
        assert_eq!(
            artifact_path("org.lwjgl:lwjgl:3.3.3:natives-linux").unwrap(),
            "org/lwjgl/lwjgl/3.3.3/lwjgl-3.3.3-natives-linux.jar"
        );
    }

    #[test]
    fn classifier_with_extension() {
        assert_eq!(
            artifact_path("de.oceanlabs.mcp:mcp_config:1.20.1:mappings@txt").unwrap(),
            "de/oceanlabs/mcp/mcp_config/1.20.1/mcp_config-1.20.1-mappings.txt"
        );
    }

    #[test]
    fn rejects_short_coordinates() {
        assert!(matches!(
            artifact_path("only:two"),
            Err(Error::InvalidCoordinate(_))
        ));
        assert!(matches!(
            artifact_path("a:b:c:d:e"),
            Err(Error::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn library_path_is_rooted_at_libraries() {
        let path = library_path("com.example:thing:1.0", Path::new("game")).unwrap();
        let expected: PathBuf = ["game", "libraries", "com", "example", "thing", "1.0", "thing-1.0.jar"]
            .iter()
            .collect();
        assert_eq!(path, expected);
    }

    #[test]
    fn parses_metadata_document() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata>
  <groupId>net.fabricmc</groupId>
  <artifactId>fabric-installer</artifactId>
  <versioning>
    <latest>1.0.1</latest>
    <release>1.0.1</release>
    <versions>
      <version>0.11.2</version>
      <version>1.0.0</version>
      <version>1.0.1</version>
    </versions>
    <lastUpdated>20240101000000</lastUpdated>
  </versioning>
</metadata>"#;
        let metadata = MavenMetadata::parse(xml).unwrap();
        assert_eq!(metadata.versioning.latest.as_deref(), Some("1.0.1"));
        assert_eq!(metadata.versioning.versions.versions.len(), 3);
        assert_eq!(metadata.versioning.versions.versions[0], "0.11.2");
    }
}
