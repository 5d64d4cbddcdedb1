use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The `install_profile.json` embedded in a Forge installer jar.
///
/// Read once per install; discarded after the processor pipeline ran.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InstallProfile {
    /// Version id the install produces, e.g. `1.20.1-forge-47.2.0`.
    pub version: String,
    /// Base Minecraft version the install builds on.
    pub minecraft: String,
    #[serde(default)]
    pub libraries: Vec<ProfileLibrary>,
    #[serde(default)]
    pub processors: Vec<ProcessorStep>,
    /// Template-variable table for the processor pipeline. Values wrapped
    /// in `[...]` name a library artifact, everything else is literal.
    #[serde(default)]
    pub data: HashMap<String, SidedDataEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProfileLibrary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloads: Option<ProfileLibraryDownloads>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProfileLibraryDownloads {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<ProfileArtifact>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProfileArtifact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
}

/// One external-program invocation of the post-install pipeline.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProcessorStep {
    pub jar: String,
    #[serde(default)]
    pub classpath: Vec<String>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sides: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outputs: Option<HashMap<String, String>>,
}

impl ProcessorStep {
    /// A step runs on the client unless it declares a side list that
    /// excludes it.
    pub fn runs_on_client(&self) -> bool {
        match &self.sides {
            Some(sides) => sides.iter().any(|side| side == "client"),
            None => true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SidedDataEntry {
    pub client: String,
    #[serde(default)]
    pub server: String,
}
