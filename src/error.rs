use std::path::PathBuf;

use thiserror::Error;
use zip::result::ZipError;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Network(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] tokio::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Zip(#[from] ZipError),
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::DeError),
    #[error("Download of {url} failed with status code {status}")]
    Download { url: String, status: u16 },
    #[error("Version {0} was not found")]
    VersionNotFound(String),
    #[error("Version {0} is not supported by this loader")]
    UnsupportedVersion(String),
    #[error("Invalid version string: {0}")]
    InvalidVersion(String),
    #[error("Descriptor for version {version} is malformed: {reason}")]
    MalformedDescriptor { version: String, reason: String },
    #[error("External program {command:?} exited with an error:\n{stderr}")]
    ExternalProgram {
        command: Vec<String>,
        stdout: String,
        stderr: String,
    },
    #[error("Invalid maven coordinate: {0}")]
    InvalidCoordinate(String),
    #[error("No server list file at {0}")]
    ServerListMissing(PathBuf),
    #[error("No Main-Class manifest entry in {0}")]
    MainClassNotFound(String),
}
