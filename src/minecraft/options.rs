use std::path::PathBuf;

/// Caller-supplied launch configuration.
///
/// Every field is optional; an absent field omits the corresponding
/// segment of the command line or falls back to the documented default.
/// The command synthesizer never mutates this record — derived values
/// such as the resolved natives directory and classpath are computed into
/// a private context.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// Player name substituted for `${auth_player_name}`.
    pub username: Option<String>,
    /// Player uuid substituted for `${auth_uuid}` and `${auth_xuid}`.
    pub uuid: Option<String>,
    /// Access token substituted for `${auth_access_token}`.
    pub token: Option<String>,
    /// Java executable to use, overriding every other source.
    pub executable_path: Option<PathBuf>,
    /// Java executable used when the descriptor declares no runtime
    /// component. Defaults to `java` from the search path.
    pub default_executable_path: Option<PathBuf>,
    /// Raw JVM arguments appended verbatim right after the executable.
    pub jvm_arguments: Vec<String>,
    /// Defaults to this crate's name.
    pub launcher_name: Option<String>,
    /// Defaults to this crate's version.
    pub launcher_version: Option<String>,
    /// Working/game directory. Defaults to the minecraft directory the
    /// command is built for.
    pub game_directory: Option<PathBuf>,
    /// Asserts the `is_demo_user` feature rule. Defaults to false.
    pub demo: bool,
    /// Asserts the `has_custom_resolution` feature rule. Defaults to false.
    pub custom_resolution: bool,
    /// Defaults to `854` when a template references it.
    pub resolution_width: Option<String>,
    /// Defaults to `480` when a template references it.
    pub resolution_height: Option<String>,
    /// Server address to join on startup; adds `--server <value>`.
    pub server: Option<String>,
    /// Server port; only emitted together with `server`.
    pub port: Option<String>,
    /// Defaults to `<dir>/versions/<id>/natives`.
    pub natives_directory: Option<PathBuf>,
    /// Emit the log-configuration JVM argument when the descriptor
    /// declares one. Defaults to false.
    pub enable_logging_config: bool,
    /// Appends `--disableMultiplayer`. Defaults to false.
    pub disable_multiplayer: bool,
    /// Appends `--disableChat`. Defaults to false.
    pub disable_chat: bool,
}

impl LaunchOptions {
    /// Options for an offline session: a username, a random uuid and a
    /// placeholder token.
    pub fn offline(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            uuid: Some(uuid::Uuid::new_v4().to_string()),
            token: Some(String::new()),
            ..Self::default()
        }
    }
}
