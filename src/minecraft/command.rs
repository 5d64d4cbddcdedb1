use std::collections::HashMap;
use std::path::Path;
use std::process::ExitStatus;

use log::info;
use tokio::process::Command;

use crate::error::Error;
use crate::json::descriptor::VersionDescriptor;
use crate::maven;
use crate::minecraft::arguments;
use crate::minecraft::descriptor::load_descriptor;
use crate::minecraft::options::LaunchOptions;
use crate::minecraft::runtime;
use crate::minecraft::{CLASSPATH_SEPARATOR, NATIVE_ARCH, TARGET_OS};

/// Synthesizes the ordered launch command line for an installed version.
///
/// The returned tokens start with the Java executable and end with the
/// game arguments; order is significant throughout. Fails with
/// [`Error::VersionNotFound`] before touching any file when the version
/// directory does not exist.
pub async fn build_command(
    version: &str,
    dir: &Path,
    options: &LaunchOptions,
) -> crate::Result<Vec<String>> {
    if !dir.join("versions").join(version).is_dir() {
        return Err(Error::VersionNotFound(version.to_string()));
    }

    let descriptor = load_descriptor(version, dir).await?;

    let natives_directory = options.natives_directory.clone().unwrap_or_else(|| {
        dir.join("versions")
            .join(&descriptor.id)
            .join("natives")
    });
    let classpath = build_classpath(&descriptor, dir, options)?;

    let mut command = Vec::with_capacity(100);

    // Java executable: explicit override, then the descriptor's bundled
    // runtime, then the caller default, then the search path.
    if let Some(executable) = &options.executable_path {
        command.push(executable.to_string_lossy().into_owned());
    } else if let Some(java) = &descriptor.java_version {
        match runtime::executable_path(&java.component, dir) {
            Some(path) => command.push(path.to_string_lossy().into_owned()),
            None => command.push("java".to_string()),
        }
    } else if let Some(default) = &options.default_executable_path {
        command.push(default.to_string_lossy().into_owned());
    } else {
        command.push("java".to_string());
    }

    command.extend(options.jvm_arguments.iter().cloned());

    let variables = variables(&descriptor, dir, options, &natives_directory, &classpath);

    // Newer descriptors template their own JVM arguments; everything
    // older gets the fixed natives/classpath triple.
    match descriptor.arguments.as_ref().and_then(|args| args.jvm.as_ref()) {
        Some(jvm) => arguments::expand(jvm, &variables, options, &mut command),
        None => {
            command.push(format!(
                "-Djava.library.path={}",
                natives_directory.to_string_lossy()
            ));
            command.push("-cp".to_string());
            command.push(classpath.clone());
        }
    }

    if options.enable_logging_config {
        if let Some(client) = descriptor.logging.as_ref().and_then(|logging| logging.client.as_ref()) {
            let config_path = dir.join("assets").join("log_configs").join(&client.file.id);
            command.push(
                client
                    .argument
                    .replace("${path}", &config_path.to_string_lossy()),
            );
        }
    }

    let main_class = descriptor
        .main_class
        .as_deref()
        .ok_or_else(|| Error::MalformedDescriptor {
            version: descriptor.id.clone(),
            reason: "no main class after inheritance resolution".to_string(),
        })?;
    command.push(main_class.to_string());

    if let Some(minecraft_arguments) = &descriptor.minecraft_arguments {
        command.extend(
            minecraft_arguments
                .split_whitespace()
                .map(|token| arguments::substitute(&variables, token)),
        );
    } else if let Some(args) = &descriptor.arguments {
        arguments::expand(&args.game, &variables, options, &mut command);
    }

    if let Some(server) = &options.server {
        command.push("--server".to_string());
        command.push(server.clone());
        if let Some(port) = &options.port {
            command.push("--port".to_string());
            command.push(port.clone());
        }
    }
    if options.disable_multiplayer {
        command.push("--disableMultiplayer".to_string());
    }
    if options.disable_chat {
        command.push("--disableChat".to_string());
    }

    Ok(command)
}

/// Builds the command line and spawns it, inheriting standard I/O and
/// blocking until the game exits.
pub async fn run(
    version: &str,
    dir: &Path,
    options: &LaunchOptions,
) -> crate::Result<ExitStatus> {
    let command = build_command(version, dir, options).await?;
    info!("launching {version}: {command:?}");

    let status = Command::new(&command[0])
        .args(&command[1..])
        .spawn()?
        .wait()
        .await?;
    Ok(status)
}

/// Joins the rule-filtered library paths plus the version jar into a
/// single classpath string.
fn build_classpath(
    descriptor: &VersionDescriptor,
    dir: &Path,
    options: &LaunchOptions,
) -> crate::Result<String> {
    let mut entries = Vec::with_capacity(descriptor.libraries.len() + 1);

    for library in &descriptor.libraries {
        if !arguments::rules_allow(library.rules.as_deref(), options) {
            continue;
        }
        entries.push(
            maven::library_path(&library.name, dir)?
                .to_string_lossy()
                .into_owned(),
        );

        let Some(natives) = &library.natives else {
            continue;
        };
        let Some(classifier) = natives.get(TARGET_OS) else {
            continue;
        };
        let classifier = classifier.replace("${arch}", NATIVE_ARCH);

        // Prefer the explicit classifier artifact path, fall back to the
        // conventional maven layout.
        let declared = library
            .downloads
            .as_ref()
            .and_then(|downloads| downloads.classifiers.as_ref())
            .and_then(|classifiers| classifiers.get(&classifier))
            .and_then(|artifact| artifact.path.as_deref());
        let native_path = match declared {
            Some(path) => {
                let mut full = dir.join("libraries");
                for segment in path.split('/') {
                    full.push(segment);
                }
                full
            }
            None => maven::library_path(&format!("{}:{}", library.name, classifier), dir)?,
        };
        entries.push(native_path.to_string_lossy().into_owned());
    }

    entries.push(
        dir.join("versions")
            .join(&descriptor.id)
            .join(format!("{}.jar", descriptor.id))
            .to_string_lossy()
            .into_owned(),
    );

    Ok(entries.join(CLASSPATH_SEPARATOR))
}

fn variables(
    descriptor: &VersionDescriptor,
    dir: &Path,
    options: &LaunchOptions,
    natives_directory: &Path,
    classpath: &str,
) -> HashMap<&'static str, String> {
    let mut variables = HashMap::with_capacity(24);
    let mut insert = |key: &'static str, value: String| {
        variables.insert(key, value);
    };

    if let Some(username) = &options.username {
        insert("${auth_player_name}", username.clone());
    }
    if let Some(uuid) = &options.uuid {
        insert("${auth_uuid}", uuid.clone());
        insert("${auth_xuid}", uuid.clone());
    }
    if let Some(token) = &options.token {
        insert("${auth_access_token}", token.clone());
        insert("${auth_session}", token.clone());
    }
    insert("${user_type}", "msa".to_string());
    insert("${user_properties}", "{}".to_string());
    // The original launcher's client id.
    insert("${clientid}", "00000000402b5328".to_string());

    insert(
        "${launcher_name}",
        options
            .launcher_name
            .clone()
            .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string()),
    );
    insert(
        "${launcher_version}",
        options
            .launcher_version
            .clone()
            .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
    );

    insert("${version_name}", descriptor.id.clone());
    insert(
        "${game_directory}",
        options
            .game_directory
            .clone()
            .unwrap_or_else(|| dir.to_path_buf())
            .to_string_lossy()
            .into_owned(),
    );

    let assets_dir = dir.join("assets");
    insert("${assets_root}", assets_dir.to_string_lossy().into_owned());
    insert(
        "${game_assets}",
        assets_dir
            .join("virtual")
            .join("legacy")
            .to_string_lossy()
            .into_owned(),
    );
    if let Some(index) = descriptor
        .assets
        .clone()
        .or_else(|| descriptor.asset_index.as_ref().map(|index| index.id.clone()))
    {
        insert("${assets_index_name}", index);
    }
    if let Some(release_type) = &descriptor.r#type {
        insert("${version_type}", release_type.clone());
    }

    insert(
        "${natives_directory}",
        natives_directory.to_string_lossy().into_owned(),
    );
    insert("${classpath}", classpath.to_string());
    insert(
        "${library_directory}",
        dir.join("libraries").to_string_lossy().into_owned(),
    );
    insert("${classpath_separator}", CLASSPATH_SEPARATOR.to_string());

    insert(
        "${resolution_width}",
        options
            .resolution_width
            .clone()
            .unwrap_or_else(|| "854".to_string()),
    );
    insert(
        "${resolution_height}",
        options
            .resolution_height
            .clone()
            .unwrap_or_else(|| "480".to_string()),
    );

    variables
}
