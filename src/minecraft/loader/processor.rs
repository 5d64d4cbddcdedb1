use std::collections::HashMap;
use std::env::temp_dir;
use std::path::{Path, PathBuf};

use log::{info, warn};
use tokio::process::Command;
use uuid::Uuid;

use crate::error::Error;
use crate::json::profile::{InstallProfile, ProcessorStep};
use crate::maven;
use crate::minecraft::progress::ProgressState;
use crate::minecraft::CLASSPATH_SEPARATOR;
use crate::util::extract::jar_main_class;

/// What to do when a processor step exits non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepFailurePolicy {
    /// Abort the install on the first failing step.
    #[default]
    FailFast,
    /// Log the failure and keep replaying the remaining steps.
    Continue,
}

/// Replays the install profile's processor steps against the freshly
/// installed libraries.
///
/// The scratch root handed to the steps as `{ROOT}` is removed when the
/// pipeline ends, whatever the outcome.
pub(crate) async fn run_processors(
    profile: &InstallProfile,
    dir: &Path,
    installer_path: &Path,
    binpatch_path: &Path,
    java: Option<&Path>,
    policy: StepFailurePolicy,
    progress: &mut ProgressState<'_>,
) -> crate::Result<()> {
    let scratch_root = temp_dir().join(format!("forge-root-{}", Uuid::new_v4()));
    let variables =
        template_variables(profile, dir, installer_path, binpatch_path, &scratch_root)?;

    let result = run_steps(profile, dir, &variables, java, policy, progress).await;
    tokio::fs::remove_dir_all(&scratch_root).await.ok();
    result
}

async fn run_steps(
    profile: &InstallProfile,
    dir: &Path,
    variables: &HashMap<String, String>,
    java: Option<&Path>,
    policy: StepFailurePolicy,
    progress: &mut ProgressState<'_>,
) -> crate::Result<()> {
    progress.set_max(profile.processors.len());

    for (index, step) in profile.processors.iter().enumerate() {
        if !step.runs_on_client() {
            continue;
        }
        progress.status(&format!("Running processor {}", step.jar));

        let command = step_command(step, dir, variables, java).await?;
        info!("processor {}: {command:?}", step.jar);

        let output = Command::new(&command[0])
            .args(&command[1..])
            .output()
            .await?;
        if !output.status.success() {
            match policy {
                StepFailurePolicy::FailFast => {
                    return Err(Error::ExternalProgram {
                        command,
                        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    });
                }
                StepFailurePolicy::Continue => {
                    warn!(
                        "processor {} exited with {:?}, continuing",
                        step.jar,
                        output.status.code()
                    );
                }
            }
        }
        progress.set_progress(index + 1);
    }

    Ok(())
}

/// Seeds the substitution table: the fixed pipeline entries plus one per
/// profile `data` key. Bracketed values name a library artifact and
/// resolve through the maven layout.
fn template_variables(
    profile: &InstallProfile,
    dir: &Path,
    installer_path: &Path,
    binpatch_path: &Path,
    scratch_root: &Path,
) -> crate::Result<HashMap<String, String>> {
    let mut variables = HashMap::with_capacity(profile.data.len() + 5);

    variables.insert(
        "{MINECRAFT_JAR}".to_string(),
        dir.join("versions")
            .join(&profile.minecraft)
            .join(format!("{}.jar", profile.minecraft))
            .to_string_lossy()
            .into_owned(),
    );

    for (key, entry) in &profile.data {
        let value = match bracketed(&entry.client) {
            Some(coordinate) => maven::library_path(coordinate, dir)?
                .to_string_lossy()
                .into_owned(),
            None => entry.client.clone(),
        };
        variables.insert(format!("{{{key}}}"), value);
    }

    variables.insert(
        "{INSTALLER}".to_string(),
        installer_path.to_string_lossy().into_owned(),
    );
    variables.insert(
        "{BINPATCH}".to_string(),
        binpatch_path.to_string_lossy().into_owned(),
    );
    variables.insert(
        "{ROOT}".to_string(),
        scratch_root.to_string_lossy().into_owned(),
    );
    variables.insert("{SIDE}".to_string(), "client".to_string());

    Ok(variables)
}

async fn step_command(
    step: &ProcessorStep,
    dir: &Path,
    variables: &HashMap<String, String>,
    java: Option<&Path>,
) -> crate::Result<Vec<String>> {
    let jar_path = maven::library_path(&step.jar, dir)?;

    let mut classpath = Vec::with_capacity(step.classpath.len() + 1);
    for entry in &step.classpath {
        classpath.push(
            maven::library_path(entry, dir)?
                .to_string_lossy()
                .into_owned(),
        );
    }
    classpath.push(jar_path.to_string_lossy().into_owned());

    let main_class = jar_main_class(&jar_path)
        .await?
        .ok_or_else(|| Error::MainClassNotFound(jar_path.to_string_lossy().into_owned()))?;

    let mut command = vec![
        java.map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| "java".to_string()),
        "-cp".to_string(),
        classpath.join(CLASSPATH_SEPARATOR),
        main_class,
    ];
    command.extend(substitute_step_args(&step.args, variables, dir)?);

    // Second textual pass: the first pass can leave a template token
    // nested inside an already-substituted value.
    for token in command.iter_mut() {
        for (key, value) in variables {
            *token = token.replace(key, value);
        }
    }

    Ok(command)
}

/// Maps each raw step argument through the variable table; values that
/// come out bracketed resolve via the maven layout instead of being
/// passed literally.
fn substitute_step_args(
    args: &[String],
    variables: &HashMap<String, String>,
    dir: &Path,
) -> crate::Result<Vec<String>> {
    let mut substituted = Vec::with_capacity(args.len());
    for arg in args {
        let value = variables.get(arg).cloned().unwrap_or_else(|| arg.clone());
        match bracketed(&value) {
            Some(coordinate) => substituted.push(
                maven::library_path(coordinate, dir)?
                    .to_string_lossy()
                    .into_owned(),
            ),
            None => substituted.push(value),
        }
    }
    Ok(substituted)
}

fn bracketed(value: &str) -> Option<&str> {
    value.strip_prefix('[').and_then(|v| v.strip_suffix(']'))
}
