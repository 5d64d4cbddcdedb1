use std::path::Path;

use log::debug;

use crate::error::Error;
use crate::json::descriptor::VersionDescriptor;
use crate::util::json::read_json;

/// Reads a version descriptor from `<dir>/versions/<version>/` and
/// resolves its `inheritsFrom` chain into one complete descriptor.
///
/// The result is validated: it must name a main class and carry either
/// legacy or structured argument data, otherwise the descriptor is
/// rejected as malformed.
pub async fn load_descriptor(version: &str, dir: &Path) -> crate::Result<VersionDescriptor> {
    let version_dir = dir.join("versions").join(version);
    if !version_dir.is_dir() {
        return Err(Error::VersionNotFound(version.to_string()));
    }

    let descriptor_path = version_dir.join(format!("{version}.json"));
    if !descriptor_path.is_file() {
        return Err(Error::MalformedDescriptor {
            version: version.to_string(),
            reason: "version directory has no descriptor file".to_string(),
        });
    }

    let mut descriptor: VersionDescriptor = read_json(&descriptor_path).await?;

    while let Some(parent_id) = descriptor.inherits_from.take() {
        debug!("{} inherits from {}", descriptor.id, parent_id);
        let parent_path = dir
            .join("versions")
            .join(&parent_id)
            .join(format!("{parent_id}.json"));
        if !parent_path.is_file() {
            return Err(Error::VersionNotFound(parent_id));
        }
        let parent: VersionDescriptor = read_json(&parent_path).await?;
        descriptor = merge(descriptor, parent);
    }

    ensure_launchable(&descriptor)?;
    Ok(descriptor)
}

/// Merges a child descriptor onto its parent.
///
/// Child scalars win; the child's library list is prepended to the
/// parent's; argument lists concatenate parent first so the child's
/// additions come last. The result carries the parent's own
/// `inheritsFrom` link, letting a caller walk the whole chain.
pub fn merge(child: VersionDescriptor, parent: VersionDescriptor) -> VersionDescriptor {
    let arguments = match (child.arguments, parent.arguments) {
        (Some(child_args), Some(parent_args)) => {
            let mut game = parent_args.game;
            game.extend(child_args.game);
            let jvm = match (parent_args.jvm, child_args.jvm) {
                (Some(mut parent_jvm), Some(child_jvm)) => {
                    parent_jvm.extend(child_jvm);
                    Some(parent_jvm)
                }
                (parent_jvm, child_jvm) => child_jvm.or(parent_jvm),
            };
            Some(crate::json::descriptor::Arguments { game, jvm })
        }
        (child_args, parent_args) => child_args.or(parent_args),
    };

    let mut libraries = child.libraries;
    libraries.extend(parent.libraries);

    VersionDescriptor {
        id: child.id,
        inherits_from: parent.inherits_from,
        main_class: child.main_class.or(parent.main_class),
        minecraft_arguments: child.minecraft_arguments.or(parent.minecraft_arguments),
        arguments,
        libraries,
        logging: child.logging.or(parent.logging),
        java_version: child.java_version.or(parent.java_version),
        r#type: child.r#type.or(parent.r#type),
        assets: child.assets.or(parent.assets),
        asset_index: child.asset_index.or(parent.asset_index),
    }
}

/// A descriptor used for launching must resolve to a main class and at
/// least one form of argument data.
pub fn ensure_launchable(descriptor: &VersionDescriptor) -> crate::Result<()> {
    if descriptor.main_class.as_deref().unwrap_or("").is_empty() {
        return Err(Error::MalformedDescriptor {
            version: descriptor.id.clone(),
            reason: "no main class after inheritance resolution".to_string(),
        });
    }
    if descriptor.minecraft_arguments.is_none() && descriptor.arguments.is_none() {
        return Err(Error::MalformedDescriptor {
            version: descriptor.id.clone(),
            reason: "neither legacy nor structured arguments present".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::json::descriptor::{Arguments, Element, Library};
    use crate::util::json::write_json;

    fn bare(id: &str) -> VersionDescriptor {
        VersionDescriptor {
            id: id.to_string(),
            inherits_from: None,
            main_class: None,
            minecraft_arguments: None,
            arguments: None,
            libraries: Vec::new(),
            logging: None,
            java_version: None,
            r#type: None,
            assets: None,
            asset_index: None,
        }
    }

    fn lib(name: &str) -> Library {
        Library {
            name: name.to_string(),
            rules: None,
            natives: None,
            downloads: None,
        }
    }

    fn tokens(elements: &[Element]) -> Vec<String> {
        elements
            .iter()
            .map(|e| match e {
                Element::String(s) => s.clone(),
                Element::Conditional(_) => unreachable!(),
            })
            .collect()
    }

    #[test]
    fn child_scalars_override_parent() {
        let mut child = bare("child");
        child.main_class = Some("net.child.Main".into());
        let mut parent = bare("parent");
        parent.main_class = Some("net.parent.Main".into());
        parent.assets = Some("12".into());

        let merged = merge(child, parent);
        assert_eq!(merged.id, "child");
        assert_eq!(merged.main_class.as_deref(), Some("net.child.Main"));
        assert_eq!(merged.assets.as_deref(), Some("12"));
    }

    #[test]
    fn argument_lists_concatenate_parent_first() {
        let mut child = bare("child");
        child.arguments = Some(Arguments {
            game: vec![Element::String("--fml".into())],
            jvm: Some(vec![Element::String("-Dchild".into())]),
        });
        let mut parent = bare("parent");
        parent.arguments = Some(Arguments {
            game: vec![Element::String("--username".into())],
            jvm: Some(vec![Element::String("-Dparent".into())]),
        });

        let merged = merge(child, parent).arguments.unwrap();
        assert_eq!(tokens(&merged.game), vec!["--username", "--fml"]);
        assert_eq!(tokens(&merged.jvm.unwrap()), vec!["-Dparent", "-Dchild"]);
    }

    #[test]
    fn child_libraries_come_first() {
        let mut child = bare("child");
        child.libraries = vec![lib("a:loader:1")];
        let mut parent = bare("parent");
        parent.libraries = vec![lib("b:base:1")];

        let merged = merge(child, parent);
        let names: Vec<&str> = merged.libraries.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["a:loader:1", "b:base:1"]);
    }

    fn fixture_dir() -> PathBuf {
        std::env::temp_dir().join(format!("kindling-test-{}", uuid::Uuid::new_v4()))
    }

    async fn write_descriptor(dir: &Path, descriptor: &VersionDescriptor) {
        let path = dir
            .join("versions")
            .join(&descriptor.id)
            .join(format!("{}.json", descriptor.id));
        write_json(&path, descriptor).await.unwrap();
    }

    #[tokio::test]
    async fn resolves_inheritance_chain() {
        let dir = fixture_dir();

        let mut parent = bare("1.20.1");
        parent.main_class = Some("net.minecraft.client.main.Main".into());
        parent.arguments = Some(Arguments {
            game: vec![Element::String("--version".into())],
            jvm: Some(vec![Element::String("-cp".into())]),
        });
        parent.libraries = vec![lib("com.mojang:base:1")];
        write_descriptor(&dir, &parent).await;

        let mut child = bare("fabric-loader-0.15.6-1.20.1");
        child.inherits_from = Some("1.20.1".into());
        child.main_class = Some("net.fabricmc.loader.impl.launch.knot.KnotClient".into());
        child.libraries = vec![lib("net.fabricmc:fabric-loader:0.15.6")];
        write_descriptor(&dir, &child).await;

        let resolved = load_descriptor("fabric-loader-0.15.6-1.20.1", &dir)
            .await
            .unwrap();
        assert_eq!(
            resolved.main_class.as_deref(),
            Some("net.fabricmc.loader.impl.launch.knot.KnotClient")
        );
        assert_eq!(resolved.libraries.len(), 2);
        assert_eq!(resolved.libraries[0].name, "net.fabricmc:fabric-loader:0.15.6");
        assert!(resolved.inherits_from.is_none());

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn missing_parent_is_version_not_found() {
        let dir = fixture_dir();

        let mut child = bare("modded");
        child.inherits_from = Some("1.99".into());
        child.main_class = Some("Main".into());
        child.arguments = Some(Arguments {
            game: vec![],
            jvm: None,
        });
        write_descriptor(&dir, &child).await;

        match load_descriptor("modded", &dir).await {
            Err(Error::VersionNotFound(id)) => assert_eq!(id, "1.99"),
            other => panic!("expected VersionNotFound, got {other:?}"),
        }

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn descriptor_without_arguments_is_malformed() {
        let dir = fixture_dir();

        let mut broken = bare("broken");
        broken.main_class = Some("Main".into());
        write_descriptor(&dir, &broken).await;

        assert!(matches!(
            load_descriptor("broken", &dir).await,
            Err(Error::MalformedDescriptor { .. })
        ));

        std::fs::remove_dir_all(dir).ok();
    }
}
