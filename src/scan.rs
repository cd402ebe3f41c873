//! Asset discovery: which items exist and where their sources live.
//!
//! ## Directory Structure
//!
//! ```text
//! assets/                      # general.assets_folder
//! ├── thumb/
//! │   ├── alpha.png
//! │   └── beta.jpg
//! ├── screenshot/
//! │   └── alpha.PNG            # extensions compare case-insensitively
//! ├── logo/
//! │   ├── beta.gif
//! │   └── gamma.png
//! └── template/
//!     └── frame.png            # template.image = "frame", shared by all items
//! ```
//!
//! An item is a base name (file stem) present in at least one enabled
//! thumb, screenshot or logo folder. The example above yields the items
//! `alpha`, `beta` and `gamma`, in that order. Only `.jpg`, `.png` and `.gif`
//! files count; everything else is ignored.

use crate::config::MixConfig;
use crate::imaging::is_supported_image;
use crate::types::LayerRole;
use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Locates source files per role and base name.
///
/// Shared by every worker of a batch, hence `Sync`.
pub trait AssetResolver: Sync {
    /// Path of the `role` source for `base_name`, if one exists.
    fn find(&self, role: LayerRole, base_name: &str) -> Option<PathBuf>;

    /// Base names of every supported image in the `role` folder.
    fn base_names(&self, role: LayerRole) -> io::Result<Vec<String>>;
}

/// Resolver over `<assets_root>/<role>/` folders.
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    root: PathBuf,
}

impl DirectoryResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn role_dir(&self, role: LayerRole) -> PathBuf {
        self.root.join(role.dir_name())
    }
}

impl AssetResolver for DirectoryResolver {
    fn find(&self, role: LayerRole, base_name: &str) -> Option<PathBuf> {
        find_image_by_name(&self.role_dir(role), base_name)
    }

    fn base_names(&self, role: LayerRole) -> io::Result<Vec<String>> {
        let files = list_images(&self.role_dir(role))?;
        Ok(files.iter().filter_map(|p| file_stem(p)).collect())
    }
}

/// Supported image files directly inside `dir`, sorted by path.
///
/// Symlinks count when they point at a file; dangling ones are ignored.
fn list_images(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(io::Error::from)?;
        let path = entry.path();
        if path.is_file() && is_supported_image(path) {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().to_string())
}

/// First supported image in `dir` whose stem equals `base_name`.
///
/// Stems compare exactly; only the extension is case-insensitive. When
/// several extensions share a stem, the lexicographically first path wins.
/// A missing or unreadable folder finds nothing.
pub fn find_image_by_name(dir: &Path, base_name: &str) -> Option<PathBuf> {
    list_images(dir)
        .ok()?
        .into_iter()
        .find(|p| file_stem(p).as_deref() == Some(base_name))
}

/// Sorted, de-duplicated base names over the enabled item-source roles.
///
/// The template folder never contributes items.
pub fn discover_items(
    resolver: &impl AssetResolver,
    config: &MixConfig,
) -> io::Result<Vec<String>> {
    let mut names = BTreeSet::new();
    for role in LayerRole::ITEM_SOURCES {
        if role_enabled(config, role) {
            names.extend(resolver.base_names(role)?);
        }
    }
    Ok(names.into_iter().collect())
}

/// Whether `role` takes part in this run.
pub fn role_enabled(config: &MixConfig, role: LayerRole) -> bool {
    match role {
        LayerRole::Screenshot => config.screenshot.enabled,
        LayerRole::Logo => config.logo.enabled,
        LayerRole::Thumb => config.thumb.enabled,
        LayerRole::Template => config.template.enabled,
    }
}

/// Which enabled roles have a source for `base_name`.
pub fn available_roles(
    resolver: &impl AssetResolver,
    config: &MixConfig,
    base_name: &str,
) -> Vec<LayerRole> {
    LayerRole::COMPOSITE_ORDER
        .into_iter()
        .filter(|&role| role != LayerRole::Template && role_enabled(config, role))
        .filter(|&role| resolver.find(role, base_name).is_some())
        .collect()
}

/// Which layer sources one item has on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSources {
    pub base_name: String,
    pub roles: Vec<LayerRole>,
}

/// Discover every item and the enabled roles it has a source for.
pub fn survey(
    resolver: &impl AssetResolver,
    config: &MixConfig,
) -> io::Result<Vec<ItemSources>> {
    Ok(discover_items(resolver, config)?
        .into_iter()
        .map(|base_name| ItemSources {
            roles: available_roles(resolver, config, &base_name),
            base_name,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn setup_assets() -> TempDir {
        let tmp = TempDir::new().unwrap();
        for rel in [
            "thumb/alpha.png",
            "thumb/beta.jpg",
            "thumb/notes.txt",
            "screenshot/alpha.PNG",
            "screenshot/delta.jpeg",
            "logo/beta.gif",
            "logo/gamma.png",
            "template/frame.png",
            "template/zeta.png",
        ] {
            touch(tmp.path(), rel);
        }
        fs::create_dir_all(tmp.path().join("thumb/nested.png")).unwrap();
        tmp
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_sources_are_listed() {
        let tmp = setup_assets();
        let shared = tmp.path().join("shared.png");
        fs::write(&shared, "").unwrap();
        std::os::unix::fs::symlink(&shared, tmp.path().join("logo/linked.png")).unwrap();
        std::os::unix::fs::symlink(
            tmp.path().join("gone.png"),
            tmp.path().join("logo/dangling.png"),
        )
        .unwrap();

        let resolver = DirectoryResolver::new(tmp.path());
        assert_eq!(
            resolver.base_names(LayerRole::Logo).unwrap(),
            vec!["beta", "gamma", "linked"]
        );
        assert_eq!(
            resolver.find(LayerRole::Logo, "linked"),
            Some(tmp.path().join("logo/linked.png"))
        );
    }

    #[test]
    fn base_names_filter_extensions() {
        let tmp = setup_assets();
        let resolver = DirectoryResolver::new(tmp.path());
        assert_eq!(
            resolver.base_names(LayerRole::Thumb).unwrap(),
            vec!["alpha", "beta"]
        );
        // .jpeg is not an accepted extension
        assert_eq!(
            resolver.base_names(LayerRole::Screenshot).unwrap(),
            vec!["alpha"]
        );
    }

    #[test]
    fn discover_items_is_sorted_union() {
        let tmp = setup_assets();
        let resolver = DirectoryResolver::new(tmp.path());
        let items = discover_items(&resolver, &MixConfig::default()).unwrap();
        assert_eq!(items, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn discover_items_skips_disabled_roles_and_template() {
        let tmp = setup_assets();
        let resolver = DirectoryResolver::new(tmp.path());
        let mut config = MixConfig::default();
        config.logo.enabled = false;
        let items = discover_items(&resolver, &config).unwrap();
        assert_eq!(items, vec!["alpha", "beta"]);
        assert!(!items.contains(&"frame".to_string()));
    }

    #[test]
    fn missing_enabled_folder_is_error() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "thumb/alpha.png");
        let resolver = DirectoryResolver::new(tmp.path());
        assert!(discover_items(&resolver, &MixConfig::default()).is_err());
    }

    #[test]
    fn missing_disabled_folder_is_ignored() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "thumb/alpha.png");
        let resolver = DirectoryResolver::new(tmp.path());
        let mut config = MixConfig::default();
        config.screenshot.enabled = false;
        config.logo.enabled = false;
        assert_eq!(discover_items(&resolver, &config).unwrap(), vec!["alpha"]);
    }

    #[test]
    fn find_matches_stem_with_any_case_extension() {
        let tmp = setup_assets();
        let resolver = DirectoryResolver::new(tmp.path());
        let found = resolver.find(LayerRole::Screenshot, "alpha").unwrap();
        assert!(found.ends_with("screenshot/alpha.PNG"));
        assert!(resolver.find(LayerRole::Screenshot, "delta").is_none());
        assert!(resolver.find(LayerRole::Logo, "alpha").is_none());
    }

    #[test]
    fn find_in_missing_folder_is_none() {
        let tmp = TempDir::new().unwrap();
        assert!(find_image_by_name(&tmp.path().join("nope"), "alpha").is_none());
    }

    #[test]
    fn find_template_by_configured_name() {
        let tmp = setup_assets();
        let resolver = DirectoryResolver::new(tmp.path());
        let found = resolver.find(LayerRole::Template, "frame").unwrap();
        assert!(found.ends_with("template/frame.png"));
    }

    #[test]
    fn available_roles_lists_enabled_sources() {
        let tmp = setup_assets();
        let resolver = DirectoryResolver::new(tmp.path());
        let config = MixConfig::default();
        assert_eq!(
            available_roles(&resolver, &config, "alpha"),
            vec![LayerRole::Screenshot, LayerRole::Thumb]
        );
        assert_eq!(
            available_roles(&resolver, &config, "beta"),
            vec![LayerRole::Logo, LayerRole::Thumb]
        );
    }

    #[test]
    fn survey_pairs_items_with_roles() {
        let tmp = setup_assets();
        let resolver = DirectoryResolver::new(tmp.path());
        let items = survey(&resolver, &MixConfig::default()).unwrap();
        assert_eq!(
            items,
            vec![
                ItemSources {
                    base_name: "alpha".to_string(),
                    roles: vec![LayerRole::Screenshot, LayerRole::Thumb],
                },
                ItemSources {
                    base_name: "beta".to_string(),
                    roles: vec![LayerRole::Logo, LayerRole::Thumb],
                },
                ItemSources {
                    base_name: "gamma".to_string(),
                    roles: vec![LayerRole::Logo],
                },
            ]
        );
    }
}
