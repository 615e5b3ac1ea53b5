// Asset catalogs. Handles are only checked for existence, never opened.

use crate::domain::ports::{AssetCatalog, ResourceHandle};
use std::path::PathBuf;

/// Resolves names to files that exist under a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetCatalog for DirectoryAssets {
    fn resolve(&self, name: &str) -> Option<ResourceHandle> {
        if name.is_empty() {
            return None;
        }
        let path = self.root.join(name);
        path.is_file()
            .then(|| ResourceHandle::new(path.to_string_lossy().into_owned()))
    }
}

/// Accepts any non-empty name. Used for headless runs without an asset directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamedAssets;

impl AssetCatalog for NamedAssets {
    fn resolve(&self, name: &str) -> Option<ResourceHandle> {
        let name = name.trim();
        (!name.is_empty()).then(|| ResourceHandle::new(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_assets_resolve_only_existing_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("space.png"), b"png").expect("write asset");
        let assets = DirectoryAssets::new(dir.path());

        let handle = assets.resolve("space.png").expect("asset exists");
        assert!(handle.name().ends_with("space.png"));
        assert!(assets.resolve("missing.png").is_none());
        assert!(assets.resolve("").is_none());
    }

    #[test]
    fn named_assets_reject_blank_names() {
        assert_eq!(
            NamedAssets.resolve("font.ttf"),
            Some(ResourceHandle::new("font.ttf"))
        );
        assert!(NamedAssets.resolve("  ").is_none());
    }
}
