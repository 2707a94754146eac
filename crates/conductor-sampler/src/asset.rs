//! Locating bundled assets.

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Sample every demo plays unless told otherwise.
pub const DEFAULT_SAMPLE_PATH: &str = "Samples/beat.aiff";

/// Environment variable that overrides the asset root.
pub const ASSETS_ENV: &str = "CONDUCTOR_ASSETS";

/// Asset root used when [`ASSETS_ENV`] is unset.
pub const DEFAULT_ASSETS_DIR: &str = "assets";

/// A directory of bundled resources, addressed by relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetBundle {
    root: PathBuf,
}

impl AssetBundle {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `$CONDUCTOR_ASSETS`, or `./assets`.
    pub fn from_env() -> Self {
        match std::env::var_os(ASSETS_ENV) {
            Some(root) if !root.is_empty() => Self::new(root),
            _ => Self::new(DEFAULT_ASSETS_DIR),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute or root-relative path of an existing asset.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> Result<PathBuf> {
        let path = self.root.join(relative);
        if path.is_file() {
            Ok(path)
        } else {
            Err(Error::AssetNotFound(path))
        }
    }

    pub fn contains(&self, relative: impl AsRef<Path>) -> bool {
        self.resolve(relative).is_ok()
    }
}

impl Default for AssetBundle {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Samples")).unwrap();
        std::fs::write(dir.path().join(DEFAULT_SAMPLE_PATH), b"FORM").unwrap();

        let bundle = AssetBundle::new(dir.path());
        assert_eq!(
            bundle.resolve(DEFAULT_SAMPLE_PATH).unwrap(),
            dir.path().join("Samples/beat.aiff")
        );
        assert!(matches!(
            bundle.resolve("Samples/missing.aiff"),
            Err(Error::AssetNotFound(_))
        ));
        // Directories are not assets
        assert!(!bundle.contains("Samples"));
    }
}
