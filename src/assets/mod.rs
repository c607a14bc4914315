use std::fs;
use std::path::PathBuf;

/// Read-only text-blob store for opponent display art. Absence is never an
/// error; callers render an empty block instead.
pub trait AssetStore {
    fn load(&self, name: &str) -> Option<String>;
}

/// Loads `<root>/<name>.txt` from disk.
pub struct DirAssetStore {
    root: PathBuf,
}

impl DirAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirAssetStore { root: root.into() }
    }
}

impl AssetStore for DirAssetStore {
    fn load(&self, name: &str) -> Option<String> {
        fs::read_to_string(self.root.join(format!("{}.txt", name))).ok()
    }
}
