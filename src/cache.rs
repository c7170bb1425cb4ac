use std::fs;
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use directories::BaseDirs;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::Builder;

use crate::error::ExtractError;

#[derive(Debug, Clone)]
pub struct DiskCache {
    root: Option<Utf8PathBuf>,
}

impl DiskCache {
    pub fn new(root: Utf8PathBuf) -> Result<Self, ExtractError> {
        fs::create_dir_all(root.as_std_path())
            .map_err(|err| ExtractError::Filesystem(err.to_string()))?;
        Ok(Self { root: Some(root) })
    }

    pub fn disabled() -> Self {
        Self { root: None }
    }

    pub fn default_root() -> Result<Utf8PathBuf, ExtractError> {
        BaseDirs::new()
            .and_then(|dirs| {
                Utf8PathBuf::from_path_buf(
                    dirs.home_dir().join(".cache").join("genereviews-extractor"),
                )
                .ok()
            })
            .ok_or_else(|| {
                ExtractError::Filesystem("unable to resolve cache directory".to_string())
            })
    }

    pub fn is_enabled(&self) -> bool {
        self.root.is_some()
    }

    pub fn root(&self) -> Option<&Utf8Path> {
        self.root.as_deref()
    }

    fn entry_path(&self, key: &str) -> Option<Utf8PathBuf> {
        self.root
            .as_ref()
            .map(|root| root.join(format!("{key}.json")))
    }

    // Any unreadable or unparsable entry counts as a miss.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.entry_path(key)?;
        let content = fs::read_to_string(path.as_std_path()).ok()?;
        serde_json::from_str(&content).ok()
    }

    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ExtractError> {
        let Some(path) = self.entry_path(key) else {
            return Ok(());
        };
        let parent = path
            .parent()
            .ok_or_else(|| ExtractError::Filesystem("invalid cache path".to_string()))?;
        let content = serde_json::to_vec_pretty(value)
            .map_err(|err| ExtractError::Filesystem(err.to_string()))?;
        let mut temp = Builder::new()
            .prefix("grx-entry")
            .tempfile_in(parent.as_std_path())
            .map_err(|err| ExtractError::Filesystem(err.to_string()))?;
        temp.write_all(&content)
            .map_err(|err| ExtractError::Filesystem(err.to_string()))?;
        // persist renames over an existing entry in one step.
        temp.persist(path.as_std_path())
            .map_err(|err| ExtractError::Filesystem(err.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_cache_is_inert() {
        let cache = DiskCache::disabled();
        assert!(!cache.is_enabled());
        assert_eq!(cache.get::<String>("gene_BRCA1"), None);
        cache.put("gene_BRCA1", &"anything".to_string()).unwrap();
        assert_eq!(cache.get::<String>("gene_BRCA1"), None);
    }
}
