use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::LayoutParameters;

/// Resolves layout YAML files relative to a base directory.
pub struct LayoutLoader {
    base_dir: PathBuf,
}

impl LayoutLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<LayoutParameters> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read layout file {}", path.display()))?;
        let params = LayoutParameters::from_yaml_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        debug!(path = %path.display(), guilds = params.num_guilds, "layout loaded");
        Ok(params)
    }

    /// Loads `file` when given, otherwise returns the reference defaults.
    pub fn load_or_default(&self, file: Option<&Path>) -> Result<LayoutParameters> {
        match file {
            Some(file) => self.load(file),
            None => Ok(LayoutParameters::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reports_path() {
        let loader = LayoutLoader::new("/nonexistent");
        let err = loader.load("nope.yaml").unwrap_err();
        assert!(format!("{err:#}").contains("nope.yaml"));
    }

    #[test]
    fn no_file_means_defaults() {
        let loader = LayoutLoader::new(".");
        let params = loader.load_or_default(None).unwrap();
        assert_eq!(params, LayoutParameters::default());
    }
}
