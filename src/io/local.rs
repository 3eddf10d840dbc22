use super::IndexSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

/// Index archive on the local filesystem
pub struct LocalIndexSource {
    path: PathBuf,
    location: String,
}

impl LocalIndexSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let location = path.display().to_string();
        Self { path, location }
    }
}

#[async_trait]
impl IndexSource for LocalIndexSource {
    fn location(&self) -> &str {
        &self.location
    }

    async fn open(&self) -> Result<Box<dyn Read + Send>> {
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        Ok(Box::new(file))
    }
}
