use anyhow::Result;
use std::path::{Path, PathBuf};

/// Get the container base path from environment variable, defaulting to "/app"
pub fn container_base_path() -> PathBuf {
    std::env::var("WATCHPOST_BASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/app"))
}

/// Resolves where watchpost keeps its files
pub struct PathManager {
    data_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?
            .join("watchpost");
        Ok(Self { data_dir })
    }

    pub fn from_base(base: &Path) -> Self {
        Self {
            data_dir: base.join("data"),
        }
    }

    pub fn from_docker_env() -> Self {
        Self::from_base(&container_base_path())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Default location of the dedup state file
    pub fn state_file(&self) -> PathBuf {
        self.data_dir.join("watched.json")
    }
}

impl Default for PathManager {
    fn default() -> Self {
        // The container image creates the base directory; its presence means we run in Docker
        let base = container_base_path();
        if base.exists() {
            return Self::from_docker_env();
        }

        Self::new().unwrap_or_else(|_| Self::from_docker_env())
    }
}
