//! Database configuration

use std::path::{Path, PathBuf};

/// Where persisted tables live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Directory holding one file per stored table
    pub data_dir: PathBuf,

    /// File extension of table files, without the leading dot
    pub extension: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            extension: "tbl".to_string(),
        }
    }
}

impl DatabaseConfig {
    /// Default config rooted at `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file backing table `name`.
    pub fn table_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{name}.{}", self.extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DatabaseConfig::default();

        assert_eq!(config.data_dir(), Path::new("."));
        assert_eq!(config.table_path("users"), Path::new("./users.tbl"));
    }

    #[test]
    fn test_custom_data_dir_and_extension() {
        let mut config = DatabaseConfig::with_data_dir("/var/lib/reldb");
        assert_eq!(config.table_path("t"), Path::new("/var/lib/reldb/t.tbl"));

        config.extension = "csv".into();
        assert_eq!(config.table_path("t"), Path::new("/var/lib/reldb/t.csv"));
    }
}
