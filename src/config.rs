use std::path::PathBuf;

/// Dataset read at startup when nothing else is configured.
pub const DEFAULT_DATA_FILE: &str = "WHR2023.csv";

/// Environment variable overriding [`DEFAULT_DATA_FILE`].
pub const DATA_PATH_ENV: &str = "WHR_DATA_PATH";

pub const WINDOW_TITLE: &str = "World Happiness Report 2023 Dashboard";

// ---------------------------------------------------------------------------
// Startup configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            window_size: [1400.0, 900.0],
            min_window_size: [800.0, 500.0],
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(path) = lookup(DATA_PATH_ENV).filter(|p| !p.trim().is_empty()) {
            config.data_path = PathBuf::from(path);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_report_file() {
        let config = DashboardConfig::from_lookup(|_| None);
        assert_eq!(config.data_path, PathBuf::from("WHR2023.csv"));
    }

    #[test]
    fn env_overrides_data_path() {
        let config = DashboardConfig::from_lookup(|key| {
            (key == DATA_PATH_ENV).then(|| "/data/whr2024.parquet".to_string())
        });
        assert_eq!(config.data_path, PathBuf::from("/data/whr2024.parquet"));

        let blank = DashboardConfig::from_lookup(|_| Some("  ".to_string()));
        assert_eq!(blank.data_path, PathBuf::from(DEFAULT_DATA_FILE));
    }
}
