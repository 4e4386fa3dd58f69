//! Explicit configuration passed to the loader and the output layer.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::DataSourceError;
use crate::selection::{City, normalize};

/// Environment variable naming the directory that holds the city exports.
pub const DATA_DIR_ENV: &str = "BIKESHARE_DATA_DIR";

/// Maps each city to the file its trips are read from.
///
/// Stored on disk as JSON; relative file names resolve against `data_dir`:
/// ```json
/// {
///   "data_dir": "/srv/bikeshare",
///   "files": { "chicago": "chicago.csv", "washington": "washington.csv.gz" }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DataSourceConfig {
    data_dir: PathBuf,
    files: HashMap<City, PathBuf>,
}

#[derive(Deserialize)]
struct RawDataSourceConfig {
    #[serde(default)]
    data_dir: Option<PathBuf>,
    #[serde(default)]
    files: HashMap<String, PathBuf>,
}

impl DataSourceConfig {
    /// The stock file names for every city under `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let files = City::ALL
            .into_iter()
            .map(|city| (city, PathBuf::from(city.default_file_name())))
            .collect();
        Self {
            data_dir: data_dir.into(),
            files,
        }
    }

    /// Uses `BIKESHARE_DATA_DIR` if set, otherwise the working directory.
    pub fn from_env() -> Self {
        let dir = std::env::var(DATA_DIR_ENV).unwrap_or_else(|_| ".".to_string());
        Self::with_data_dir(dir)
    }

    /// Loads the config from a JSON file at `path`.
    ///
    /// Cities missing from `files` keep their default file name.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;
        let raw: RawDataSourceConfig = serde_json::from_str(&content)
            .with_context(|| format!("invalid config '{}'", path.display()))?;

        let data_dir = raw
            .data_dir
            .unwrap_or_else(|| path.parent().unwrap_or(Path::new(".")).to_path_buf());
        let mut config = Self::with_data_dir(data_dir);
        for (key, file) in raw.files {
            let city: City = normalize(&key).parse()?;
            config.files.insert(city, file);
        }
        Ok(config)
    }

    /// Points `city` at a different file, relative to `data_dir` unless absolute.
    pub fn with_file(mut self, city: City, file: impl Into<PathBuf>) -> Self {
        self.files.insert(city, file.into());
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Resolved source path for `city`.
    pub fn path_for(&self, city: City) -> Result<PathBuf, DataSourceError> {
        let file = self
            .files
            .get(&city)
            .ok_or_else(|| DataSourceError::Unconfigured {
                city: city.to_string(),
            })?;
        Ok(self.data_dir.join(file))
    }

    /// Iterates over all `(city, resolved path)` pairs in city order.
    pub fn iter(&self) -> impl Iterator<Item = (City, PathBuf)> + '_ {
        let mut cities: Vec<_> = self.files.keys().copied().collect();
        cities.sort();
        cities
            .into_iter()
            .map(move |city| (city, self.data_dir.join(&self.files[&city])))
    }

    /// Every configured source with whether its file is present on disk.
    pub fn sources(&self) -> Vec<SourceStatus> {
        self.iter()
            .map(|(city, path)| SourceStatus {
                city,
                exists: path.exists(),
                path,
            })
            .collect()
    }
}

/// A configured city source and whether it can be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceStatus {
    pub city: City,
    pub path: PathBuf,
    pub exists: bool,
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self::with_data_dir(".")
    }
}

/// Presentation settings for the text renderer.
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    /// Width of the horizontal rules between sections.
    pub rule_width: usize,
    /// Shown in place of a missing value in raw rows.
    pub unset_placeholder: String,
    /// Maximum characters shown per raw cell before truncation.
    pub max_cell_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            rule_width: 63,
            unset_placeholder: "-".to_string(),
            max_cell_width: 200,
        }
    }
}
