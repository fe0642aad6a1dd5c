use crate::error::Error;
use log::{debug, trace};
use std::{
    collections::HashMap,
    env,
    path::{Path, PathBuf},
};

/// A place to look up named settings, like the process environment or a `.env` file.
pub trait SettingSource: Send + Sync + std::fmt::Debug {
    /// A short name for this source, used in log output and in [`crate::Resolution`].
    fn name(&self) -> &str;

    /// Returns the value for `key`, or `None` if this source does not have it.
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads settings from the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSource;

impl SettingSource for EnvSource {
    fn name(&self) -> &str {
        "environment"
    }

    fn get(&self, key: &str) -> Option<String> {
        match env::var(key) {
            Ok(v) => Some(v),
            Err(env::VarError::NotPresent) => None,
            Err(env::VarError::NotUnicode(_)) => {
                debug!("Ignoring the {key} environment variable because it is not valid UTF-8.");
                None
            }
        }
    }
}

/// An in-memory set of settings. This is useful when configuration is injected by the embedding
/// application rather than read from the environment.
#[derive(Debug, Default, Clone)]
pub struct MapSource {
    name: String,
    values: HashMap<String, String>,
}

impl MapSource {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl<K, V> FromIterator<(K, V)> for MapSource
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            name: "map".to_string(),
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl SettingSource for MapSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Settings loaded from a `.env` style file. The file is read once, when the source is created,
/// and the process environment is never modified.
#[derive(Debug, Clone)]
pub struct DotenvSource {
    name: String,
    values: HashMap<String, String>,
}

impl DotenvSource {
    /// Loads every `KEY=value` pair in the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an [`Error::EnvFile`] if the file cannot be read or has a line that cannot be
    /// parsed.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        debug!("Loading settings from `{}`", path.display());

        let iter = dotenvy::from_path_iter(path).map_err(|e| env_file_error(path, e))?;
        let mut values = HashMap::new();
        for item in iter {
            let (k, v) = item.map_err(|e| env_file_error(path, e))?;
            trace!("Found `{k}` in `{}`", path.display());
            values.insert(k, v);
        }

        Ok(Self {
            name: path.display().to_string(),
            values,
        })
    }

    /// Like [`DotenvSource::from_path`], but a missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an [`Error::EnvFile`] if the file exists but cannot be read or parsed.
    pub fn from_path_if_exists<P: AsRef<Path>>(path: P) -> Result<Option<Self>, Error> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No env file at `{}`", path.display());
            return Ok(None);
        }
        Self::from_path(path).map(Some)
    }
}

impl SettingSource for DotenvSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

fn env_file_error(path: &Path, source: dotenvy::Error) -> Error {
    Error::EnvFile {
        path: PathBuf::from(path),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;
    use test_log::test;

    #[test]
    #[serial]
    fn env_source_reads_process_environment() {
        env::set_var("APIBASE_TEST_SOURCE_VAR", "http://env.example.com");
        assert_eq!(
            EnvSource.get("APIBASE_TEST_SOURCE_VAR").as_deref(),
            Some("http://env.example.com"),
        );

        env::remove_var("APIBASE_TEST_SOURCE_VAR");
        assert_eq!(EnvSource.get("APIBASE_TEST_SOURCE_VAR"), None);
    }

    #[test]
    fn map_source() {
        let source = MapSource::new("injected").with("VITE_API_BASE_URL", "http://map:1");
        assert_eq!(source.name(), "injected");
        assert_eq!(
            source.get("VITE_API_BASE_URL").as_deref(),
            Some("http://map:1")
        );
        assert_eq!(source.get("OTHER"), None);

        let source: MapSource = [("A", "1")].into_iter().collect();
        assert_eq!(source.name(), "map");
        assert_eq!(source.get("A").as_deref(), Some("1"));
    }

    #[test]
    fn dotenv_source_loads_file() -> Result<()> {
        let td = TempDir::new()?;
        let path = td.path().join(".env");
        fs::write(
            &path,
            "# comment\nVITE_API_BASE_URL=https://api.example.com\nQUOTED=\"a b\"\n",
        )?;

        let source = DotenvSource::from_path(&path)?;
        assert_eq!(
            source.get("VITE_API_BASE_URL").as_deref(),
            Some("https://api.example.com"),
        );
        assert_eq!(source.get("QUOTED").as_deref(), Some("a b"));
        assert_eq!(source.name(), path.display().to_string());

        Ok(())
    }

    #[test]
    fn dotenv_source_missing_file() -> Result<()> {
        let td = TempDir::new()?;
        let path = td.path().join("nope.env");

        assert!(DotenvSource::from_path_if_exists(&path)?.is_none());

        let err = DotenvSource::from_path(&path).unwrap_err();
        assert!(matches!(err, Error::EnvFile { .. }));
        assert!(err.to_string().contains("nope.env"), "{err}");

        Ok(())
    }
}
