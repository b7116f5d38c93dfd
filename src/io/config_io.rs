use std::fs;
use std::path::Path;

use crate::io::tasks_io::StoreError;
use crate::model::config::Config;

/// Config file name, looked up in the workspace root
pub const CONFIG_FILE: &str = "weeklist.toml";

/// Read `weeklist.toml` from `root`. A missing file is the default config.
pub fn load_config(root: &Path) -> Result<Config, StoreError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    let config_text = fs::read_to_string(&config_path).map_err(|e| StoreError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    Ok(toml::from_str(&config_text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_is_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.files.tasks, "tasks.md");
    }

    #[test]
    fn test_reads_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[files]\ntasks = \"plan/week.md\"\n",
        )
        .unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.files.tasks, "plan/week.md");
    }

    #[test]
    fn test_bad_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[files\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(StoreError::ConfigParseError(_))
        ));
    }
}
