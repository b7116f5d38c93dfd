use serde::{Deserialize, Serialize};

/// Configuration from weeklist.toml. Every key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub share: ShareConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Markdown tasks file, relative to the config directory
    #[serde(default = "default_tasks_file")]
    pub tasks: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        FilesConfig {
            tasks: default_tasks_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Prefix that share slugs are appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        ShareConfig {
            base_url: default_base_url(),
        }
    }
}

fn default_tasks_file() -> String {
    "tasks.md".to_string()
}

fn default_base_url() -> String {
    "https://weeklist.app/share".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.files.tasks, "tasks.md");
        assert_eq!(config.share.base_url, "https://weeklist.app/share");
    }

    #[test]
    fn test_partial_config() {
        let config: Config = toml::from_str(
            r#"[share]
base_url = "http://localhost:5173/s"
"#,
        )
        .unwrap();
        assert_eq!(config.files.tasks, "tasks.md");
        assert_eq!(config.share.base_url, "http://localhost:5173/s");
    }
}
