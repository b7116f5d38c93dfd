use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::io::config_io::load_config;
use crate::model::config::Config;
use crate::model::task::Task;
use crate::parse::{format_markdown, parse_markdown_with_report};

/// Error type for workspace I/O
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse weeklist.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
}

/// A directory holding a tasks file and an optional `weeklist.toml`
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub config: Config,
}

impl Workspace {
    pub fn open(root: &Path) -> Result<Workspace, StoreError> {
        let config = load_config(root)?;
        Ok(Workspace {
            root: root.to_path_buf(),
            config,
        })
    }

    pub fn tasks_path(&self) -> PathBuf {
        self.root.join(&self.config.files.tasks)
    }

    /// Read the tasks file. A missing file is an empty list; lines the
    /// parser skipped are logged as warnings.
    pub fn load_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let path = self.tasks_path();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no tasks file yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(StoreError::ReadError { path, source: e }),
        };

        let (tasks, dropped) = parse_markdown_with_report(&text);
        for d in &dropped {
            tracing::warn!(
                path = %path.display(),
                line = d.line,
                reason = %d.reason,
                "skipped task line"
            );
        }
        tracing::debug!(count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    /// Format and write the tasks file
    pub fn save_tasks(&self, tasks: &[Task]) -> Result<(), StoreError> {
        let path = self.tasks_path();
        atomic_write(&path, format_markdown(tasks).as_bytes())
            .map_err(|e| StoreError::WriteError { path, source: e })
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
