use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::debug;

use crate::config::TemplateConfig;

/// Source of the blank consent form.
pub trait DocumentTemplateStore: Send + Sync {
    fn load(&self) -> Result<Vec<u8>, TemplateError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("template '{file_name}' not found (searched: {})", display_paths(.searched))]
    NotFound {
        file_name: String,
        searched: Vec<PathBuf>,
    },
    #[error("unable to read template {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Reads the template from the first candidate directory that holds it.
///
/// The file is opened on every call so a replaced template takes effect
/// without a restart.
#[derive(Debug, Clone)]
pub struct FsTemplateStore {
    file_name: String,
    search_dirs: Vec<PathBuf>,
}

impl FsTemplateStore {
    pub fn new(file_name: impl Into<String>, search_dirs: Vec<PathBuf>) -> Self {
        Self {
            file_name: file_name.into(),
            search_dirs,
        }
    }

    pub fn from_config(config: &TemplateConfig) -> Self {
        Self::new(config.file_name.clone(), config.search_dirs.clone())
    }

    pub fn candidates(&self) -> Vec<PathBuf> {
        self.search_dirs
            .iter()
            .map(|dir| dir.join(&self.file_name))
            .collect()
    }

    pub fn resolve(&self) -> Result<PathBuf, TemplateError> {
        let candidates = self.candidates();
        if let Some(found) = candidates.iter().find(|path| path.is_file()) {
            return Ok(found.clone());
        }
        Err(TemplateError::NotFound {
            file_name: self.file_name.clone(),
            searched: candidates,
        })
    }
}

impl DocumentTemplateStore for FsTemplateStore {
    fn load(&self) -> Result<Vec<u8>, TemplateError> {
        let path = self.resolve()?;
        debug!(path = %path.display(), "loading consent template");
        fs::read(&path).map_err(|source| TemplateError::Read { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_uses_first_existing_candidate() {
        let scratch = tempfile::tempdir().expect("create scratch dir");
        let root = scratch.path();
        let first = root.join("missing");
        let second = root.join("forms");
        let third = root.join("public");
        fs::create_dir_all(&second).expect("create forms dir");
        fs::create_dir_all(&third).expect("create public dir");
        fs::write(second.join("form.pdf"), b"second").expect("write second");
        fs::write(third.join("form.pdf"), b"third").expect("write third");

        let store = FsTemplateStore::new("form.pdf", vec![first, second.clone(), third]);

        assert_eq!(store.resolve().expect("resolves"), second.join("form.pdf"));
        assert_eq!(store.load().expect("loads"), b"second".to_vec());
    }

    #[test]
    fn load_reports_every_searched_path() {
        let scratch = tempfile::tempdir().expect("create scratch dir");
        let root = scratch.path();
        let store = FsTemplateStore::new("form.pdf", vec![root.join("a"), root.join("b")]);

        match store.load() {
            Err(TemplateError::NotFound {
                file_name,
                searched,
            }) => {
                assert_eq!(file_name, "form.pdf");
                assert_eq!(searched, vec![root.join("a/form.pdf"), root.join("b/form.pdf")]);
            }
            other => panic!("expected not found, got {other:?}"),
        }
    }
}
