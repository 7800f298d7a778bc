/* packages/render/src/source.rs */

use std::collections::HashMap;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;
use std::sync::{PoisonError, RwLock};

use crate::error::LoadError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Where raw template text and data documents come from.
pub trait ResourceSource: Send + Sync {
  fn fetch<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<String, LoadError>>;
}

/// Reads resources from files under a root directory.
#[derive(Debug, Clone)]
pub struct FsSource {
  root: PathBuf,
}

impl FsSource {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  fn resolve(&self, key: &str) -> Result<PathBuf, LoadError> {
    let rel = Path::new(key);
    let escapes = rel.components().any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if key.is_empty() || escapes {
      return Err(LoadError::PathEscape { key: key.to_string() });
    }
    Ok(self.root.join(rel))
  }
}

impl ResourceSource for FsSource {
  fn fetch<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<String, LoadError>> {
    Box::pin(async move {
      let path = self.resolve(key)?;
      tokio::fs::read_to_string(&path).await.map_err(|source| match source.kind() {
        ErrorKind::NotFound => LoadError::NotFound { key: key.to_string() },
        _ => LoadError::Io { key: key.to_string(), source },
      })
    })
  }
}

/// In-memory resources keyed by their full key (`templates/card.asth`).
#[derive(Debug, Default)]
pub struct MemorySource {
  entries: RwLock<HashMap<String, String>>,
}

impl MemorySource {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with(self, key: impl Into<String>, content: impl Into<String>) -> Self {
    self.insert(key, content);
    self
  }

  pub fn insert(&self, key: impl Into<String>, content: impl Into<String>) {
    let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
    entries.insert(key.into(), content.into());
  }

  pub fn remove(&self, key: &str) -> Option<String> {
    self.entries.write().unwrap_or_else(PoisonError::into_inner).remove(key)
  }
}

impl ResourceSource for MemorySource {
  fn fetch<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<String, LoadError>> {
    let found = self.entries.read().unwrap_or_else(PoisonError::into_inner).get(key).cloned();
    Box::pin(async move { found.ok_or_else(|| LoadError::NotFound { key: key.to_string() }) })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn fs_source_reads_under_root() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("templates")).unwrap();
    std::fs::write(dir.path().join("templates/card.asth"), "<p>{{x}}</p>").unwrap();

    let source = FsSource::new(dir.path());
    assert_eq!(source.fetch("templates/card.asth").await.unwrap(), "<p>{{x}}</p>");
    assert_eq!(source.fetch("./templates/card.asth").await.unwrap(), "<p>{{x}}</p>");
  }

  #[tokio::test]
  async fn fs_source_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = FsSource::new(dir.path()).fetch("nope.json").await.unwrap_err();
    assert!(matches!(err, LoadError::NotFound { ref key } if key == "nope.json"));
  }

  #[tokio::test]
  async fn fs_source_rejects_escaping_keys() {
    let dir = tempfile::tempdir().unwrap();
    let source = FsSource::new(dir.path().join("site"));
    for key in ["../secret", "a/../../b", "/etc/passwd", ""] {
      let err = source.fetch(key).await.unwrap_err();
      assert!(matches!(err, LoadError::PathEscape { .. }), "{key:?} -> {err}");
    }
  }

  #[tokio::test]
  async fn memory_source_insert_and_remove() {
    let source = MemorySource::new().with("a", "1");
    assert_eq!(source.fetch("a").await.unwrap(), "1");
    source.insert("a", "2");
    assert_eq!(source.fetch("a").await.unwrap(), "2");
    assert_eq!(source.remove("a").as_deref(), Some("2"));
    assert!(matches!(source.fetch("a").await, Err(LoadError::NotFound { .. })));
  }
}
