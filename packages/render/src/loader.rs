/* packages/render/src/loader.rs */

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde::Deserialize;
use serde_json::Value;

use crate::error::LoadError;
use crate::source::ResourceSource;

/// Maps template and data names to source keys.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoaderLayout {
  pub template_dir: String,
  pub template_ext: String,
  pub data_dir: String,
}

impl Default for LoaderLayout {
  fn default() -> Self {
    Self {
      template_dir: "templates".to_string(),
      template_ext: "asth".to_string(),
      data_dir: "data".to_string(),
    }
  }
}

impl LoaderLayout {
  pub fn template_key(&self, name: &str) -> String {
    join_key(&self.template_dir, &format!("{name}.{}", self.template_ext))
  }

  pub fn data_key(&self, name: &str) -> String {
    join_key(&self.data_dir, &format!("{name}.json"))
  }
}

fn join_key(dir: &str, file: &str) -> String {
  let dir = dir.trim_end_matches('/');
  if dir.is_empty() { file.to_string() } else { format!("{dir}/{file}") }
}

/// Fetches templates and data through a [`ResourceSource`], caching each
/// successful load by name for the lifetime of the loader.
pub struct ResourceLoader {
  source: Arc<dyn ResourceSource>,
  layout: LoaderLayout,
  templates: RwLock<HashMap<String, Arc<str>>>,
  data: RwLock<HashMap<String, Arc<Value>>>,
}

impl ResourceLoader {
  pub fn new(source: Arc<dyn ResourceSource>) -> Self {
    Self::with_layout(source, LoaderLayout::default())
  }

  pub fn with_layout(source: Arc<dyn ResourceSource>, layout: LoaderLayout) -> Self {
    Self { source, layout, templates: RwLock::default(), data: RwLock::default() }
  }

  /// Template text for `name`, or `None` after logging the failure.
  pub async fn load_template(&self, name: &str) -> Option<Arc<str>> {
    match self.try_load_template(name).await {
      Ok(template) => Some(template),
      Err(err) => {
        tracing::error!(template = name, key = err.key(), error = %err, "failed to load template");
        None
      }
    }
  }

  /// Parsed data document for `name`, or `None` after logging the failure.
  pub async fn load_data(&self, name: &str) -> Option<Arc<Value>> {
    match self.try_load_data(name).await {
      Ok(data) => Some(data),
      Err(err) => {
        tracing::error!(data = name, key = err.key(), error = %err, "failed to load data");
        None
      }
    }
  }

  pub async fn try_load_template(&self, name: &str) -> Result<Arc<str>, LoadError> {
    if let Some(hit) = cached(&self.templates, name) {
      return Ok(hit);
    }
    let key = self.layout.template_key(name);
    let text: Arc<str> = self.source.fetch(&key).await?.into();
    tracing::debug!(template = name, %key, "template loaded");
    store(&self.templates, name, text.clone());
    Ok(text)
  }

  pub async fn try_load_data(&self, name: &str) -> Result<Arc<Value>, LoadError> {
    if let Some(hit) = cached(&self.data, name) {
      return Ok(hit);
    }
    let key = self.layout.data_key(name);
    let raw = self.source.fetch(&key).await?;
    let value: Value = serde_json::from_str(&raw)
      .map_err(|source| LoadError::InvalidJson { key: key.clone(), source })?;
    let value = Arc::new(value);
    tracing::debug!(data = name, %key, "data loaded");
    store(&self.data, name, value.clone());
    Ok(value)
  }

  /// Drop every cached entry; the next load fetches from the source again.
  pub fn clear_cache(&self) {
    self.templates.write().unwrap_or_else(PoisonError::into_inner).clear();
    self.data.write().unwrap_or_else(PoisonError::into_inner).clear();
  }
}

fn cached<V: Clone>(cache: &RwLock<HashMap<String, V>>, name: &str) -> Option<V> {
  cache.read().unwrap_or_else(PoisonError::into_inner).get(name).cloned()
}

// Concurrent misses for the same name may both fetch; the last insert wins.
fn store<V>(cache: &RwLock<HashMap<String, V>>, name: &str, value: V) {
  cache.write().unwrap_or_else(PoisonError::into_inner).insert(name.to_string(), value);
}
