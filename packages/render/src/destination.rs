/* packages/render/src/destination.rs */

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::error::RenderError;

/// Receives compiled markup for a named container.
pub trait Destination: Send + Sync {
  /// Replace the content of `target` with `markup`.
  fn write(&self, target: &str, markup: String) -> Result<(), RenderError>;
}

/// In-memory page made of declared containers. Writing to a container that
/// was not declared is an error.
#[derive(Debug, Default)]
pub struct PageBuffer {
  order: Vec<String>,
  contents: Mutex<HashMap<String, String>>,
}

impl PageBuffer {
  pub fn new<I, S>(targets: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let order: Vec<String> = targets.into_iter().map(Into::into).collect();
    let contents = order.iter().map(|t| (t.clone(), String::new())).collect();
    Self { order, contents: Mutex::new(contents) }
  }

  /// Current content of `target`, `None` if it was never declared.
  pub fn get(&self, target: &str) -> Option<String> {
    self.contents.lock().unwrap_or_else(PoisonError::into_inner).get(target).cloned()
  }

  /// All containers in declaration order.
  pub fn snapshot(&self) -> Vec<(String, String)> {
    let contents = self.contents.lock().unwrap_or_else(PoisonError::into_inner);
    self
      .order
      .iter()
      .map(|t| (t.clone(), contents.get(t).cloned().unwrap_or_default()))
      .collect()
  }
}

impl Destination for PageBuffer {
  fn write(&self, target: &str, markup: String) -> Result<(), RenderError> {
    let mut contents = self.contents.lock().unwrap_or_else(PoisonError::into_inner);
    let slot = contents
      .get_mut(target)
      .ok_or_else(|| RenderError::DestinationNotFound { target: target.to_string() })?;
    *slot = markup;
    Ok(())
  }
}
