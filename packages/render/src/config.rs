/* packages/render/src/config.rs */

use std::path::Path;

use serde::Deserialize;

use crate::error::RenderError;
use crate::loader::LoaderLayout;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
  /// One section at a time, in declared order.
  Serial,
  /// Every section at once; wait for all before reporting.
  #[default]
  #[serde(alias = "parallel")]
  Concurrent,
}

/// One `(template, data, target)` triple to render.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Section {
  pub template: String,
  pub data: String,
  pub target: String,
  /// A failed critical section fails the whole page.
  #[serde(default)]
  pub critical: bool,
}

impl Section {
  pub fn new(
    template: impl Into<String>,
    data: impl Into<String>,
    target: impl Into<String>,
  ) -> Self {
    Self { template: template.into(), data: data.into(), target: target.into(), critical: false }
  }

  pub fn critical(mut self) -> Self {
    self.critical = true;
    self
  }
}

/// Page description, usually read from a TOML file:
///
/// ```toml
/// mode = "serial"
///
/// [loader]
/// template_dir = "views"
///
/// [[section]]
/// template = "product-card"
/// data = "products"
/// target = "#product-list"
/// critical = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageConfig {
  #[serde(default)]
  pub mode: RenderMode,
  #[serde(default)]
  pub loader: LoaderLayout,
  #[serde(default, rename = "section")]
  pub sections: Vec<Section>,
}

impl PageConfig {
  pub fn from_toml_str(content: &str) -> Result<Self, RenderError> {
    let config: PageConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  pub fn load(path: &Path) -> Result<Self, RenderError> {
    let content = std::fs::read_to_string(path)
      .map_err(|source| RenderError::ConfigIo { path: path.to_path_buf(), source })?;
    Self::from_toml_str(&content)
  }

  fn validate(&self) -> Result<(), RenderError> {
    for (i, section) in self.sections.iter().enumerate() {
      let fields =
        [("template", &section.template), ("data", &section.data), ("target", &section.target)];
      for (field, value) in fields {
        if value.trim().is_empty() {
          return Err(RenderError::Config(format!("section {i}: `{field}` must not be empty")));
        }
      }
    }
    Ok(())
  }
}
