/* packages/render/src/engine.rs */

use std::collections::HashMap;
use std::sync::Arc;

use astemplate::Compiler;
use tokio::task::JoinSet;

use crate::config::{PageConfig, RenderMode, Section};
use crate::destination::Destination;
use crate::error::RenderError;
use crate::loader::ResourceLoader;
use crate::source::ResourceSource;

/// Result of one section render.
#[derive(Debug)]
pub struct SectionOutcome {
  pub section: Section,
  pub result: Result<(), RenderError>,
}

/// Per-section outcomes of an [`Engine::init_page`] run, in declared order.
#[derive(Debug, Default)]
pub struct RenderReport {
  pub outcomes: Vec<SectionOutcome>,
}

impl RenderReport {
  pub fn is_success(&self) -> bool {
    self.outcomes.iter().all(|o| o.result.is_ok())
  }

  pub fn rendered(&self) -> usize {
    self.outcomes.iter().filter(|o| o.result.is_ok()).count()
  }

  pub fn failures(&self) -> impl Iterator<Item = (&Section, &RenderError)> {
    self.outcomes.iter().filter_map(|o| o.result.as_ref().err().map(|e| (&o.section, e)))
  }
}

/// Loads, compiles and writes page sections.
#[derive(Clone)]
pub struct Engine {
  loader: Arc<ResourceLoader>,
  destination: Arc<dyn Destination>,
  compiler: Arc<Compiler>,
  mode: RenderMode,
}

impl Engine {
  pub fn new(loader: Arc<ResourceLoader>, destination: Arc<dyn Destination>) -> Self {
    Self { loader, destination, compiler: Arc::new(Compiler::new()), mode: RenderMode::default() }
  }

  /// Build an engine from a page config; returns the sections to pass to
  /// [`Engine::init_page`].
  pub fn from_config(
    config: PageConfig,
    source: Arc<dyn ResourceSource>,
    destination: Arc<dyn Destination>,
  ) -> (Self, Vec<Section>) {
    let loader = Arc::new(ResourceLoader::with_layout(source, config.loader));
    (Self::new(loader, destination).with_mode(config.mode), config.sections)
  }

  pub fn with_mode(mut self, mode: RenderMode) -> Self {
    self.mode = mode;
    self
  }

  pub fn with_compiler(mut self, compiler: Compiler) -> Self {
    self.compiler = Arc::new(compiler);
    self
  }

  pub fn mode(&self) -> RenderMode {
    self.mode
  }

  /// Load the section's template and data, compile, and write the result to
  /// its target. Template and data load concurrently.
  pub async fn render(&self, section: &Section) -> Result<(), RenderError> {
    let (template, data) = tokio::join!(
      self.loader.load_template(&section.template),
      self.loader.load_data(&section.data)
    );
    let template =
      template.ok_or_else(|| RenderError::TemplateMissing { name: section.template.clone() })?;
    let data = data.ok_or_else(|| RenderError::DataMissing { name: section.data.clone() })?;

    let (html, diagnostics) = self.compiler.compile_with_diagnostics(&template, &data);
    for diagnostic in &diagnostics {
      tracing::warn!(
        template = %section.template,
        container = %section.target,
        %diagnostic,
        "template diagnostic"
      );
    }
    self.destination.write(&section.target, html)?;
    tracing::debug!(
      template = %section.template,
      data = %section.data,
      container = %section.target,
      "section rendered"
    );
    Ok(())
  }

  /// Render every section using the engine's [`RenderMode`].
  ///
  /// Non-critical failures are logged and recorded in the report. In serial
  /// mode a critical failure stops the remaining sections; in concurrent mode
  /// all sections finish first and the earliest critical failure (in declared
  /// order) is returned.
  pub async fn init_page(&self, sections: &[Section]) -> Result<RenderReport, RenderError> {
    match self.mode {
      RenderMode::Serial => self.render_serial(sections).await,
      RenderMode::Concurrent => self.render_concurrent(sections).await,
    }
  }

  async fn render_serial(&self, sections: &[Section]) -> Result<RenderReport, RenderError> {
    let mut report = RenderReport::default();
    for (i, section) in sections.iter().enumerate() {
      match self.render(section).await {
        Err(err) if section.critical => {
          log_failure(section, &err);
          tracing::error!(
            container = %section.target,
            skipped = sections.len() - i - 1,
            "critical section failed, aborting page"
          );
          return Err(err);
        }
        result => {
          if let Err(err) = &result {
            log_failure(section, err);
          }
          report.outcomes.push(SectionOutcome { section: section.clone(), result });
        }
      }
    }
    Ok(report)
  }

  async fn render_concurrent(&self, sections: &[Section]) -> Result<RenderReport, RenderError> {
    let mut join_set = JoinSet::new();
    let mut positions = HashMap::new();

    for (i, section) in sections.iter().enumerate() {
      let engine = self.clone();
      let section = section.clone();
      let handle = join_set.spawn(async move {
        let result = engine.render(&section).await;
        (i, result)
      });
      positions.insert(handle.id(), i);
    }

    let mut results: Vec<Option<Result<(), RenderError>>> = sections.iter().map(|_| None).collect();
    while let Some(joined) = join_set.join_next().await {
      match joined {
        Ok((i, result)) => results[i] = Some(result),
        Err(err) => {
          if let Some(&i) = positions.get(&err.id()) {
            let target = sections[i].target.clone();
            results[i] = Some(Err(RenderError::TaskPanicked { target }));
          }
        }
      }
    }

    let mut outcomes = Vec::with_capacity(sections.len());
    for (section, result) in sections.iter().zip(results) {
      let result = result
        .unwrap_or_else(|| Err(RenderError::TaskPanicked { target: section.target.clone() }));
      if let Err(err) = &result {
        log_failure(section, err);
      }
      outcomes.push(SectionOutcome { section: section.clone(), result });
    }

    if let Some(i) = outcomes.iter().position(|o| o.section.critical && o.result.is_err())
      && let Err(err) = outcomes.swap_remove(i).result
    {
      return Err(err);
    }
    Ok(RenderReport { outcomes })
  }
}

fn log_failure(section: &Section, err: &RenderError) {
  tracing::error!(
    template = %section.template,
    data = %section.data,
    container = %section.target,
    critical = section.critical,
    error = %err,
    "section render failed"
  );
}
