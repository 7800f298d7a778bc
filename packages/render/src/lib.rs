/* packages/render/src/lib.rs */

//! Page rendering on top of the `astemplate` compiler.
//!
//! A page is a list of [`Section`]s, each naming a template, a data document
//! and a target container. The [`Engine`] loads both resources through a
//! caching [`ResourceLoader`], compiles them and writes the markup to a
//! [`Destination`].
//!
//! ```
//! use std::sync::Arc;
//!
//! use astemplate_render::{Engine, MemorySource, PageBuffer, ResourceLoader, Section};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let source = MemorySource::new()
//!   .with("templates/greeting.asth", "<p>Hello, {{name}}</p>")
//!   .with("data/user.json", r#"{"name": "Ada"}"#);
//! let page = Arc::new(PageBuffer::new(["#greeting"]));
//! let engine = Engine::new(Arc::new(ResourceLoader::new(Arc::new(source))), page.clone());
//!
//! let report = engine.init_page(&[Section::new("greeting", "user", "#greeting")]).await;
//! assert!(report.is_ok_and(|r| r.is_success()));
//! assert_eq!(page.get("#greeting").as_deref(), Some("<p>Hello, Ada</p>"));
//! # }
//! ```

mod config;
mod destination;
mod engine;
mod error;
mod loader;
mod source;

pub use config::{PageConfig, RenderMode, Section};
pub use destination::{Destination, PageBuffer};
pub use engine::{Engine, RenderReport, SectionOutcome};
pub use error::{LoadError, RenderError};
pub use loader::{LoaderLayout, ResourceLoader};
pub use source::{BoxFuture, FsSource, MemorySource, ResourceSource};

#[cfg(test)]
mod tests;
