/* packages/compiler/src/lib.rs */

//! Directive-driven HTML template compiler.
//!
//! Templates are plain markup with `{{dotted.path}}` interpolation markers
//! and two structural directives:
//!
//! - `ast-for="item in path"` / `ast-for="(item, index) in path"` repeats the
//!   element once per array item, with the item (and index) bound in a child
//!   scope for the element's attributes and subtree;
//! - `ast-if="expression"` keeps the element only when the expression is
//!   truthy.
//!
//! Compilation never fails. Missing data renders as empty text, and malformed
//! directives drop their element; [`compile_with_diagnostics`] reports what
//! was dropped.
//!
//! ```
//! use serde_json::json;
//!
//! let html = astemplate::compile(
//!   r#"<li ast-for="(x, i) in items">{{i}}:{{x}}</li>"#,
//!   &json!({"items": ["a", "b"]}),
//! );
//! assert_eq!(html, "<li>0:a</li><li>1:b</li>");
//! ```

mod compile;
mod directive;
mod dom;
mod expr;
mod helpers;
mod scope;

pub use compile::Compiler;
pub use directive::{Diagnostic, DiagnosticKind, FOR_ATTR, IF_ATTR, RepeatSpec};
pub use expr::{Condition, ExprError, evaluate};
pub use scope::{Resolved, Scope, resolve};

use serde_json::Value;

/// Compile `template` against `data` with the default `ast-for` / `ast-if` directives.
pub fn compile(template: &str, data: &Value) -> String {
  Compiler::new().compile(template, data)
}

/// Like [`compile`] but also returns the diagnostics for directives that
/// were degraded to empty output.
pub fn compile_with_diagnostics(template: &str, data: &Value) -> (String, Vec<Diagnostic>) {
  Compiler::new().compile_with_diagnostics(template, data)
}

#[cfg(test)]
mod tests;
