/* packages/compiler/src/compile.rs */

use std::borrow::Cow;

use serde_json::Value;

use crate::directive::{Diagnostic, DiagnosticKind, FOR_ATTR, IF_ATTR, RepeatSpec, interpolate};
use crate::dom::{Attr, DomNode, Element, parse_html, serialize};
use crate::expr::Condition;
use crate::helpers::decode_entities;
use crate::scope::Scope;

/// Template compiler. Holds the directive attribute names; a single
/// instance can compile any number of templates.
#[derive(Debug, Clone)]
pub struct Compiler {
  for_attr: String,
  if_attr: String,
}

impl Default for Compiler {
  fn default() -> Self {
    Self::new()
  }
}

impl Compiler {
  pub fn new() -> Self {
    Self { for_attr: FOR_ATTR.to_string(), if_attr: IF_ATTR.to_string() }
  }

  /// Use custom attribute names for the repeat and conditional directives.
  pub fn with_directives(for_attr: impl Into<String>, if_attr: impl Into<String>) -> Self {
    Self { for_attr: for_attr.into(), if_attr: if_attr.into() }
  }

  pub fn compile(&self, template: &str, data: &Value) -> String {
    self.compile_with_diagnostics(template, data).0
  }

  /// Like [`Compiler::compile`] but also returns the directive problems that
  /// were degraded to empty output along the way.
  pub fn compile_with_diagnostics(
    &self,
    template: &str,
    data: &Value,
  ) -> (String, Vec<Diagnostic>) {
    let tree = parse_html(template);
    let scope = Scope::root(data);
    let mut pass = Pass { compiler: self, diagnostics: Vec::new() };
    let output = pass.render_nodes(&tree, &scope, TextMode::Escaped);
    (serialize(&output), pass.diagnostics)
  }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum TextMode {
  Escaped,
  /// Inside `script` / `style`: values are inserted as-is.
  Raw,
}

struct Pass<'c> {
  compiler: &'c Compiler,
  diagnostics: Vec<Diagnostic>,
}

impl Pass<'_> {
  fn report(&mut self, kind: DiagnosticKind, directive: &str, message: String) {
    match kind {
      DiagnosticKind::MalformedRepeat | DiagnosticKind::MalformedCondition => {
        tracing::warn!(?kind, directive, %message, "directive dropped");
      }
      DiagnosticKind::RepeatSourceNotArray | DiagnosticKind::ConditionFailed => {
        tracing::debug!(?kind, directive, %message, "directive produced no output");
      }
    }
    self.diagnostics.push(Diagnostic { kind, directive: directive.to_string(), message });
  }

  fn render_nodes(&mut self, nodes: &[DomNode], scope: &Scope<'_>, mode: TextMode) -> Vec<DomNode> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
      match node {
        DomNode::Element(el) => self.render_element(el, scope, &mut out),
        DomNode::Text(text) => {
          let text = interpolate(text, scope, mode == TextMode::Escaped);
          out.push(DomNode::Text(text.into_owned()));
        }
        DomNode::Comment(_) | DomNode::Declaration(_) => out.push(node.clone()),
      }
    }
    out
  }

  fn render_element(&mut self, el: &Element, scope: &Scope<'_>, out: &mut Vec<DomNode>) {
    match el.attr(&self.compiler.for_attr) {
      Some(attr) => {
        let directive = decode_entities(attr.value.as_deref().unwrap_or(""));
        self.render_repeat(el, &directive, scope, out);
      }
      None => {
        if let Some(node) = self.render_single(el, scope) {
          out.push(node);
        }
      }
    }
  }

  /// Expand an `ast-for` element into one clone per array item. The original
  /// element never appears in the output.
  fn render_repeat(
    &mut self,
    el: &Element,
    directive: &str,
    scope: &Scope<'_>,
    out: &mut Vec<DomNode>,
  ) {
    let Some(spec) = RepeatSpec::parse(directive) else {
      self.report(
        DiagnosticKind::MalformedRepeat,
        directive,
        "expected `item in path` or `(item, index) in path`".to_string(),
      );
      return;
    };

    let source = scope.resolve(&spec.source);
    let Some(items) = source.as_array() else {
      let found = match source.value() {
        None => "nothing".to_string(),
        Some(value) => json_kind(value).to_string(),
      };
      self.report(
        DiagnosticKind::RepeatSourceNotArray,
        directive,
        format!("`{}` resolved to {found}, not an array", spec.source),
      );
      return;
    };

    for (i, item) in items.iter().enumerate() {
      let mut child = scope.child().bind(&spec.item, Cow::Borrowed(item));
      if let Some(index) = &spec.index {
        child = child.bind(index, Cow::Owned(Value::from(i)));
      }
      if let Some(node) = self.render_single(el, &child) {
        out.push(node);
      }
    }
  }

  /// Apply `ast-if`, attribute interpolation and child recursion to one
  /// element. Returns `None` when the condition prunes it.
  fn render_single(&mut self, el: &Element, scope: &Scope<'_>) -> Option<DomNode> {
    if let Some(attr) = el.attr(&self.compiler.if_attr) {
      let source = decode_entities(attr.value.as_deref().unwrap_or(""));
      if !self.check_condition(&source, scope) {
        return None;
      }
    }

    let attrs = el
      .attrs
      .iter()
      .filter(|a| !a.is_named(&self.compiler.for_attr) && !a.is_named(&self.compiler.if_attr))
      .map(|a| interpolate_attr(a, scope))
      .collect();

    let mode = if el.is_unescaped_text() { TextMode::Raw } else { TextMode::Escaped };
    let children = self.render_nodes(&el.children, scope, mode);

    Some(DomNode::Element(Element {
      tag: el.tag.clone(),
      attrs,
      trailing: el.trailing.clone(),
      children,
      closing: el.closing.clone(),
    }))
  }

  fn check_condition(&mut self, source: &str, scope: &Scope<'_>) -> bool {
    let condition = match Condition::parse(source) {
      Ok(condition) => condition,
      Err(err) => {
        self.report(DiagnosticKind::MalformedCondition, source, err.to_string());
        return false;
      }
    };
    condition.evaluate(scope).unwrap_or_else(|err| {
      self.report(DiagnosticKind::ConditionFailed, source, err.to_string());
      false
    })
  }
}

fn interpolate_attr(attr: &Attr, scope: &Scope<'_>) -> Attr {
  match attr.value.as_deref().map(|v| interpolate(v, scope, true)) {
    Some(Cow::Owned(value)) => attr.with_value(value),
    _ => attr.clone(),
  }
}

fn json_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}
