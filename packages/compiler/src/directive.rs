/* packages/compiler/src/directive.rs */

use std::borrow::Cow;
use std::fmt;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::helpers::escape_html;
use crate::scope::Scope;

pub const FOR_ATTR: &str = "ast-for";
pub const IF_ATTR: &str = "ast-if";

fn repeat_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    Regex::new(concat!(
      r"^\s*(?:\(\s*([A-Za-z_$][\w$]*)\s*,\s*([A-Za-z_$][\w$]*)\s*\)|([A-Za-z_$][\w$]*))",
      r"\s+in\s+([A-Za-z_$][\w$]*(?:\.[\w$]+)*)\s*$",
    ))
    .expect("repeat grammar regex")
  })
}

fn marker_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"\{\{\s*([\w.$]+)\s*\}\}").expect("marker regex"))
}

/// Parsed `ast-for` value: `item in path` or `(item, index) in path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatSpec {
  pub item: String,
  pub index: Option<String>,
  pub source: String,
}

impl RepeatSpec {
  pub fn parse(value: &str) -> Option<Self> {
    let caps = repeat_re().captures(value)?;
    let item = caps.get(1).or_else(|| caps.get(3))?.as_str().to_string();
    let index = caps.get(2).map(|m| m.as_str().to_string());
    let source = caps.get(4)?.as_str().to_string();
    Some(Self { item, index, source })
  }
}

/// Replace every `{{path}}` marker with the escaped display form of the
/// resolved value. Text outside markers is returned untouched.
pub(crate) fn interpolate<'t>(text: &'t str, scope: &Scope<'_>, escape: bool) -> Cow<'t, str> {
  if !text.contains("{{") {
    return Cow::Borrowed(text);
  }
  marker_re().replace_all(text, |caps: &Captures<'_>| {
    let value = scope.resolve(&caps[1]).to_string();
    if escape { escape_html(&value) } else { value }
  })
}

/// Non-fatal problem found while compiling a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
  pub kind: DiagnosticKind,
  /// The directive attribute value as written.
  pub directive: String,
  pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
  /// `ast-for` value does not match `item in path` / `(item, index) in path`.
  MalformedRepeat,
  /// `ast-for` source resolved to something other than an array.
  RepeatSourceNotArray,
  /// `ast-if` expression failed to parse.
  MalformedCondition,
  /// `ast-if` expression parsed but failed to evaluate (e.g. unbound name).
  ConditionFailed,
}

impl fmt::Display for Diagnostic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:?} in \"{}\": {}", self.kind, self.directive, self.message)
  }
}
