/* packages/compiler/src/scope.rs */

use std::borrow::Cow;
use std::fmt;

use serde_json::Value;

use crate::helpers::stringify;

/// Data context for one compile pass.
///
/// The root scope wraps the caller's JSON data. Each `ast-for` iteration gets
/// a child scope that borrows its parent and adds the loop bindings on top;
/// parents are never mutated, so sibling iterations cannot observe each
/// other's bindings. Lookups walk innermost-first, then fall back to the root
/// data object.
#[derive(Debug)]
pub struct Scope<'a> {
  data: &'a Value,
  parent: Option<&'a Scope<'a>>,
  bindings: Vec<(&'a str, Cow<'a, Value>)>,
}

impl<'a> Scope<'a> {
  pub fn root(data: &'a Value) -> Self {
    Self { data, parent: None, bindings: Vec::new() }
  }

  /// Derive an empty overlay on top of this scope.
  pub fn child<'s>(&'s self) -> Scope<'s> {
    Scope { data: self.data, parent: Some(self), bindings: Vec::new() }
  }

  /// Add (or shadow) a binding in this scope.
  pub fn bind(mut self, name: &'a str, value: Cow<'a, Value>) -> Self {
    self.bindings.push((name, value));
    self
  }

  /// Look up a single identifier: innermost binding first, then root data.
  pub fn lookup(&self, name: &str) -> Option<&Value> {
    let mut scope = Some(self);
    while let Some(current) = scope {
      if let Some((_, value)) = current.bindings.iter().rev().find(|(n, _)| *n == name) {
        return Some(value.as_ref());
      }
      scope = current.parent;
    }
    self.data.get(name)
  }

  /// Resolve a dotted path such as `user.address.city`.
  ///
  /// Any step that hits an absent key or a non-container value yields
  /// [`Resolved::Missing`], never an error.
  pub fn resolve(&self, path: &str) -> Resolved<'_> {
    let mut segments = path.split('.');
    let Some(first) = segments.next().filter(|s| !s.is_empty()) else {
      return Resolved::Missing;
    };
    let Some(mut current) = self.lookup(first).map(Cow::Borrowed) else {
      return Resolved::Missing;
    };
    for segment in segments {
      match step(current, segment) {
        Some(next) => current = next,
        None => return Resolved::Missing,
      }
    }
    Resolved::Found(current)
  }
}

/// Same as [`Scope::resolve`].
pub fn resolve<'s>(scope: &'s Scope<'_>, path: &str) -> Resolved<'s> {
  scope.resolve(path)
}

fn index<'v>(value: &'v Value, segment: &str) -> Option<&'v Value> {
  match value {
    Value::Object(map) => map.get(segment),
    Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
    _ => None,
  }
}

// `length` on arrays and strings, available when no real key shadows it.
fn pseudo_property(value: &Value, segment: &str) -> Option<Value> {
  if segment != "length" {
    return None;
  }
  match value {
    Value::Array(items) => Some(Value::from(items.len())),
    Value::String(s) => Some(Value::from(s.chars().count())),
    _ => None,
  }
}

fn step<'v>(current: Cow<'v, Value>, segment: &str) -> Option<Cow<'v, Value>> {
  match current {
    Cow::Borrowed(value) => index(value, segment)
      .map(Cow::Borrowed)
      .or_else(|| pseudo_property(value, segment).map(Cow::Owned)),
    Cow::Owned(value) => {
      index(&value, segment).cloned().or_else(|| pseudo_property(&value, segment)).map(Cow::Owned)
    }
  }
}

/// Result of resolving a path. Displays as the empty string when missing.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<'a> {
  Found(Cow<'a, Value>),
  Missing,
}

impl Resolved<'_> {
  pub fn is_missing(&self) -> bool {
    matches!(self, Resolved::Missing)
  }

  pub fn value(&self) -> Option<&Value> {
    match self {
      Resolved::Found(value) => Some(value.as_ref()),
      Resolved::Missing => None,
    }
  }

  pub fn as_array(&self) -> Option<&Vec<Value>> {
    self.value().and_then(Value::as_array)
  }
}

impl fmt::Display for Resolved<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Resolved::Found(value) => f.write_str(&stringify(value)),
      Resolved::Missing => Ok(()),
    }
  }
}
