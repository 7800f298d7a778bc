/* packages/compiler/src/helpers.rs */

use std::borrow::Cow;

use serde_json::Value;

/// Template truthiness: `null`, `false`, `0`, `""` are falsy; arrays and
/// objects are truthy even when empty.
pub(crate) fn is_truthy(value: &Value) -> bool {
  match value {
    Value::Null => false,
    Value::Bool(b) => *b,
    Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
    Value::String(s) => !s.is_empty(),
    Value::Array(_) | Value::Object(_) => true,
  }
}

/// Display form of a value. `null` renders empty; integral floats drop the fraction.
pub(crate) fn stringify(value: &Value) -> String {
  match value {
    Value::Null => String::new(),
    Value::Bool(b) => b.to_string(),
    Value::Number(n) => format_number(n),
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

fn format_number(n: &serde_json::Number) -> String {
  if n.is_f64()
    && let Some(f) = n.as_f64()
    && f.is_finite()
    && f.fract() == 0.0
    && f.abs() < 1e21
  {
    // Integral and exactly representable: print like an integer
    return (f as i128).to_string();
  }
  n.to_string()
}

/// Numeric coercion used by loose equality and relational comparison.
pub(crate) fn to_number(value: &Value) -> f64 {
  match value {
    Value::Null => 0.0,
    Value::Bool(b) => f64::from(u8::from(*b)),
    Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
    Value::String(s) => {
      let trimmed = s.trim();
      if trimmed.is_empty() { 0.0 } else { trimmed.parse().unwrap_or(f64::NAN) }
    }
    Value::Array(_) | Value::Object(_) => f64::NAN,
  }
}

pub(crate) fn escape_html(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for ch in s.chars() {
    match ch {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#x27;"),
      c => out.push(c),
    }
  }
  out
}

/// Decode the character references that commonly appear in directive
/// attribute values (`&amp;&amp;`, `&lt;`, quotes). Unknown references are kept.
pub(crate) fn decode_entities(s: &str) -> Cow<'_, str> {
  if !s.contains('&') {
    return Cow::Borrowed(s);
  }
  let mut out = String::with_capacity(s.len());
  let mut rest = s;
  while let Some(amp) = rest.find('&') {
    out.push_str(&rest[..amp]);
    rest = &rest[amp..];
    let decoded = [
      ("&amp;", '&'),
      ("&lt;", '<'),
      ("&gt;", '>'),
      ("&quot;", '"'),
      ("&#39;", '\''),
      ("&#x27;", '\''),
      ("&apos;", '\''),
    ]
    .into_iter()
    .find(|(entity, _)| rest.starts_with(entity));
    match decoded {
      Some((entity, ch)) => {
        out.push(ch);
        rest = &rest[entity.len()..];
      }
      None => {
        out.push('&');
        rest = &rest[1..];
      }
    }
  }
  out.push_str(rest);
  Cow::Owned(out)
}
