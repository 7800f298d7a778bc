/* packages/compiler/src/expr/eval.rs */

use std::borrow::Cow;
use std::cmp::Ordering;

use serde_json::Value;

use super::ExprError;
use super::ast::{BinOp, Expr};
use crate::helpers::{is_truthy, stringify, to_number};
use crate::scope::{Resolved, Scope};

pub(super) fn eval<'s>(expr: &'s Expr, scope: &'s Scope<'_>) -> Result<Cow<'s, Value>, ExprError> {
  match expr {
    Expr::Literal(value) => Ok(Cow::Borrowed(value)),
    Expr::Path(path) => eval_path(path, scope),
    Expr::Not(inner) => Ok(Cow::Owned(Value::Bool(!is_truthy(&*eval(inner, scope)?)))),
    Expr::Binary(lhs, BinOp::And, rhs) => {
      let left = eval(lhs, scope)?;
      if is_truthy(&left) { eval(rhs, scope) } else { Ok(left) }
    }
    Expr::Binary(lhs, BinOp::Or, rhs) => {
      let left = eval(lhs, scope)?;
      if is_truthy(&left) { Ok(left) } else { eval(rhs, scope) }
    }
    Expr::Binary(lhs, op, rhs) => {
      let left = eval(lhs, scope)?;
      let right = eval(rhs, scope)?;
      Ok(Cow::Owned(Value::Bool(compare(*op, &left, &right))))
    }
  }
}

fn eval_path<'s>(path: &str, scope: &'s Scope<'_>) -> Result<Cow<'s, Value>, ExprError> {
  let root = path.split('.').next().unwrap_or(path);
  if scope.lookup(root).is_none() {
    return Err(ExprError::Unbound(root.to_string()));
  }
  // A bound root with a missing tail compares as the empty string
  Ok(match scope.resolve(path) {
    Resolved::Found(value) => value,
    Resolved::Missing => Cow::Owned(Value::String(String::new())),
  })
}

fn compare(op: BinOp, left: &Value, right: &Value) -> bool {
  match op {
    BinOp::Eq => loose_equals(left, right),
    BinOp::NotEq => !loose_equals(left, right),
    BinOp::StrictEq => strict_equals(left, right),
    BinOp::StrictNotEq => !strict_equals(left, right),
    BinOp::Lt => relational(left, right).is_some_and(Ordering::is_lt),
    BinOp::Le => relational(left, right).is_some_and(Ordering::is_le),
    BinOp::Gt => relational(left, right).is_some_and(Ordering::is_gt),
    BinOp::Ge => relational(left, right).is_some_and(Ordering::is_ge),
    BinOp::And | BinOp::Or => unreachable!("logical operators short-circuit in eval"),
  }
}

fn strict_equals(left: &Value, right: &Value) -> bool {
  match (left, right) {
    (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
    _ => left == right,
  }
}

fn loose_equals(left: &Value, right: &Value) -> bool {
  match (left, right) {
    (Value::Null, Value::Null) => true,
    (Value::Null, _) | (_, Value::Null) => false,
    (Value::Array(_) | Value::Object(_), Value::Array(_) | Value::Object(_)) => left == right,
    // A container against a primitive compares by its string form: `[1] == 1`
    (Value::Array(_) | Value::Object(_), _) => {
      loose_equals(&Value::String(primitive_string(left)), right)
    }
    (_, Value::Array(_) | Value::Object(_)) => {
      loose_equals(left, &Value::String(primitive_string(right)))
    }
    _ if std::mem::discriminant(left) == std::mem::discriminant(right) => {
      strict_equals(left, right)
    }
    _ => to_number(left) == to_number(right),
  }
}

fn primitive_string(value: &Value) -> String {
  match value {
    Value::Array(items) => items.iter().map(primitive_string).collect::<Vec<_>>().join(","),
    Value::Object(_) => "[object Object]".to_string(),
    other => stringify(other),
  }
}

// `None` when either side coerces to NaN.
fn relational(left: &Value, right: &Value) -> Option<Ordering> {
  if let (Value::String(a), Value::String(b)) = (left, right) {
    return Some(a.cmp(b));
  }
  to_number(left).partial_cmp(&to_number(right))
}
