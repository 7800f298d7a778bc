/* packages/compiler/src/expr/mod.rs */

//! Conditional expressions for `ast-if`.
//!
//! An expression is tokenized and parsed once into an AST of literals, path
//! references, `!`, comparisons and `&&`/`||`, then evaluated by walking the
//! tree against a [`Scope`]. There are no calls, assignments or string
//! re-evaluation. A bare path such as `user.active` is itself an expression
//! whose result is the truthiness of the resolved value.

mod ast;
mod eval;
mod parser;
mod token;

use std::fmt;
use std::str::FromStr;

use crate::helpers::is_truthy;
use crate::scope::Scope;

#[derive(Debug, Clone, PartialEq)]
pub enum ExprError {
  Empty,
  UnexpectedChar { ch: char, offset: usize },
  UnterminatedString { offset: usize },
  InvalidNumber { text: String, offset: usize },
  EmptyPathSegment { offset: usize },
  UnexpectedToken(String),
  UnexpectedEnd,
  /// The first segment of a path is bound neither in scope nor in the data.
  Unbound(String),
  TooDeep { limit: usize },
}

impl fmt::Display for ExprError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ExprError::Empty => write!(f, "empty expression"),
      ExprError::UnexpectedChar { ch, offset } => {
        write!(f, "unexpected character '{ch}' at offset {offset}")
      }
      ExprError::UnterminatedString { offset } => {
        write!(f, "unterminated string starting at offset {offset}")
      }
      ExprError::InvalidNumber { text, offset } => {
        write!(f, "invalid number '{text}' at offset {offset}")
      }
      ExprError::EmptyPathSegment { offset } => write!(f, "empty path segment at offset {offset}"),
      ExprError::UnexpectedToken(token) => write!(f, "unexpected token {token}"),
      ExprError::UnexpectedEnd => write!(f, "unexpected end of expression"),
      ExprError::Unbound(name) => write!(f, "'{name}' is not defined"),
      ExprError::TooDeep { limit } => write!(f, "expression nested deeper than {limit} levels"),
    }
  }
}

impl std::error::Error for ExprError {}

/// A parsed `ast-if` expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
  source: String,
  expr: ast::Expr,
}

impl Condition {
  pub fn parse(source: &str) -> Result<Self, ExprError> {
    let tokens = token::tokenize(source)?;
    let expr = parser::parse(&tokens)?;
    Ok(Self { source: source.to_string(), expr })
  }

  pub fn source(&self) -> &str {
    &self.source
  }

  pub fn evaluate(&self, scope: &Scope<'_>) -> Result<bool, ExprError> {
    eval::eval(&self.expr, scope).map(|value| is_truthy(&value))
  }
}

impl FromStr for Condition {
  type Err = ExprError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

/// Parse and evaluate in one step. Any parse or evaluation error yields `false`.
pub fn evaluate(scope: &Scope<'_>, expression: &str) -> bool {
  match Condition::parse(expression).and_then(|c| c.evaluate(scope)) {
    Ok(result) => result,
    Err(err) => {
      tracing::debug!(expression, error = %err, "condition evaluated to false");
      false
    }
  }
}
