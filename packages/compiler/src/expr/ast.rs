/* packages/compiler/src/expr/ast.rs */

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinOp {
  And,
  Or,
  Eq,
  NotEq,
  StrictEq,
  StrictNotEq,
  Lt,
  Le,
  Gt,
  Ge,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
  Literal(Value),
  Path(String),
  Not(Box<Expr>),
  Binary(Box<Expr>, BinOp, Box<Expr>),
}
