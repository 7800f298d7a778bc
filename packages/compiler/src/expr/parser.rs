/* packages/compiler/src/expr/parser.rs */

use serde_json::Value;

use super::ExprError;
use super::ast::{BinOp, Expr};
use super::token::Token;

// Bounds `!`, parentheses and `&&`/`||` chains so evaluation and drop stay shallow.
pub(super) const MAX_DEPTH: usize = 128;

pub(super) fn parse(tokens: &[Token]) -> Result<Expr, ExprError> {
  if tokens.is_empty() {
    return Err(ExprError::Empty);
  }
  let mut parser = Parser { tokens, pos: 0, depth: 0 };
  let expr = parser.parse_or()?;
  match parser.peek() {
    None => Ok(expr),
    Some(token) => Err(ExprError::UnexpectedToken(format!("{token:?}"))),
  }
}

struct Parser<'t> {
  tokens: &'t [Token],
  pos: usize,
  depth: usize,
}

impl<'t> Parser<'t> {
  fn peek(&self) -> Option<&'t Token> {
    self.tokens.get(self.pos)
  }

  fn next(&mut self) -> Option<&'t Token> {
    let token = self.tokens.get(self.pos);
    if token.is_some() {
      self.pos += 1;
    }
    token
  }

  fn descend(&mut self) -> Result<(), ExprError> {
    self.depth += 1;
    if self.depth > MAX_DEPTH { Err(ExprError::TooDeep { limit: MAX_DEPTH }) } else { Ok(()) }
  }

  fn parse_or(&mut self) -> Result<Expr, ExprError> {
    let depth = self.depth;
    let mut lhs = self.parse_and()?;
    while self.peek() == Some(&Token::OrOr) {
      self.pos += 1;
      self.descend()?;
      let rhs = self.parse_and()?;
      lhs = Expr::Binary(Box::new(lhs), BinOp::Or, Box::new(rhs));
    }
    self.depth = depth;
    Ok(lhs)
  }

  fn parse_and(&mut self) -> Result<Expr, ExprError> {
    let depth = self.depth;
    let mut lhs = self.parse_comparison()?;
    while self.peek() == Some(&Token::AndAnd) {
      self.pos += 1;
      self.descend()?;
      let rhs = self.parse_comparison()?;
      lhs = Expr::Binary(Box::new(lhs), BinOp::And, Box::new(rhs));
    }
    self.depth = depth;
    Ok(lhs)
  }

  // Comparisons do not chain: `a < b < c` is rejected.
  fn parse_comparison(&mut self) -> Result<Expr, ExprError> {
    let lhs = self.parse_unary()?;
    let op = match self.peek() {
      Some(Token::Eq) => BinOp::Eq,
      Some(Token::NotEq) => BinOp::NotEq,
      Some(Token::StrictEq) => BinOp::StrictEq,
      Some(Token::StrictNotEq) => BinOp::StrictNotEq,
      Some(Token::Lt) => BinOp::Lt,
      Some(Token::Le) => BinOp::Le,
      Some(Token::Gt) => BinOp::Gt,
      Some(Token::Ge) => BinOp::Ge,
      _ => return Ok(lhs),
    };
    self.pos += 1;
    let rhs = self.parse_unary()?;
    Ok(Expr::Binary(Box::new(lhs), op, Box::new(rhs)))
  }

  fn parse_unary(&mut self) -> Result<Expr, ExprError> {
    if self.peek() == Some(&Token::Not) {
      self.pos += 1;
      self.descend()?;
      let inner = self.parse_unary()?;
      self.depth -= 1;
      return Ok(Expr::Not(Box::new(inner)));
    }
    self.parse_primary()
  }

  fn parse_primary(&mut self) -> Result<Expr, ExprError> {
    match self.next() {
      Some(Token::Number(n)) => {
        let n = *n;
        serde_json::Number::from_f64(n)
          .map(|num| Expr::Literal(Value::Number(num)))
          .ok_or_else(|| ExprError::InvalidNumber { text: n.to_string(), offset: 0 })
      }
      Some(Token::Str(s)) => Ok(Expr::Literal(Value::String(s.clone()))),
      Some(Token::True) => Ok(Expr::Literal(Value::Bool(true))),
      Some(Token::False) => Ok(Expr::Literal(Value::Bool(false))),
      Some(Token::Null) => Ok(Expr::Literal(Value::Null)),
      Some(Token::Path(path)) => Ok(Expr::Path(path.clone())),
      Some(Token::LParen) => {
        self.descend()?;
        let inner = self.parse_or()?;
        self.depth -= 1;
        match self.next() {
          Some(Token::RParen) => Ok(inner),
          Some(other) => Err(ExprError::UnexpectedToken(format!("{other:?}"))),
          None => Err(ExprError::UnexpectedEnd),
        }
      }
      Some(other) => Err(ExprError::UnexpectedToken(format!("{other:?}"))),
      None => Err(ExprError::UnexpectedEnd),
    }
  }
}
