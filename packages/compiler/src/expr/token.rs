/* packages/compiler/src/expr/token.rs */

use super::ExprError;

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Token {
  Number(f64),
  Str(String),
  /// Dotted path, e.g. `user.address.city` or `items.0`.
  Path(String),
  True,
  False,
  Null,
  Not,
  AndAnd,
  OrOr,
  Eq,
  NotEq,
  StrictEq,
  StrictNotEq,
  Lt,
  Le,
  Gt,
  Ge,
  LParen,
  RParen,
}

fn is_ident_start(c: char) -> bool {
  c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
  c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

pub(super) fn tokenize(src: &str) -> Result<Vec<Token>, ExprError> {
  let mut tokens = Vec::new();
  let chars: Vec<char> = src.chars().collect();
  let mut pos = 0;

  while pos < chars.len() {
    let c = chars[pos];
    if c.is_whitespace() {
      pos += 1;
      continue;
    }

    let two = chars.get(pos + 1).copied();
    let three = chars.get(pos + 2).copied();
    let (token, width) = match (c, two, three) {
      ('=', Some('='), Some('=')) => (Token::StrictEq, 3),
      ('!', Some('='), Some('=')) => (Token::StrictNotEq, 3),
      ('=', Some('='), _) => (Token::Eq, 2),
      ('!', Some('='), _) => (Token::NotEq, 2),
      ('<', Some('='), _) => (Token::Le, 2),
      ('>', Some('='), _) => (Token::Ge, 2),
      ('&', Some('&'), _) => (Token::AndAnd, 2),
      ('|', Some('|'), _) => (Token::OrOr, 2),
      ('<', ..) => (Token::Lt, 1),
      ('>', ..) => (Token::Gt, 1),
      ('!', ..) => (Token::Not, 1),
      ('(', ..) => (Token::LParen, 1),
      (')', ..) => (Token::RParen, 1),
      ('"' | '\'', ..) => {
        let (value, width) = lex_string(&chars[pos..], pos)?;
        (Token::Str(value), width)
      }
      (c, ..) if c.is_ascii_digit() || (c == '.' && two.is_some_and(|d| d.is_ascii_digit())) => {
        let (value, width) = lex_number(&chars[pos..], pos)?;
        (Token::Number(value), width)
      }
      ('-', Some(d), _) if d.is_ascii_digit() && starts_operand(tokens.last()) => {
        let (value, width) = lex_number(&chars[pos + 1..], pos + 1)?;
        (Token::Number(-value), width + 1)
      }
      (c, ..) if is_ident_start(c) => {
        let (path, width) = lex_path(&chars[pos..], pos)?;
        let token = match path.as_str() {
          "true" => Token::True,
          "false" => Token::False,
          "null" | "undefined" => Token::Null,
          _ => Token::Path(path),
        };
        (token, width)
      }
      (c, ..) => return Err(ExprError::UnexpectedChar { ch: c, offset: pos }),
    };
    tokens.push(token);
    pos += width;
  }

  Ok(tokens)
}

// A leading `-` is a sign only where an operand may begin.
fn starts_operand(prev: Option<&Token>) -> bool {
  !matches!(
    prev,
    Some(
      Token::Number(_)
        | Token::Str(_)
        | Token::Path(_)
        | Token::True
        | Token::False
        | Token::Null
        | Token::RParen
    )
  )
}

fn lex_string(chars: &[char], offset: usize) -> Result<(String, usize), ExprError> {
  let quote = chars[0];
  let mut value = String::new();
  let mut i = 1;
  while i < chars.len() {
    match chars[i] {
      '\\' => {
        let escaped = chars.get(i + 1).ok_or(ExprError::UnterminatedString { offset })?;
        value.push(match escaped {
          'n' => '\n',
          't' => '\t',
          other => *other,
        });
        i += 2;
      }
      c if c == quote => return Ok((value, i + 1)),
      c => {
        value.push(c);
        i += 1;
      }
    }
  }
  Err(ExprError::UnterminatedString { offset })
}

fn lex_number(chars: &[char], offset: usize) -> Result<(f64, usize), ExprError> {
  let width = chars.iter().take_while(|c| c.is_ascii_digit() || **c == '.').count();
  let text: String = chars[..width].iter().collect();
  text.parse().map(|n| (n, width)).map_err(|_| ExprError::InvalidNumber { text, offset })
}

fn lex_path(chars: &[char], offset: usize) -> Result<(String, usize), ExprError> {
  let mut i = chars.iter().take_while(|c| is_ident_continue(**c)).count();
  while chars.get(i) == Some(&'.') {
    let segment = chars[i + 1..].iter().take_while(|c| is_ident_continue(**c)).count();
    if segment == 0 {
      return Err(ExprError::EmptyPathSegment { offset: offset + i });
    }
    i += 1 + segment;
  }
  Ok((chars[..i].iter().collect(), i))
}
