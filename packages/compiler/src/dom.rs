/* packages/compiler/src/dom.rs */

// Elements that never have children or an end tag.
const VOID_ELEMENTS: &[&str] = &[
  "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
  "track", "wbr",
];

// Elements whose content is raw text up to the matching end tag.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

/// Deepest element nesting the parser builds. Anything below it is kept as
/// one text node so every later pass stays within a bounded stack.
pub(crate) const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DomNode {
  Element(Element),
  Text(String),
  Comment(String),
  /// `<!DOCTYPE ...>` or `<?...>`, kept verbatim including delimiters.
  Declaration(String),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Element {
  pub(crate) tag: String,
  pub(crate) attrs: Vec<Attr>,
  /// Whitespace between the last attribute and `>` or `/>`.
  pub(crate) trailing: String,
  pub(crate) children: Vec<DomNode>,
  pub(crate) closing: Closing,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Closing {
  /// Raw end tag text as written, e.g. `</div>`.
  Explicit(String),
  SelfClosing,
  Void,
  /// Input ended (or an ancestor closed) before the end tag.
  Missing,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Attr {
  pub(crate) name: String,
  pub(crate) value: Option<String>,
  leading: String,
  quote: Option<char>,
  // Exact source text, dropped once the value is edited.
  source: Option<String>,
}

impl Attr {
  pub(crate) fn with_value(&self, value: String) -> Self {
    Self {
      name: self.name.clone(),
      value: Some(value),
      leading: self.leading.clone(),
      quote: Some(self.quote.unwrap_or('"')),
      source: None,
    }
  }

  pub(crate) fn is_named(&self, name: &str) -> bool {
    self.name.eq_ignore_ascii_case(name)
  }
}

impl Element {
  pub(crate) fn attr(&self, name: &str) -> Option<&Attr> {
    self.attrs.iter().find(|a| a.is_named(name))
  }

  pub(crate) fn is_raw_text(&self) -> bool {
    RAW_TEXT_ELEMENTS.iter().any(|t| self.tag.eq_ignore_ascii_case(t))
  }

  /// Script and style bodies are emitted without entity escaping.
  pub(crate) fn is_unescaped_text(&self) -> bool {
    self.tag.eq_ignore_ascii_case("script") || self.tag.eq_ignore_ascii_case("style")
  }
}

fn is_void(tag: &str) -> bool {
  VOID_ELEMENTS.iter().any(|t| tag.eq_ignore_ascii_case(t))
}

/// Parse a template into a list of top-level nodes.
///
/// Parsing never fails: anything that does not form a tag is kept as text,
/// so `serialize(&parse_html(x)) == x` holds for any input.
pub(crate) fn parse_html(html: &str) -> Vec<DomNode> {
  let mut parser = Parser { src: html, pos: 0 };
  parser.parse_nodes(&[])
}

struct Parser<'s> {
  src: &'s str,
  pos: usize,
}

impl<'s> Parser<'s> {
  fn bytes(&self) -> &'s [u8] {
    self.src.as_bytes()
  }

  fn rest(&self) -> &'s str {
    &self.src[self.pos..]
  }

  fn at_end(&self) -> bool {
    self.pos >= self.src.len()
  }

  fn peek_at(&self, offset: usize) -> Option<u8> {
    self.bytes().get(self.pos + offset).copied()
  }

  /// True when the `<` at the cursor opens a tag, end tag, comment or declaration.
  fn at_markup(&self) -> bool {
    self.peek_at(0) == Some(b'<')
      && matches!(
        self.peek_at(1),
        Some(c) if c.is_ascii_alphabetic() || c == b'/' || c == b'!' || c == b'?'
      )
  }

  fn parse_nodes(&mut self, open: &[&str]) -> Vec<DomNode> {
    let mut nodes = Vec::new();
    while !self.at_end() {
      if !self.at_markup() {
        self.push_text(&mut nodes);
        continue;
      }

      if self.peek_at(1) == Some(b'/') {
        match self.end_tag_name() {
          // Closes an open ancestor: leave it for that ancestor to consume.
          Some(name) if open.iter().any(|t| t.eq_ignore_ascii_case(name)) => return nodes,
          _ => {
            // Stray end tag, or a `</` that is not a tag at all
            let text = self.take_until_gt_or_end();
            push_text_node(&mut nodes, text);
          }
        }
        continue;
      }

      if self.rest().starts_with("<!--") {
        nodes.push(self.parse_comment());
        continue;
      }

      if matches!(self.peek_at(1), Some(b'!' | b'?')) {
        let start = self.pos;
        match self.rest().find('>') {
          Some(rel) => {
            self.pos += rel + 1;
            nodes.push(DomNode::Declaration(self.src[start..self.pos].to_string()));
          }
          None => {
            self.pos = self.src.len();
            push_text_node(&mut nodes, &self.src[start..]);
          }
        }
        continue;
      }

      nodes.push(self.parse_element(open));
    }
    nodes
  }

  fn push_text(&mut self, nodes: &mut Vec<DomNode>) {
    let start = self.pos;
    // Always consume the first byte so a lone `<` makes progress
    self.pos += 1;
    while !self.at_end() && !self.at_markup() {
      self.pos += 1;
    }
    // Stay on a char boundary: markup starts at ASCII `<`, so only EOF can split
    while !self.src.is_char_boundary(self.pos) {
      self.pos += 1;
    }
    push_text_node(nodes, &self.src[start..self.pos]);
  }

  /// Name of the end tag at the cursor if it is well formed (`</name ws* >`).
  fn end_tag_name(&self) -> Option<&'s str> {
    let rest = &self.rest()[2..];
    let name_len = rest.bytes().take_while(|b| b.is_ascii_alphanumeric() || *b == b'-').count();
    if name_len == 0 {
      return None;
    }
    let after = rest[name_len..].trim_start();
    after.starts_with('>').then(|| &rest[..name_len])
  }

  fn take_until_gt_or_end(&mut self) -> &'s str {
    let start = self.pos;
    self.pos = match self.rest().find('>') {
      Some(rel) => self.pos + rel + 1,
      None => self.src.len(),
    };
    &self.src[start..self.pos]
  }

  fn parse_comment(&mut self) -> DomNode {
    let start = self.pos;
    match self.src[start + 4..].find("-->") {
      Some(rel) => {
        let body = &self.src[start + 4..start + 4 + rel];
        self.pos = start + 4 + rel + 3;
        DomNode::Comment(body.to_string())
      }
      None => {
        // Unterminated comment: keep the rest as text
        self.pos = self.src.len();
        DomNode::Text(self.src[start..].to_string())
      }
    }
  }

  fn parse_element(&mut self, open: &[&str]) -> DomNode {
    let start = self.pos;
    if open.len() >= MAX_DEPTH {
      tracing::warn!(depth = open.len(), "markup nested too deeply, keeping the rest as text");
      self.pos = self.src.len();
      return DomNode::Text(self.src[start..].to_string());
    }
    self.pos += 1;
    let tag_start = self.pos;
    while let Some(b) = self.peek_at(0) {
      if b.is_ascii_whitespace() || b == b'>' || b == b'/' {
        break;
      }
      self.pos += 1;
    }
    let tag = self.src[tag_start..self.pos].to_string();

    let Some((attrs, trailing, self_closing)) = self.parse_attrs() else {
      // Unterminated start tag: keep it verbatim
      self.pos = self.src.len();
      return DomNode::Text(self.src[start..].to_string());
    };

    if self_closing {
      return DomNode::Element(Element {
        tag,
        attrs,
        trailing,
        children: Vec::new(),
        closing: Closing::SelfClosing,
      });
    }
    if is_void(&tag) {
      return DomNode::Element(Element {
        tag,
        attrs,
        trailing,
        children: Vec::new(),
        closing: Closing::Void,
      });
    }

    let mut element =
      Element { tag, attrs, trailing, children: Vec::new(), closing: Closing::Missing };
    if element.is_raw_text() {
      self.parse_raw_text_body(&mut element);
    } else {
      let mut inner: Vec<&str> = open.to_vec();
      inner.push(&element.tag);
      element.children = self.parse_nodes(&inner);
      if !self.at_end()
        && let Some(name) = self.end_tag_name()
        && name.eq_ignore_ascii_case(&element.tag)
      {
        element.closing = Closing::Explicit(self.take_until_gt_or_end().to_string());
      }
    }
    DomNode::Element(element)
  }

  /// Parse attributes up to `>` or `/>`. Returns `None` when input ends first.
  fn parse_attrs(&mut self) -> Option<(Vec<Attr>, String, bool)> {
    let mut attrs = Vec::new();
    loop {
      let ws_start = self.pos;
      while self.peek_at(0).is_some_and(|b| b.is_ascii_whitespace()) {
        self.pos += 1;
      }
      let leading = self.src[ws_start..self.pos].to_string();

      match self.peek_at(0)? {
        b'>' => {
          self.pos += 1;
          return Some((attrs, leading, false));
        }
        b'/' if self.peek_at(1) == Some(b'>') => {
          self.pos += 2;
          return Some((attrs, leading, true));
        }
        _ => {}
      }

      let name_start = self.pos;
      while let Some(b) = self.peek_at(0) {
        if b.is_ascii_whitespace() || b == b'=' || b == b'>' {
          break;
        }
        if b == b'/' && self.peek_at(1) == Some(b'>') {
          break;
        }
        self.pos += 1;
      }
      if self.pos == name_start {
        // A bare `=`; swallow it into the name so parsing progresses
        self.pos += 1;
      }
      let name = self.src[name_start..self.pos].to_string();

      let mut lookahead = self.pos;
      while self.bytes().get(lookahead).is_some_and(u8::is_ascii_whitespace) {
        lookahead += 1;
      }
      let (value, quote) = if self.bytes().get(lookahead) == Some(&b'=') {
        self.pos = lookahead + 1;
        while self.peek_at(0).is_some_and(|b| b.is_ascii_whitespace()) {
          self.pos += 1;
        }
        self.parse_attr_value()?
      } else {
        (None, None)
      };

      let source = self.src[ws_start..self.pos].to_string();
      attrs.push(Attr { name, value, leading, quote, source: Some(source) });
    }
  }

  fn parse_attr_value(&mut self) -> Option<(Option<String>, Option<char>)> {
    match self.peek_at(0)? {
      q @ (b'"' | b'\'') => {
        let body_start = self.pos + 1;
        let rel = self.src[body_start..].find(q as char)?;
        self.pos = body_start + rel + 1;
        Some((Some(self.src[body_start..body_start + rel].to_string()), Some(q as char)))
      }
      _ => {
        let start = self.pos;
        while let Some(b) = self.peek_at(0) {
          if b.is_ascii_whitespace() || b == b'>' {
            break;
          }
          self.pos += 1;
        }
        Some((Some(self.src[start..self.pos].to_string()), None))
      }
    }
  }

  fn parse_raw_text_body(&mut self, element: &mut Element) {
    let lower = self.rest().to_ascii_lowercase();
    let needle = format!("</{}", element.tag.to_ascii_lowercase());
    let mut search = 0;
    while let Some(rel) = lower[search..].find(&needle) {
      let at = search + rel;
      let after = lower[at + needle.len()..].trim_start();
      if after.starts_with('>') {
        let body = &self.rest()[..at];
        if !body.is_empty() {
          element.children.push(DomNode::Text(body.to_string()));
        }
        self.pos += at;
        element.closing = Closing::Explicit(self.take_until_gt_or_end().to_string());
        return;
      }
      search = at + needle.len();
    }
    let body = self.rest();
    if !body.is_empty() {
      element.children.push(DomNode::Text(body.to_string()));
    }
    self.pos = self.src.len();
  }
}

fn push_text_node(nodes: &mut Vec<DomNode>, text: &str) {
  if text.is_empty() {
    return;
  }
  // Merge with a preceding text node so stray `<` does not fragment text
  if let Some(DomNode::Text(prev)) = nodes.last_mut() {
    prev.push_str(text);
  } else {
    nodes.push(DomNode::Text(text.to_string()));
  }
}

/// Serialize nodes back to markup. Untouched nodes reproduce their source exactly.
pub(crate) fn serialize(nodes: &[DomNode]) -> String {
  let mut out = String::new();
  for node in nodes {
    serialize_node(node, &mut out);
  }
  out
}

fn serialize_node(node: &DomNode, out: &mut String) {
  match node {
    DomNode::Element(el) => {
      out.push('<');
      out.push_str(&el.tag);
      for attr in &el.attrs {
        serialize_attr(attr, out);
      }
      out.push_str(&el.trailing);
      match &el.closing {
        Closing::SelfClosing => out.push_str("/>"),
        Closing::Void => out.push('>'),
        Closing::Explicit(end) => {
          out.push('>');
          for child in &el.children {
            serialize_node(child, out);
          }
          out.push_str(end);
        }
        Closing::Missing => {
          out.push('>');
          for child in &el.children {
            serialize_node(child, out);
          }
        }
      }
    }
    DomNode::Text(text) => out.push_str(text),
    DomNode::Comment(body) => {
      out.push_str("<!--");
      out.push_str(body);
      out.push_str("-->");
    }
    DomNode::Declaration(raw) => out.push_str(raw),
  }
}

fn serialize_attr(attr: &Attr, out: &mut String) {
  if let Some(source) = &attr.source {
    out.push_str(source);
    return;
  }
  out.push_str(&attr.leading);
  out.push_str(&attr.name);
  if let Some(value) = &attr.value {
    let quote = attr.quote.unwrap_or('"');
    out.push('=');
    out.push(quote);
    out.push_str(value);
    out.push(quote);
  }
}
