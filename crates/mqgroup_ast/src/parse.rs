//! Forgiving stylesheet parser.
//!
//! Understands blocks, statements, comments, strings and parentheses. It does
//! not validate selectors, values or at-rule preludes; those are kept as the
//! trimmed source text.

use thiserror::Error;

use crate::ast::nodes::{self, Root};
use crate::ast::{CommentData, Node, NodeData, NodeRef, Position};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
  #[error("{position}: unclosed block")]
  UnclosedBlock { position: Position },

  #[error("{position}: unclosed comment")]
  UnclosedComment { position: Position },

  #[error("{position}: unexpected }}")]
  UnexpectedClose { position: Position },

  #[error("{position}: unknown word {word}")]
  UnknownWord { word: String, position: Position },
}

pub fn parse(css: &str) -> Result<Root, ParseError> {
  let root = Root::new();
  let mut parser = Parser::new(css);
  parser.children(root.raw(), None)?;
  Ok(root)
}

struct Parser {
  chars: Vec<char>,
  pos: usize,
  line: u32,
  column: u32,
}

impl Parser {
  fn new(css: &str) -> Self {
    Self {
      chars: css.trim_start_matches('\u{FEFF}').chars().collect(),
      pos: 0,
      line: 1,
      column: 1,
    }
  }

  fn peek(&self) -> Option<char> {
    self.chars.get(self.pos).copied()
  }

  fn peek_at(&self, offset: usize) -> Option<char> {
    self.chars.get(self.pos + offset).copied()
  }

  fn bump(&mut self) -> Option<char> {
    let ch = self.peek()?;
    self.pos += 1;
    if ch == '\n' {
      self.line += 1;
      self.column = 1;
    } else {
      self.column += 1;
    }
    Some(ch)
  }

  fn position(&self) -> Position {
    Position::new(self.line, self.column)
  }

  fn at_comment(&self) -> bool {
    self.peek() == Some('/') && self.peek_at(1) == Some('*')
  }

  fn skip_whitespace(&mut self) {
    while self.peek().is_some_and(char::is_whitespace) {
      self.bump();
    }
  }

  /// Parse nodes into `parent` until its closing brace, or until the end of
  /// input for the root (`opener` is `None`).
  fn children(&mut self, parent: &NodeRef, opener: Option<Position>) -> Result<(), ParseError> {
    loop {
      self.skip_whitespace();
      let start = self.position();

      match self.peek() {
        None => {
          return match opener {
            Some(position) => Err(ParseError::UnclosedBlock { position }),
            None => Ok(()),
          };
        }
        Some('}') => {
          if opener.is_none() {
            return Err(ParseError::UnexpectedClose { position: start });
          }
          self.bump();
          return Ok(());
        }
        Some(';') => {
          self.bump();
        }
        Some('/') if self.at_comment() => {
          let data = self.comment(start)?;
          append(parent, Node::new(NodeData::Comment(data)), start);
        }
        Some('@') => self.at_rule(parent, start)?,
        Some(_) => self.rule_or_declaration(parent, start)?,
      }
    }
  }

  fn comment(&mut self, start: Position) -> Result<CommentData, ParseError> {
    self.bump();
    self.bump();
    let mut raw = String::new();
    loop {
      if self.peek() == Some('*') && self.peek_at(1) == Some('/') {
        self.bump();
        self.bump();
        return Ok(comment_data(&raw));
      }
      match self.bump() {
        Some(ch) => raw.push(ch),
        None => return Err(ParseError::UnclosedComment { position: start }),
      }
    }
  }

  fn at_rule(&mut self, parent: &NodeRef, start: Position) -> Result<(), ParseError> {
    self.bump();
    let mut name = String::new();
    while let Some(ch) = self.peek() {
      if ch.is_alphanumeric() || ch == '-' || ch == '_' {
        name.push(ch);
        self.bump();
      } else {
        break;
      }
    }

    let params = self.prelude().trim().to_string();
    match self.peek() {
      Some('{') => {
        self.bump();
        let node = nodes::at_rule(name, params);
        append(parent, node.clone(), start);
        self.children(&node, Some(start))
      }
      Some(';') => {
        self.bump();
        append(parent, nodes::at_rule_statement(name, params), start);
        Ok(())
      }
      _ => {
        append(parent, nodes::at_rule_statement(name, params), start);
        Ok(())
      }
    }
  }

  fn rule_or_declaration(&mut self, parent: &NodeRef, start: Position) -> Result<(), ParseError> {
    let text = self.prelude();

    if self.peek() == Some('{') {
      self.bump();
      let node = nodes::rule(text.trim());
      append(parent, node.clone(), start);
      return self.children(&node, Some(start));
    }

    let Some((prop, value)) = text.split_once(':') else {
      return Err(ParseError::UnknownWord {
        word: text.trim().to_string(),
        position: start,
      });
    };

    if self.peek() == Some(';') {
      self.bump();
    }

    let value = value.trim();
    let (value, important) = match value.strip_suffix("!important") {
      Some(stripped) => (stripped.trim_end(), true),
      None => (value, false),
    };

    let node = nodes::decl(prop.trim(), value);
    if let NodeData::Declaration(data) = &mut node.borrow_mut().data {
      data.important = important;
    }
    append(parent, node, start);
    Ok(())
  }

  /// Raw text up to the next top-level `;`, `{` or `}` (not consumed).
  fn prelude(&mut self) -> String {
    let mut text = String::new();
    let mut depth = 0u32;
    let mut quote: Option<char> = None;

    while let Some(ch) = self.peek() {
      if let Some(open) = quote {
        self.bump();
        text.push(ch);
        if ch == '\\' {
          if let Some(escaped) = self.bump() {
            text.push(escaped);
          }
        } else if ch == open {
          quote = None;
        }
        continue;
      }

      match ch {
        ';' | '{' | '}' if depth == 0 => break,
        '"' | '\'' => quote = Some(ch),
        '(' => depth += 1,
        ')' => depth = depth.saturating_sub(1),
        '\\' => {
          self.bump();
          text.push(ch);
          if let Some(escaped) = self.bump() {
            text.push(escaped);
          }
          continue;
        }
        _ => {}
      }

      self.bump();
      text.push(ch);
    }

    text
  }
}

fn comment_data(raw: &str) -> CommentData {
  let text = raw.trim();
  if text.is_empty() {
    return CommentData {
      text: String::new(),
      left: raw.to_string(),
      right: String::new(),
    };
  }

  let left = &raw[..raw.len() - raw.trim_start().len()];
  let right = &raw[raw.trim_end().len()..];
  CommentData {
    text: text.to_string(),
    left: left.to_string(),
    right: right.to_string(),
  }
}

fn append(parent: &NodeRef, node: NodeRef, start: Position) {
  node.borrow_mut().source = Some(start);
  Node::append(parent, node);
}
