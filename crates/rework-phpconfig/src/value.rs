//! Parser for the PHP literal subset used in configuration payloads
//!
//! Supports strings, integers, booleans, `null`, arrays (`[...]` and
//! `array(...)`, keyed or not), class constants (`LevelSetList::UP_TO_PHP_82`),
//! class references (`Foo::class`), `__DIR__` and string concatenation.

use rework_core::OptionValue;
use std::collections::BTreeMap;

use crate::ImportError;

#[derive(Debug, Clone, PartialEq)]
pub enum PhpValue {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    /// `Class::CONSTANT`, with the class reduced to its short name
    Const(String),
    /// `Class::class`, reduced to the short class name
    Class(String),
    Array(Vec<(Option<PhpValue>, PhpValue)>),
}

impl PhpValue {
    /// Textual form of scalar-like values: strings, numbers and names
    pub fn as_text(&self) -> Option<String> {
        match self {
            PhpValue::Str(s) | PhpValue::Const(s) | PhpValue::Class(s) => Some(s.clone()),
            PhpValue::Int(i) => Some(i.to_string()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PhpValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Entries of an array value; a scalar is treated as a one-element list
    pub fn entries(&self) -> Vec<(Option<&PhpValue>, &PhpValue)> {
        match self {
            PhpValue::Array(entries) => entries.iter().map(|(k, v)| (k.as_ref(), v)).collect(),
            other => vec![(None, other)],
        }
    }

    /// Convert to a rule option value. `null` has no option form.
    pub fn to_option_value(&self) -> Option<OptionValue> {
        match self {
            PhpValue::Null => None,
            PhpValue::Bool(b) => Some(OptionValue::Bool(*b)),
            PhpValue::Int(i) => Some(OptionValue::Int(*i)),
            PhpValue::Str(s) | PhpValue::Const(s) | PhpValue::Class(s) => {
                Some(OptionValue::String(s.clone()))
            }
            PhpValue::Array(entries) if entries.iter().all(|(k, _)| k.is_none()) => {
                Some(OptionValue::List(
                    entries.iter().filter_map(|(_, v)| v.to_option_value()).collect(),
                ))
            }
            PhpValue::Array(entries) => {
                let mut map = BTreeMap::new();
                for (index, (key, value)) in entries.iter().enumerate() {
                    let key = match key {
                        Some(k) => k.as_text().unwrap_or_else(|| index.to_string()),
                        None => index.to_string(),
                    };
                    if let Some(value) = value.to_option_value() {
                        map.insert(key, value);
                    }
                }
                Some(OptionValue::Map(map))
            }
        }
    }
}

/// A call argument, possibly named (`removeUnusedImports: true`)
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: Option<String>,
    pub value: PhpValue,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Str(String),
    Int(i64),
    Ident(String),
    DoubleColon,
    DoubleArrow,
    Colon,
    Comma,
    Dot,
    Minus,
    LBracket,
    RBracket,
    LParen,
    RParen,
}

fn tokenize(text: &str) -> Result<Vec<Token>, ImportError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '\'' => {
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some('\\') => match chars.next() {
                            Some(e @ ('\'' | '\\')) => s.push(e),
                            Some(e) => {
                                s.push('\\');
                                s.push(e);
                            }
                            None => return Err(unterminated()),
                        },
                        Some('\'') => break,
                        Some(other) => s.push(other),
                        None => return Err(unterminated()),
                    }
                }
                tokens.push(Token::Str(s));
            }
            '"' => {
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some('\\') => match chars.next() {
                            Some('n') => s.push('\n'),
                            Some('t') => s.push('\t'),
                            Some('r') => s.push('\r'),
                            Some(e @ ('"' | '\\' | '$')) => s.push(e),
                            Some(e) => {
                                s.push('\\');
                                s.push(e);
                            }
                            None => return Err(unterminated()),
                        },
                        Some('"') => break,
                        Some(other) => s.push(other),
                        None => return Err(unterminated()),
                    }
                }
                tokens.push(Token::Str(s));
            }
            '0'..='9' => {
                let mut digits = c.to_string();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '_' {
                        if d != '_' {
                            digits.push(d);
                        }
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = digits.parse().map_err(|_| {
                    ImportError::InvalidFormat(format!("invalid integer {}", digits))
                })?;
                tokens.push(Token::Int(value));
            }
            c if c.is_alphabetic() || c == '_' || c == '\\' => {
                let mut ident = c.to_string();
                while let Some(&n) = chars.peek() {
                    if n.is_alphanumeric() || n == '_' || n == '\\' {
                        ident.push(n);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                tokens.push(Token::DoubleColon);
            }
            ':' => tokens.push(Token::Colon),
            '=' if chars.peek() == Some(&'>') => {
                chars.next();
                tokens.push(Token::DoubleArrow);
            }
            ',' => tokens.push(Token::Comma),
            '.' => tokens.push(Token::Dot),
            '-' => tokens.push(Token::Minus),
            '[' => tokens.push(Token::LBracket),
            ']' => tokens.push(Token::RBracket),
            '(' => tokens.push(Token::LParen),
            ')' => tokens.push(Token::RParen),
            other => {
                return Err(ImportError::InvalidFormat(format!(
                    "unsupported character '{}' in configuration value",
                    other
                )))
            }
        }
    }

    Ok(tokens)
}

fn unterminated() -> ImportError {
    ImportError::InvalidFormat("unterminated string literal".to_string())
}

/// Last segment of a namespaced name
fn short_name(name: &str) -> &str {
    name.rsplit('\\').next().unwrap_or(name)
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    dir: &'a str,
}

impl<'a> Parser<'a> {
    fn new(text: &str, dir: &'a str) -> Result<Self, ImportError> {
        Ok(Self {
            tokens: tokenize(text)?,
            pos: 0,
            dir,
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token) -> Result<(), ImportError> {
        match self.next() {
            Some(token) if token == expected => Ok(()),
            other => Err(ImportError::InvalidFormat(format!(
                "expected {:?}, found {:?}",
                expected, other
            ))),
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn arguments(&mut self) -> Result<Vec<Argument>, ImportError> {
        let mut args = Vec::new();
        while !self.at_end() {
            let name = match (self.peek(), self.peek_at(1)) {
                (Some(Token::Ident(name)), Some(Token::Colon)) => Some(name.clone()),
                _ => None,
            };
            if name.is_some() {
                self.pos += 2;
            }
            let value = self.expression()?;
            args.push(Argument { name, value });

            if !self.at_end() {
                self.expect(Token::Comma)?;
            }
        }
        Ok(args)
    }

    fn expression(&mut self) -> Result<PhpValue, ImportError> {
        let mut value = self.primary()?;
        while self.peek() == Some(&Token::Dot) {
            self.next();
            let rhs = self.primary()?;
            value = concat(value, rhs)?;
        }
        Ok(value)
    }

    fn primary(&mut self) -> Result<PhpValue, ImportError> {
        match self.next() {
            Some(Token::Str(s)) => Ok(PhpValue::Str(s)),
            Some(Token::Int(i)) => Ok(PhpValue::Int(i)),
            Some(Token::Minus) => match self.next() {
                Some(Token::Int(i)) => Ok(PhpValue::Int(-i)),
                other => Err(ImportError::InvalidFormat(format!(
                    "expected number after '-', found {:?}",
                    other
                ))),
            },
            Some(Token::LBracket) => self.array(Token::RBracket),
            Some(Token::LParen) => {
                let value = self.expression()?;
                self.expect(Token::RParen)?;
                Ok(value)
            }
            Some(Token::Ident(ident)) => self.identifier(ident),
            other => Err(ImportError::InvalidFormat(format!(
                "unexpected {:?} in configuration value",
                other
            ))),
        }
    }

    fn identifier(&mut self, ident: String) -> Result<PhpValue, ImportError> {
        if self.peek() == Some(&Token::DoubleColon) {
            self.next();
            let member = match self.next() {
                Some(Token::Ident(member)) => member,
                other => {
                    return Err(ImportError::InvalidFormat(format!(
                        "expected constant after {}::, found {:?}",
                        ident, other
                    )))
                }
            };
            let class = short_name(&ident).to_string();
            return Ok(if member == "class" {
                PhpValue::Class(class)
            } else {
                PhpValue::Const(format!("{}::{}", class, member))
            });
        }

        match ident.to_lowercase().as_str() {
            "true" => Ok(PhpValue::Bool(true)),
            "false" => Ok(PhpValue::Bool(false)),
            "null" => Ok(PhpValue::Null),
            "__dir__" => Ok(PhpValue::Str(self.dir.to_string())),
            "array" if self.peek() == Some(&Token::LParen) => {
                self.next();
                self.array(Token::RParen)
            }
            _ => Ok(PhpValue::Const(short_name(&ident).to_string())),
        }
    }

    fn array(&mut self, close: Token) -> Result<PhpValue, ImportError> {
        let mut entries = Vec::new();
        loop {
            if self.peek() == Some(&close) {
                self.next();
                break;
            }
            let first = self.expression()?;
            if self.peek() == Some(&Token::DoubleArrow) {
                self.next();
                let value = self.expression()?;
                entries.push((Some(first), value));
            } else {
                entries.push((None, first));
            }

            if self.peek() == Some(&Token::Comma) {
                self.next();
            } else {
                self.expect(close.clone())?;
                break;
            }
        }
        Ok(PhpValue::Array(entries))
    }
}

fn concat(lhs: PhpValue, rhs: PhpValue) -> Result<PhpValue, ImportError> {
    match (lhs.as_text(), rhs.as_text()) {
        (Some(l), Some(r)) => Ok(PhpValue::Str(l + &r)),
        _ => Err(ImportError::InvalidFormat(
            "only strings can be concatenated".to_string(),
        )),
    }
}

/// Parse a call's argument list. `__DIR__` evaluates to `dir`.
pub fn parse_arguments(text: &str, dir: &str) -> Result<Vec<Argument>, ImportError> {
    Parser::new(text, dir)?.arguments()
}
