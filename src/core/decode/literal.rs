//! Parser for list/tuple literals as written by Python-based optimizers
//!
//! Accepts strings like `"[1, 2.5, -3e4]"`, `"(0.1, 0.2)"`, `"1, 2"` or a
//! single number, and produces a flat list of floats. Booleans map to 1/0,
//! quoted numeric strings are converted, nested lists are flattened.

use std::iter::Peekable;
use std::str::Chars;

/// A parsed literal value
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Text(String),
    List(Vec<Literal>),
}

impl Literal {
    /// Flatten into floats. Fails on text that is not a number.
    pub fn flatten(&self, out: &mut Vec<f64>) -> Result<(), LiteralError> {
        match self {
            Literal::Number(n) => out.push(*n),
            Literal::Text(s) => {
                let n = s.trim().parse::<f64>().map_err(|_| {
                    LiteralError::new(format!("Text '{}' is not numeric", s), 0)
                })?;
                out.push(n);
            }
            Literal::List(items) => {
                for item in items {
                    item.flatten(out)?;
                }
            }
        }
        Ok(())
    }
}

/// Error while parsing a literal
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralError {
    pub message: String,
    pub position: usize,
}

impl LiteralError {
    fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

impl std::fmt::Display for LiteralError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Literal parse error at position {}: {}",
            self.position, self.message
        )
    }
}

impl std::error::Error for LiteralError {}

/// Recursive-descent parser over the characters of one cell
pub struct LiteralParser<'a> {
    chars: Peekable<Chars<'a>>,
    position: usize,
}

impl<'a> LiteralParser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Parse the whole input. A top-level comma-separated sequence without
    /// brackets is a tuple.
    pub fn parse(mut self) -> Result<Literal, LiteralError> {
        let first = self.parse_value()?;
        self.skip_whitespace();

        let result = if self.peek() == Some(',') {
            let mut items = vec![first];
            while self.peek() == Some(',') {
                self.advance();
                self.skip_whitespace();
                if self.peek().is_none() {
                    break;
                }
                items.push(self.parse_value()?);
                self.skip_whitespace();
            }
            Literal::List(items)
        } else {
            first
        };

        self.skip_whitespace();
        match self.peek() {
            None => Ok(result),
            Some(c) => Err(LiteralError::new(
                format!("Unexpected trailing character: '{}'", c),
                self.position,
            )),
        }
    }

    fn parse_value(&mut self) -> Result<Literal, LiteralError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(LiteralError::new("Unexpected end of input", self.position)),
            Some('[') => self.parse_sequence(']'),
            Some('(') => self.parse_sequence(')'),
            Some('"') | Some('\'') => self.read_string(),
            Some('+') | Some('-') => self.read_signed(),
            Some(c) if c.is_ascii_digit() || c == '.' => self.read_number(),
            Some(c) if c.is_alphabetic() => self.read_keyword(),
            Some(c) => Err(LiteralError::new(
                format!("Unexpected character: '{}'", c),
                self.position,
            )),
        }
    }

    fn parse_sequence(&mut self, close: char) -> Result<Literal, LiteralError> {
        let start = self.position;
        self.advance(); // opening bracket
        let mut items = Vec::new();

        loop {
            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.advance();
                return Ok(Literal::List(items));
            }

            items.push(self.parse_value()?);
            self.skip_whitespace();

            match self.peek() {
                Some(',') => {
                    self.advance();
                }
                Some(c) if c == close => {}
                Some(c) => {
                    return Err(LiteralError::new(
                        format!("Expected ',' or '{}', found '{}'", close, c),
                        self.position,
                    ));
                }
                None => {
                    return Err(LiteralError::new(
                        format!("Unterminated sequence, expected '{}'", close),
                        start,
                    ));
                }
            }
        }
    }

    fn read_string(&mut self) -> Result<Literal, LiteralError> {
        let start = self.position;
        let quote = self.advance();
        let mut value = String::new();

        loop {
            match self.advance() {
                None => return Err(LiteralError::new("Unterminated string literal", start)),
                Some(c) if Some(c) == quote => return Ok(Literal::Text(value)),
                Some('\\') => {
                    if let Some(escaped) = self.advance() {
                        value.push(escaped);
                    }
                }
                Some(c) => value.push(c),
            }
        }
    }

    fn read_signed(&mut self) -> Result<Literal, LiteralError> {
        let negative = self.advance() == Some('-');
        self.skip_whitespace();
        match self.parse_value()? {
            Literal::Number(n) if negative => Ok(Literal::Number(-n)),
            Literal::Number(n) => Ok(Literal::Number(n)),
            _ => Err(LiteralError::new(
                "Unary sign must precede a number",
                self.position,
            )),
        }
    }

    fn read_number(&mut self) -> Result<Literal, LiteralError> {
        let start = self.position;
        let mut raw = String::new();
        let mut prev = '\0';

        while let Some(c) = self.peek() {
            let exponent_sign = (c == '+' || c == '-') && (prev == 'e' || prev == 'E');
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || exponent_sign {
                raw.push(c);
                prev = c;
                self.advance();
            } else {
                break;
            }
        }

        parse_number_literal(&raw)
            .map(Literal::Number)
            .ok_or_else(|| LiteralError::new(format!("Invalid number: '{}'", raw), start))
    }

    fn read_keyword(&mut self) -> Result<Literal, LiteralError> {
        let start = self.position;
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                word.push(c);
                self.advance();
            } else {
                break;
            }
        }

        match word.as_str() {
            "True" => Ok(Literal::Number(1.0)),
            "False" => Ok(Literal::Number(0.0)),
            _ => Err(LiteralError::new(
                format!("Unsupported name in literal: '{}'", word),
                start,
            )),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c.is_some() {
            self.position += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }
}

/// Integer and float literal forms: `12`, `1_000`, `0x1f`, `0o17`, `0b101`,
/// `1.`, `.5`, `2.5e-3`
fn parse_number_literal(raw: &str) -> Option<f64> {
    if raw.starts_with('_') || raw.ends_with('_') || raw.contains("__") {
        return None;
    }
    let cleaned = raw.replace('_', "");
    let lower = cleaned.to_ascii_lowercase();

    let radix = [("0x", 16), ("0o", 8), ("0b", 2)]
        .into_iter()
        .find(|(prefix, _)| lower.starts_with(prefix));
    if let Some((prefix, radix)) = radix {
        return i64::from_str_radix(&lower[prefix.len()..], radix)
            .ok()
            .map(|n| n as f64);
    }

    // inf/nan are names, not literals
    if lower.chars().any(|c| c.is_ascii_alphabetic() && c != 'e') {
        return None;
    }
    lower.parse::<f64>().ok()
}

/// Parse a literal cell into a flat list of floats
pub fn parse_literal_values(input: &str) -> Result<Vec<f64>, LiteralError> {
    let literal = LiteralParser::new(input).parse()?;
    let mut values = Vec::new();
    literal.flatten(&mut values)?;
    Ok(values)
}
