//! Array cell decoding
//!
//! Array outputs reach us in several encodings depending on how the
//! optimization log was written: a native list (JSON), a Python literal
//! (`"[1.0, 2.0]"`), a numpy repr (`"[0. 0. 1.2]"`), or a lone scalar.
//! Each encoding is a [`CellDecoder`]; a [`DecoderChain`] tries them in a
//! fixed order and the first match wins.

pub mod literal;

use crate::types::{bool_to_f64, CellValue};

/// Outcome of a single decoding strategy
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// The cell matched this encoding
    Values(Vec<f64>),
    /// Not this encoding; try the next strategy
    NoMatch,
}

/// One way of reading a cell as a sequence of numbers
pub trait CellDecoder: Send + Sync {
    fn name(&self) -> &'static str;
    fn decode(&self, cell: &CellValue) -> Decoded;
}

/// Native sequences (JSON arrays, YAML lists)
pub struct SequenceDecoder;

impl CellDecoder for SequenceDecoder {
    fn name(&self) -> &'static str {
        "sequence"
    }

    fn decode(&self, cell: &CellValue) -> Decoded {
        let CellValue::Sequence(items) = cell else {
            return Decoded::NoMatch;
        };
        let mut values = Vec::with_capacity(items.len());
        if flatten_sequence(items, &mut values) {
            Decoded::Values(values)
        } else {
            Decoded::NoMatch
        }
    }
}

fn flatten_sequence(items: &[CellValue], out: &mut Vec<f64>) -> bool {
    for item in items {
        match item {
            CellValue::Number(n) => out.push(*n),
            CellValue::Bool(b) => out.push(bool_to_f64(*b)),
            CellValue::Null => out.push(f64::NAN),
            CellValue::Text(s) => match s.trim().parse::<f64>() {
                Ok(n) => out.push(n),
                Err(_) => return false,
            },
            CellValue::Sequence(inner) => {
                if !flatten_sequence(inner, out) {
                    return false;
                }
            }
        }
    }
    true
}

/// Python list/tuple literals stored as text
pub struct LiteralDecoder;

impl CellDecoder for LiteralDecoder {
    fn name(&self) -> &'static str {
        "literal"
    }

    fn decode(&self, cell: &CellValue) -> Decoded {
        let CellValue::Text(text) = cell else {
            return Decoded::NoMatch;
        };
        match literal::parse_literal_values(text) {
            Ok(values) => Decoded::Values(values),
            Err(_) => Decoded::NoMatch,
        }
    }
}

/// numpy-style `[a b c]`: brackets stripped, whitespace-separated floats
pub struct BracketDecoder;

impl CellDecoder for BracketDecoder {
    fn name(&self) -> &'static str {
        "bracket"
    }

    fn decode(&self, cell: &CellValue) -> Decoded {
        let CellValue::Text(text) = cell else {
            return Decoded::NoMatch;
        };
        let Some(inner) = text
            .trim()
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        else {
            return Decoded::NoMatch;
        };

        let parsed: Result<Vec<f64>, _> = inner
            .split_whitespace()
            .map(str::parse::<f64>)
            .collect();
        match parsed {
            Ok(values) => Decoded::Values(values),
            Err(_) => Decoded::NoMatch,
        }
    }
}

/// Last resort: a single number
pub struct ScalarDecoder;

impl CellDecoder for ScalarDecoder {
    fn name(&self) -> &'static str {
        "scalar"
    }

    fn decode(&self, cell: &CellValue) -> Decoded {
        match cell {
            CellValue::Number(n) => Decoded::Values(vec![*n]),
            CellValue::Bool(b) => Decoded::Values(vec![bool_to_f64(*b)]),
            CellValue::Null => Decoded::Values(vec![f64::NAN]),
            CellValue::Text(s) => match s.trim().parse::<f64>() {
                Ok(n) => Decoded::Values(vec![n]),
                Err(_) => Decoded::NoMatch,
            },
            CellValue::Sequence(_) => Decoded::NoMatch,
        }
    }
}

/// Ordered list of decoding strategies
pub struct DecoderChain {
    decoders: Vec<Box<dyn CellDecoder>>,
}

impl Default for DecoderChain {
    fn default() -> Self {
        Self::standard()
    }
}

impl DecoderChain {
    /// sequence, literal, bracket, scalar
    pub fn standard() -> Self {
        Self {
            decoders: vec![
                Box::new(SequenceDecoder),
                Box::new(LiteralDecoder),
                Box::new(BracketDecoder),
                Box::new(ScalarDecoder),
            ],
        }
    }

    pub fn with_decoders(decoders: Vec<Box<dyn CellDecoder>>) -> Self {
        Self { decoders }
    }

    /// Names of the strategies in the order they are tried
    pub fn names(&self) -> Vec<&'static str> {
        self.decoders.iter().map(|d| d.name()).collect()
    }

    /// Values from the first matching strategy, or `None` if none matched
    pub fn decode(&self, cell: &CellValue) -> Option<Vec<f64>> {
        self.decoders.iter().find_map(|decoder| match decoder.decode(cell) {
            Decoded::Values(values) => Some(values),
            Decoded::NoMatch => None,
        })
    }
}

/// Smallest and largest finite values, or `None` if there are none
pub fn finite_extremes(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
