//! Selection tokens and the immutable selection set
//!
//! The UI layer identifies variables with plain column names (`tower.mass`)
//! and expanded array halves (`tower.stress_min`, `tower.stress_max`). This
//! naming is shared with existing dashboard callers and must stay as is.

use std::fmt;

pub const MIN_SUFFIX: &str = "_min";
pub const MAX_SUFFIX: &str = "_max";

/// Which extreme of an array column a token asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayHalf {
    Min,
    Max,
}

impl ArrayHalf {
    pub fn suffix(&self) -> &'static str {
        match self {
            ArrayHalf::Min => MIN_SUFFIX,
            ArrayHalf::Max => MAX_SUFFIX,
        }
    }
}

/// A user-chosen variable identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectionToken {
    /// Plain column name
    Scalar(String),
    /// `<base>_min` or `<base>_max`
    ArrayHalf { base: String, half: ArrayHalf },
}

impl SelectionToken {
    /// Split a raw identifier on a trailing `_min`/`_max` suffix.
    ///
    /// A bare suffix (`"_min"`) has no base name and stays a scalar token.
    pub fn parse(raw: &str) -> Self {
        for half in [ArrayHalf::Min, ArrayHalf::Max] {
            if let Some(base) = raw.strip_suffix(half.suffix()) {
                if !base.is_empty() {
                    return SelectionToken::ArrayHalf {
                        base: base.to_string(),
                        half,
                    };
                }
            }
        }
        SelectionToken::Scalar(raw.to_string())
    }

    pub fn scalar(name: impl Into<String>) -> Self {
        SelectionToken::Scalar(name.into())
    }

    pub fn min(base: impl Into<String>) -> Self {
        SelectionToken::ArrayHalf {
            base: base.into(),
            half: ArrayHalf::Min,
        }
    }

    pub fn max(base: impl Into<String>) -> Self {
        SelectionToken::ArrayHalf {
            base: base.into(),
            half: ArrayHalf::Max,
        }
    }

    /// Variable name with any array suffix stripped
    pub fn base(&self) -> &str {
        match self {
            SelectionToken::Scalar(name) => name,
            SelectionToken::ArrayHalf { base, .. } => base,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, SelectionToken::ArrayHalf { .. })
    }
}

impl fmt::Display for SelectionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionToken::Scalar(name) => f.write_str(name),
            SelectionToken::ArrayHalf { base, half } => write!(f, "{}{}", base, half.suffix()),
        }
    }
}

impl From<&str> for SelectionToken {
    fn from(raw: &str) -> Self {
        SelectionToken::parse(raw)
    }
}

impl From<String> for SelectionToken {
    fn from(raw: String) -> Self {
        SelectionToken::parse(&raw)
    }
}

/// How a base variable should be turned into dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Plot the column as-is
    Regular,
    /// Decode every cell and plot its min and max
    Array,
}

/// A base column to resolve, produced by grouping tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableRequest {
    pub base: String,
    pub kind: RequestKind,
}

/// Ordered, duplicate-free set of selection tokens.
///
/// Values are never mutated: every transition returns a new set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    tokens: Vec<SelectionToken>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tokens<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<SelectionToken>,
    {
        let mut set = Self::new();
        for token in tokens {
            let token = token.into();
            if !set.tokens.contains(&token) {
                set.tokens.push(token);
            }
        }
        set
    }

    pub fn tokens(&self) -> &[SelectionToken] {
        &self.tokens
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectionToken> {
        self.tokens.iter()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, token: &SelectionToken) -> bool {
        self.tokens.contains(token)
    }

    /// True if the plain token or either array half of `base` is selected
    pub fn is_variable_selected(&self, base: &str) -> bool {
        self.tokens.iter().any(|t| t.base() == base)
    }

    /// Add the token if absent, remove it if present
    pub fn toggled(&self, token: impl Into<SelectionToken>) -> Self {
        let token = token.into();
        let mut tokens = self.tokens.clone();
        match tokens.iter().position(|t| *t == token) {
            Some(idx) => {
                tokens.remove(idx);
            }
            None => tokens.push(token),
        }
        Self { tokens }
    }

    /// Toggle a variable button.
    ///
    /// Array variables select both halves at once and deselect both when
    /// either half is present.
    pub fn toggled_variable(&self, base: &str, is_array: bool) -> Self {
        if !is_array {
            return self.toggled(SelectionToken::scalar(base));
        }

        let min = SelectionToken::min(base);
        let max = SelectionToken::max(base);
        if self.contains(&min) || self.contains(&max) {
            Self {
                tokens: self
                    .tokens
                    .iter()
                    .filter(|t| **t != min && **t != max)
                    .cloned()
                    .collect(),
            }
        } else {
            let mut tokens = self.tokens.clone();
            tokens.push(min);
            tokens.push(max);
            Self { tokens }
        }
    }

    /// Switch how `base` is selected: both array halves when `array` is
    /// true, the plain token otherwise.
    ///
    /// The replacement takes the position of the first token for `base`.
    /// A variable that is not selected is left unselected.
    pub fn with_array_mode(&self, base: &str, array: bool) -> Self {
        let Some(position) = self.tokens.iter().position(|t| t.base() == base) else {
            return self.clone();
        };

        let replacement = if array {
            vec![SelectionToken::min(base), SelectionToken::max(base)]
        } else {
            vec![SelectionToken::scalar(base)]
        };

        let mut tokens = self.tokens[..position].to_vec();
        tokens.extend(replacement);
        tokens.extend(
            self.tokens[position..]
                .iter()
                .filter(|t| t.base() != base)
                .cloned(),
        );
        Self { tokens }
    }

    /// Group tokens by base column into resolver requests.
    ///
    /// Only bases present in the table are kept, in order of first
    /// appearance. A suffixed token whose base is not a column is dropped.
    /// A base requested both plainly and as an array half is resolved as a
    /// plain variable, whatever the token order.
    pub fn group_requests<F>(&self, has_column: F) -> Vec<VariableRequest>
    where
        F: Fn(&str) -> bool,
    {
        let mut requests: Vec<VariableRequest> = Vec::new();

        for token in &self.tokens {
            let kind = match token {
                SelectionToken::Scalar(_) => RequestKind::Regular,
                SelectionToken::ArrayHalf { .. } => RequestKind::Array,
            };
            let base = token.base();
            if !has_column(base) {
                continue;
            }

            match requests.iter_mut().find(|r| r.base == base) {
                Some(existing) => {
                    if kind == RequestKind::Regular {
                        existing.kind = RequestKind::Regular;
                    }
                }
                None => requests.push(VariableRequest {
                    base: base.to_string(),
                    kind,
                }),
            }
        }

        requests
    }
}

impl<T: Into<SelectionToken>> FromIterator<T> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_tokens(iter)
    }
}
