//! Labeled transitions between states

use serde::{Deserialize, Serialize};

/// Separator between the alternatives of a list label such as `0,1`
const SYMBOL_SEPARATOR: char = ',';

/// A directed edge between two states, referenced by id.
///
/// The label is either a single symbol or a comma-separated list of
/// alternatives. Equality covers source, target and the raw label string,
/// so `a,b` and `b,a` on the same pair are different transitions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    /// Source state id
    pub source: String,
    /// Target state id
    pub target: String,
    /// Raw label as entered by the user
    pub label: String,
}

impl Transition {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            label: label.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    /// Whether this transition touches the state `id` at either end
    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }

    /// Whether the transition fires on `symbol`.
    ///
    /// List entries are trimmed before comparison; a label without a comma
    /// must match exactly.
    pub fn accepts_symbol(&self, symbol: &str) -> bool {
        if self.label.contains(SYMBOL_SEPARATOR) {
            list_entries(&self.label).any(|entry| entry == symbol)
        } else {
            self.label == symbol
        }
    }

    /// The set of symbols the label stands for, in label order
    pub fn individual_symbols(&self) -> Vec<&str> {
        if self.label.contains(SYMBOL_SEPARATOR) {
            list_entries(&self.label).collect()
        } else {
            vec![self.label.as_str()]
        }
    }
}

/// Trimmed entries of a list label. Trailing empty entries (`a,` or `,,`)
/// are not symbols; an empty entry before a later one (`,a`) is.
fn list_entries(label: &str) -> impl Iterator<Item = &str> {
    let mut parts: Vec<&str> = label.split(SYMBOL_SEPARATOR).collect();
    while parts.last().is_some_and(|part| part.is_empty()) {
        parts.pop();
    }
    parts.into_iter().map(str::trim)
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} --{}--> {}", self.source, self.label, self.target)
    }
}
