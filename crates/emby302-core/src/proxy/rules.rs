//! Path-map rule store.
//!
//! Rules are kept in declaration order. The first rule whose `from` occurs in a path wins and
//! only that occurrence is rewritten.

use tracing::{info, warn};

const RULE_SEPARATOR: &str = "=>";

/// A single `from => to` substring rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMapRule {
    from: String,
    to: String,
}

impl PathMapRule {
    /// Build a rule from trimmed parts. `None` if either side is empty.
    pub fn new(from: &str, to: &str) -> Option<Self> {
        let from = from.trim();
        let to = to.trim();
        if from.is_empty() || to.is_empty() {
            return None;
        }
        Some(Self { from: from.to_string(), to: to.to_string() })
    }

    /// Parse `"<from> => <to>"`. Splits on the first separator only.
    pub fn parse(raw: &str) -> Option<Self> {
        let (from, to) = raw.split_once(RULE_SEPARATOR)?;
        Self::new(from, to)
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    fn apply(&self, path: &str) -> Option<String> {
        path.contains(self.from.as_str()).then(|| path.replacen(self.from.as_str(), &self.to, 1))
    }
}

/// Ordered, immutable sequence of path-map rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleStore {
    rules: Vec<PathMapRule>,
}

impl RuleStore {
    /// Build the store from raw config entries. Malformed entries are skipped with a warning.
    pub fn from_config(entries: &[String]) -> Self {
        let mut rules = Vec::with_capacity(entries.len());
        for entry in entries {
            match PathMapRule::parse(entry) {
                Some(rule) => {
                    info!("Loaded path-map rule: '{}' => '{}'", rule.from, rule.to);
                    rules.push(rule);
                },
                None => warn!("Ignoring invalid path-map rule: {}", entry),
            }
        }
        Self { rules }
    }

    /// Rewrite `path` with the first matching rule, or return it unchanged.
    pub fn map(&self, path: &str) -> String {
        self.rules
            .iter()
            .find_map(|rule| rule.apply(path))
            .unwrap_or_else(|| path.to_string())
    }

    pub fn rules(&self) -> &[PathMapRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
