//! The espanso match package built from extracted records.

use std::collections::HashMap;

use ampersand_common::warning::warn_once;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::record::EntityRecord;

/// What to do with legacy (no `;`) references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum LegacyPolicy {
    /// Drop them. Typing `:amp;` is enough; `:amp` would fire too early.
    #[default]
    Skip,
    /// Emit them as their own matches, in table order.
    Keep,
}

/// One espanso match: typing `trigger` expands to `replace`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Prefix followed by the entity name.
    pub trigger: String,
    /// The expansion text.
    pub replace: String,
}

/// An espanso match file.
///
/// Triggers are unique and appear in table order. Package metadata lives in
/// the separately maintained `_manifest.yml`, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDocument {
    /// The matches, in table order.
    pub matches: Vec<Match>,
}

impl PackageDocument {
    /// Build the document from records in table order.
    ///
    /// When two records produce the same trigger the first one wins and the
    /// later one is reported.
    #[must_use]
    pub fn build(records: &[EntityRecord], prefix: &str, legacy: LegacyPolicy) -> Self {
        let mut first_row: HashMap<String, usize> = HashMap::new();
        let mut matches = Vec::with_capacity(records.len());

        for record in records {
            if record.is_legacy() && legacy == LegacyPolicy::Skip {
                continue;
            }
            let trigger = format!("{prefix}{}", record.name);
            if let Some(first) = first_row.get(&trigger) {
                warn_once(
                    "Entities",
                    &format!(
                        "row {}: duplicate trigger {trigger} dropped, row {first} wins",
                        record.row
                    ),
                );
                continue;
            }
            let _ = first_row.insert(trigger.clone(), record.row);
            matches.push(Match {
                trigger,
                replace: record.replacement.clone(),
            });
        }

        Self { matches }
    }

    /// Number of matches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// True when there are no matches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// The expansion for `trigger`, if present.
    #[must_use]
    pub fn get(&self, trigger: &str) -> Option<&str> {
        self.matches
            .iter()
            .find(|m| m.trigger == trigger)
            .map(|m| m.replace.as_str())
    }
}
