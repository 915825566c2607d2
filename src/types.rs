//! Classification result types.
//!
//! A classification call answers three independent questions about a
//! target term, one enum per axis, and carries the features that led to
//! each answer for debugging and downstream reporting.

use crate::TriggerCategory;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Temporal recency of an assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Temporality {
    /// The assertion concerns the present encounter.
    Recent,
    /// The assertion concerns the patient's past ("history of ...").
    Historical,
    /// The assertion concerns a condition that has not occurred
    /// ("should ... appear", "watch for ...").
    Hypothetical,
}

/// Who the assertion applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Experiencer {
    /// The patient themselves.
    Patient,
    /// Someone else, typically a family member ("family history of ...").
    Other,
}

/// Negation status of an assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Negation {
    /// The term is asserted to be present.
    Affirmed,
    /// The term is asserted to be absent ("denies ...", "no evidence of ...").
    Negated,
    /// Reserved for possible-scope trigger categories; the four shipped
    /// categories never produce it.
    Possible,
}

impl Temporality {
    /// Canonical name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Temporality::Recent => "Recent",
            Temporality::Historical => "Historical",
            Temporality::Hypothetical => "Hypothetical",
        }
    }
}

impl Experiencer {
    /// Canonical name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Experiencer::Patient => "Patient",
            Experiencer::Other => "Other",
        }
    }
}

impl Negation {
    /// Canonical name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Negation::Affirmed => "Affirmed",
            Negation::Negated => "Negated",
            Negation::Possible => "Possible",
        }
    }
}

impl Default for Temporality {
    fn default() -> Self {
        Temporality::Recent
    }
}

impl Default for Experiencer {
    fn default() -> Self {
        Experiencer::Patient
    }
}

impl Default for Negation {
    fn default() -> Self {
        Negation::Affirmed
    }
}

impl fmt::Display for Temporality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Experiencer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Negation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One captured trigger scope, kept for diagnostics.
///
/// A feature records that the target phrase fell inside the window of
/// one trigger of `category`; `matched_phrase` is the window text that
/// satisfied the match and `annotated_sentence` the boundary-marked
/// rendering the window scan ran over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextFeature {
    /// The term the classification call was asked about.
    pub target_phrase: String,
    /// The window text in which the term was found.
    pub matched_phrase: String,
    /// The original sentence, unmodified.
    pub sentence: String,
    /// The sentence as annotated for this feature's category.
    pub annotated_sentence: String,
    /// The trigger category that captured the term.
    pub category: TriggerCategory,
}

/// The outcome of classifying one term within one sentence.
///
/// Every axis always holds exactly one value; axes untouched by any
/// feature keep their defaults (Recent, Patient, Affirmed). The
/// `features` list is diagnostic and not required to interpret the
/// three axis values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextResult {
    /// The target term.
    pub term: String,
    /// The original sentence, unmodified.
    pub sentence: String,
    /// Temporal recency of the assertion.
    pub temporality: Temporality,
    /// Who the assertion applies to.
    pub experiencer: Experiencer,
    /// Negation status of the assertion.
    pub negation: Negation,
    /// The captured trigger scopes behind the three values above.
    pub features: Vec<ContextFeature>,
}

impl fmt::Display for ContextResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}, {}, {}",
            self.term, self.negation, self.temporality, self.experiencer
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_recent_patient_affirmed() {
        assert_eq!(Temporality::default(), Temporality::Recent);
        assert_eq!(Experiencer::default(), Experiencer::Patient);
        assert_eq!(Negation::default(), Negation::Affirmed);
    }

    #[test]
    fn axis_names_match_their_display_form() {
        assert_eq!(Temporality::Hypothetical.to_string(), "Hypothetical");
        assert_eq!(Experiencer::Other.to_string(), "Other");
        assert_eq!(Negation::Negated.to_string(), "Negated");
    }

    #[test]
    fn result_renders_as_a_report_line() {
        let result = ContextResult {
            term: "murmur".to_string(),
            sentence: "No murmur heard.".to_string(),
            temporality: Temporality::Recent,
            experiencer: Experiencer::Patient,
            negation: Negation::Negated,
            features: Vec::new(),
        };
        assert_eq!(result.to_string(), "murmur: Negated, Recent, Patient");
    }
}
