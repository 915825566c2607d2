//! ConText-style assertion classification for clinical text.
//!
//! Given a target term and the pre-segmented sentence it was found in,
//! [`classify`] answers three independent questions about the
//! assertion:
//!
//! - [`Negation`] — is the term affirmed or negated? ("denies ...",
//!   "no evidence of ...")
//! - [`Temporality`] — is it recent, historical, or hypothetical?
//!   ("history of ...", "should ... appear")
//! - [`Experiencer`] — does it apply to the patient or to someone
//!   else? ("family history", "grandmother")
//!
//! Classification is lexical: each phrase in a [`TriggerRepository`]
//! category opens a bounded token window ahead of or behind itself,
//! and a term captured inside a window takes on that category's value.
//! Certain negation idioms (a dashed checklist item, "should X
//! appear") are rewritten into a canonical "no X" form before tagging.
//! The engine is a pure function over `(term, sentence, repository)`
//! apart from one-time lexicon loading, so calls can run concurrently
//! without coordination; it never fails, falling back to the defaults
//! (Recent, Patient, Affirmed) for anything it cannot evaluate.
//!
//! ## Example
//!
//! ```
//! use clinical_context::{classify, Negation, Temporality};
//!
//! let result = classify("murmur", "The patient denies having a heart murmur.");
//! assert_eq!(result.negation, Negation::Negated);
//! assert_eq!(result.temporality, Temporality::Recent);
//! ```

mod classifier;
mod errors;
mod normalize;
mod scanner;
mod tagger;
mod triggers;
mod types;

pub use classifier::{classify, ContextClassifier};
pub use errors::ContextError;
pub use normalize::normalize;
pub use triggers::{
    parse_trigger_lines, TagKind, TriggerCategory, TriggerRepository, TriggerRule,
};
pub use types::{ContextFeature, ContextResult, Experiencer, Negation, Temporality};

#[cfg(test)]
mod tests {
    mod classify;
    mod repository;
}
