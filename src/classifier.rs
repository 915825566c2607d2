//! The classification engine: normalization, per-category tagging and
//! scanning, and resolution of the captured features into the three
//! axis values.

use crate::normalize::normalize;
use crate::{
    scanner, tagger, ContextError, ContextFeature, ContextResult, Experiencer, Negation,
    Temporality, TriggerCategory, TriggerRepository,
};
use regex::Regex;

/// Classifies a target term's assertion within one sentence.
///
/// Borrows an immutable [`TriggerRepository`]; one repository can back
/// any number of classifiers and concurrent calls.
///
/// ```
/// use clinical_context::{ContextClassifier, Negation, TriggerRepository};
///
/// let classifier = ContextClassifier::new(TriggerRepository::bundled());
/// let result = classifier.classify("edema", "Extremities reveal no peripheral edema");
/// assert_eq!(result.negation, Negation::Negated);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ContextClassifier<'r> {
    triggers: &'r TriggerRepository,
}

impl<'r> ContextClassifier<'r> {
    /// Create a classifier over `triggers`.
    pub fn new(triggers: &'r TriggerRepository) -> Self {
        Self { triggers }
    }

    /// Classify `term` within `sentence`.
    ///
    /// Never fails: a category whose rules cannot be evaluated is
    /// logged and contributes no features, and any axis untouched by a
    /// feature keeps its default (Recent, Patient, Affirmed).
    pub fn classify(&self, term: &str, sentence: &str) -> ContextResult {
        let normalized = normalize(term, sentence);

        let term_pattern = match Regex::new(&format!(r"(?i)\b{}\b", term)) {
            Ok(re) => re,
            Err(err) => {
                log::warn!("target term \"{}\" is not matchable: {}", term, err);
                return resolve(term, sentence, Vec::new());
            }
        };

        let mut features = Vec::new();
        for category in TriggerCategory::ALL {
            match self.run_category(category, &normalized, term, &term_pattern, sentence) {
                Ok(found) => features.extend(found),
                Err(err) => log::warn!("{} rules skipped for this sentence: {}", category, err),
            }
        }

        resolve(term, sentence, features)
    }

    fn run_category(
        &self,
        category: TriggerCategory,
        normalized: &str,
        term: &str,
        term_pattern: &Regex,
        original_sentence: &str,
    ) -> Result<Vec<ContextFeature>, ContextError> {
        let rules = self.triggers.rules(category);
        if rules.is_empty() {
            return Ok(Vec::new());
        }
        let tagged = tagger::tag(normalized, term, category, rules)?;
        Ok(scanner::scan(
            &tagged,
            term,
            term_pattern,
            original_sentence,
            category,
        ))
    }
}

impl Default for ContextClassifier<'static> {
    fn default() -> Self {
        Self::new(TriggerRepository::bundled())
    }
}

/// Classify with the bundled trigger lexicon.
///
/// Equivalent to `ContextClassifier::default().classify(term, sentence)`;
/// the lexicon is loaded on first use and shared thereafter.
pub fn classify(term: &str, sentence: &str) -> ContextResult {
    ContextClassifier::default().classify(term, sentence)
}

/// Fold the captured features into the final per-axis values.
///
/// Features are visited in emission order — category order first, then
/// position — and each unconditionally overwrites its axis, so the last
/// feature written to an axis wins. Hypothetical, as the last category
/// processed, therefore beats historical on temporality whenever both
/// capture the term.
fn resolve(term: &str, sentence: &str, features: Vec<ContextFeature>) -> ContextResult {
    let mut temporality = Temporality::default();
    let mut experiencer = Experiencer::default();
    let mut negation = Negation::default();
    for feature in &features {
        match feature.category {
            TriggerCategory::Negation => negation = Negation::Negated,
            TriggerCategory::Experiencer => experiencer = Experiencer::Other,
            TriggerCategory::Historical => temporality = Temporality::Historical,
            TriggerCategory::Hypothetical => temporality = Temporality::Hypothetical,
        }
    }
    ContextResult {
        term: term.to_string(),
        sentence: sentence.to_string(),
        temporality,
        experiencer,
        negation,
        features,
    }
}
