//! Sentence normalization ahead of trigger tagging.
//!
//! Two families of phrasing assert the *current absence* of a term
//! without using an ordinary negation cue: a dashed checklist item
//! ("Patient condition: -fevers, - chills") and future or conditional
//! occurrence ("should fever appear", "take Tylenol for chills",
//! "in case of shortness of breath"). Rewriting both into a canonical
//! `" no <term>"` form up front lets the tagger handle them with the
//! one negation trigger family it already knows.

use regex::{NoExpand, Regex};

/// A run of word characters followed by optional whitespace; repeated
/// non-greedily to span the filler words between a cue and the term.
const WORD: &str = r"\b[a-z]+\b\s*";

/// Onset verbs accepted after the term ("should fever appear"). No
/// trailing word boundary, so plural and inflected forms also match.
const ONSET_AFTER: &str = "appear|arise|begin|crop\\s+up|commence|come\\s+to\\s+light|\
come\\s+into\\s+being|develop|emanate|emerge|ensue|exhibit|\
happen|occur|originate|result|set\\s+in|start|take\\s+place";

/// Onset verbs accepted before the term ("if the patient develops ...").
const ONSET_BEFORE: &str = "commences?|develops?|exhibits?|happens?|presents?|\
results?(\\s+in)?|sets?\\s+in|starts?|takes?\\s+place";

/// Rewrite negation idioms around `term` into `" no <term>"`.
///
/// The five rewrites run in a fixed order, each over the output of the
/// previous one; a sentence matching none of them passes through
/// unchanged. The term is interpolated verbatim into each pattern, so a
/// term that does not compile skips only the affected rewrite.
pub fn normalize(term: &str, sentence: &str) -> String {
    let sentence = rewrite(&dash_pattern(term), term, sentence);
    let sentence = rewrite(&instruction_pattern(term), term, &sentence);
    let sentence = rewrite(&onset_after_term_pattern(term), term, &sentence);
    let sentence = rewrite(&onset_before_term_pattern(term), term, &sentence);
    rewrite(&in_case_of_pattern(term), term, &sentence)
}

/// A dash reads as negation only when preceded by whitespace, so a
/// hyphenated compound like "non-icteric" is left alone.
fn dash_pattern(term: &str) -> String {
    format!(r"(?i)\s-\s*{}\b", term)
}

/// "give/take/prescribe/rx <words> for/if/when <term>".
fn instruction_pattern(term: &str) -> String {
    format!(
        r"(?i)\b(give|take|prescribe|rx)\s+({WORD})+?\b(for|in\s+case\s+of|if|when)\s+{term}\b"
    )
}

/// "if/should <words> <term> [should] appear/arise/...".
fn onset_after_term_pattern(term: &str) -> String {
    format!(r"(?i)\b(if|should)\s+({WORD})*?{term}\s+(should\s+)?\b({ONSET_AFTER})")
}

/// "if/should <words> develops/commences/... <words> <term>".
fn onset_before_term_pattern(term: &str) -> String {
    format!(r"(?i)\b(if|should)\s+({WORD})*?\b({ONSET_BEFORE})\s+({WORD})*?{term}\b")
}

/// "in case of / should there be / look out for <words> <term>".
fn in_case_of_pattern(term: &str) -> String {
    format!(
        r"(?i)\b(in\s+case\s+of|should\s+there\s+be|should|(look|watch)\s+(out\s+)?for)\s+({WORD})*?{term}\b"
    )
}

fn rewrite(pattern: &str, term: &str, sentence: &str) -> String {
    match Regex::new(pattern) {
        Ok(re) => {
            let replacement = format!(" no {}", term);
            re.replace_all(sentence, NoExpand(&replacement)).into_owned()
        }
        Err(err) => {
            log::debug!("skipping rewrite for term \"{}\": {}", term, err);
            sentence.to_string()
        }
    }
}
