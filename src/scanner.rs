//! Window scanning over a tagged sentence.
//!
//! Each scope-opening token starts a bounded walk over its neighbors,
//! testing whether the target phrase falls inside the trigger's window.
//! Forward walks accumulate a growing candidate phrase and may emit
//! several features; backward walks test one token at a time. The
//! asymmetry is deliberate and load-bearing for downstream consumers.

use crate::tagger::TaggedSentence;
use crate::{ContextFeature, TriggerCategory};
use regex::Regex;

/// Backward scans test at most this many tokens before a post-scope
/// trigger, for every category.
const BACKWARD_WINDOW: usize = 4;

/// Walk the tagged tokens, emitting one feature per captured span.
pub(crate) fn scan(
    tagged: &TaggedSentence,
    term: &str,
    term_pattern: &Regex,
    original_sentence: &str,
    category: TriggerCategory,
) -> Vec<ContextFeature> {
    let mut found = Vec::new();
    if tagged.match_count == 0 {
        return found;
    }
    let tokens = &tagged.tokens;
    let window = category.forward_window();

    for (i, token) in tokens.iter().enumerate() {
        let tag = match token.opens {
            Some(tag) => tag,
            None => continue,
        };

        if tag.opens_forward() {
            // Accumulate until a terminal token: sentence end, window
            // overrun, or another trigger's tag. The candidate is then
            // tested once; a hit emits, resets, and keeps scanning, a
            // miss closes this trigger's window.
            let mut candidate = String::new();
            let mut appended = 0;
            for j in (i + 1)..tokens.len() {
                candidate.push_str(&tokens[j].text);
                candidate.push(' ');
                appended += 1;
                let terminal = j == tokens.len() - 1
                    || appended > window
                    || tokens[j].opens.is_some();
                if !terminal {
                    continue;
                }
                if term_pattern.is_match(&candidate) {
                    found.push(feature(term, &candidate, original_sentence, tagged, category));
                    candidate.clear();
                    appended = 0;
                } else {
                    break;
                }
            }
        }

        if tag.opens_backward() {
            // One token per step, nearest first, stopping at the window
            // edge, the sentence start, or another trigger's tag.
            let start = i.saturating_sub(BACKWARD_WINDOW);
            for j in (start..i).rev() {
                if tokens[j].opens.is_some() {
                    break;
                }
                let candidate = format!(" {}", tokens[j].text);
                if term_pattern.is_match(&candidate) {
                    found.push(feature(term, &candidate, original_sentence, tagged, category));
                }
            }
        }
    }
    found
}

fn feature(
    term: &str,
    candidate: &str,
    sentence: &str,
    tagged: &TaggedSentence,
    category: TriggerCategory,
) -> ContextFeature {
    ContextFeature {
        target_phrase: term.to_string(),
        matched_phrase: candidate.trim().to_string(),
        sentence: sentence.to_string(),
        annotated_sentence: tagged.annotated.clone(),
        category,
    }
}
