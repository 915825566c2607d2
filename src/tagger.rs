//! Rule tagging: annotates a working copy of the sentence with the
//! boundary markers of one trigger category.
//!
//! Rules are applied longest phrase first against the progressively
//! annotated text, so a longer, more specific phrase is wrapped before
//! a shorter phrase inside it can fragment it ("no increase" before
//! "no"). A matched phrase has its internal spaces joined while markers
//! are in place, keeping it a single unit until tokenization; the join
//! is undone before the sentence is split into scan tokens.

use crate::triggers::sort_longest_first;
use crate::{ContextError, TagKind, TriggerCategory, TriggerRule};
use once_cell::sync::Lazy;
use regex::Regex;

/// Day-granularity duration spans ("within the last 3 days").
static DAY_SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(within the last|in the last|for the past|for the last|over the past|over the last|for)(\s+\d*(\.\d*)*|\s+(\w+)(\s+\w*)?(\s+\w*)?(\s+\w*)?(\s+\w*)?(\s+\w*)?)?(\s+days|\s+day)",
    )
    .expect("day span pattern")
});

/// Week, month, and year-granularity duration spans ("for the past 2 weeks").
static LONG_SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(for the past|for the last|over the past|over the last|for)(\s+\d*(\.\d*)*|\s+(\w+)(\s+\w*)?(\s+\w*)?(\s+\w*)?(\s+\w*)?(\s+\w*)?)?(\s+weeks|\s+week|\s+months|\s+month|\s+years|\s+year)",
    )
    .expect("long span pattern")
});

/// Any boundary marker, opening or closing.
static MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[/?(?:PREN|POST|PREP|POSP|PSEU|CONJ|FSTT|ONEW)\]").expect("marker pattern")
});

/// One whitespace-delimited token of the annotated sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScanToken {
    /// Visible text with boundary markers stripped.
    pub text: String,
    /// The tag this token opens, when it begins a marked phrase.
    pub opens: Option<TagKind>,
}

/// Output of tagging one category over one sentence.
#[derive(Debug, Clone)]
pub(crate) struct TaggedSentence {
    /// Scan tokens; empty when no rule matched.
    pub tokens: Vec<ScanToken>,
    /// The boundary-marked rendering, kept for diagnostics.
    pub annotated: String,
    /// How many rule matches were wrapped.
    pub match_count: usize,
}

/// Annotate `sentence` with the category's boundary markers.
///
/// `sentence` is the normalized input. Occurrences of `term` are
/// protected first (quoted, spaces joined) so no rule can tag inside
/// the term itself.
pub(crate) fn tag(
    sentence: &str,
    term: &str,
    category: TriggerCategory,
    rules: &[TriggerRule],
) -> Result<TaggedSentence, ContextError> {
    let mut working = protect_term(sentence, term);

    let synthetic = if category == TriggerCategory::Historical {
        duration_rules(&working)
    } else {
        Vec::new()
    };
    let merged;
    let active: &[TriggerRule] = if synthetic.is_empty() {
        rules
    } else {
        merged = {
            let mut all = rules.to_vec();
            all.extend(synthetic);
            sort_longest_first(&mut all);
            all
        };
        &merged
    };

    let mut match_count = 0;
    for rule in active {
        let pattern = format!(r"(?i)\b({})\b", rule.pattern);
        let re = Regex::new(&pattern).map_err(|source| ContextError::InvalidPattern {
            pattern: rule.pattern.clone(),
            source,
        })?;
        working = wrap_matches(&re, rule.tag, &mut match_count, &working);
    }

    if match_count == 0 {
        return Ok(TaggedSentence {
            tokens: Vec::new(),
            annotated: working,
            match_count,
        });
    }

    let annotated = working.replace('_', " ");
    let tokens = tokenize(&annotated);
    Ok(TaggedSentence {
        tokens,
        annotated,
        match_count,
    })
}

/// Quote the term and join its spaces. The quotes keep a trigger match
/// on the term from landing at the start of a token (so it never opens
/// a scope), and the join keeps a multi-word term out of reach of
/// whole-word trigger matches on its parts.
fn protect_term(sentence: &str, term: &str) -> String {
    let protected = format!("'{}'", term.replace(' ', "_"));
    sentence.replace(term, &protected)
}

/// Synthetic conjunction rules for duration phrases present in the
/// sentence, so "for the past 2 weeks" terminates a historical window
/// instead of carrying it into the following clause.
fn duration_rules(working: &str) -> Vec<TriggerRule> {
    let mut rules = Vec::new();
    for span in [&*DAY_SPAN, &*LONG_SPAN] {
        if let Some(caps) = span.captures(working) {
            rules.push(TriggerRule::new(caps[1].trim(), TagKind::Conjunction));
        }
    }
    rules
}

/// Wrap every match of `re` in `[TAG]...[/TAG]` markers, joining the
/// matched phrase's internal spaces.
fn wrap_matches(re: &Regex, tag: TagKind, match_count: &mut usize, text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_end = 0;
    for m in re.find_iter(text) {
        *match_count += 1;
        out.push_str(&text[prev_end..m.start()]);
        out.push('[');
        out.push_str(tag.code());
        out.push(']');
        out.push_str(&m.as_str().trim().replace(' ', "_"));
        out.push_str("[/");
        out.push_str(tag.code());
        out.push(']');
        prev_end = m.end();
    }
    if prev_end == 0 {
        return text.to_string();
    }
    out.push_str(&text[prev_end..]);
    out
}

/// Split the annotated sentence on whitespace, lifting the marker a
/// token starts with into its `opens` slot and stripping any remaining
/// markers from the visible text.
fn tokenize(annotated: &str) -> Vec<ScanToken> {
    annotated
        .split_whitespace()
        .map(|raw| ScanToken {
            text: MARKER.replace_all(raw, "").into_owned(),
            opens: leading_marker(raw),
        })
        .collect()
}

/// Tag kind of the marker at the very start of a token, if any.
fn leading_marker(raw: &str) -> Option<TagKind> {
    let rest = raw.strip_prefix('[')?;
    let code = rest.get(..5)?.strip_suffix(']')?;
    TagKind::from_code(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TriggerRule;

    fn rule(pattern: &str, tag: TagKind) -> TriggerRule {
        TriggerRule::new(pattern, tag)
    }

    #[test]
    fn wraps_longest_phrase_first() {
        let rules = [
            rule("no evidence of", TagKind::PreScope),
            rule("no", TagKind::PreScope),
        ];
        let tagged = tag("There is no evidence of edema", "edema", TriggerCategory::Negation, &rules)
            .unwrap();
        assert_eq!(tagged.match_count, 1);
        assert_eq!(
            tagged.annotated,
            "There is [PREN]no evidence of[/PREN] 'edema'"
        );
        let texts: Vec<&str> = tagged.tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["There", "is", "no", "evidence", "of", "'edema'"]);
        assert_eq!(tagged.tokens[2].opens, Some(TagKind::PreScope));
        assert_eq!(tagged.tokens[3].opens, None);
    }

    #[test]
    fn protected_term_cannot_open_a_scope() {
        let rules = [
            rule("nausea", TagKind::PreScope),
            rule("no", TagKind::PreScope),
        ];
        let tagged = tag("no nausea", "nausea", TriggerCategory::Negation, &rules).unwrap();
        // The rule still matches inside the quotes, but the quote keeps
        // the marker off the front of the token.
        assert_eq!(tagged.tokens[0].opens, Some(TagKind::PreScope));
        assert_eq!(tagged.tokens[1].opens, None);
        assert_eq!(tagged.tokens[1].text, "'nausea'");
    }

    #[test]
    fn multi_word_term_stays_whole_through_tagging() {
        let rules = [
            rule("heart", TagKind::PreScope),
            rule("no", TagKind::PreScope),
        ];
        let tagged = tag(
            "no heart attack reported",
            "heart attack",
            TriggerCategory::Negation,
            &rules,
        )
        .unwrap();
        // "heart" inside the protected term is out of reach; the term
        // splits back into tokens only after tagging.
        assert_eq!(tagged.match_count, 1);
        let texts: Vec<&str> = tagged.tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["no", "'heart", "attack'", "reported"]);
        assert_eq!(tagged.tokens[1].opens, None);
    }

    #[test]
    fn historical_duration_becomes_a_conjunction() {
        let rules = [rule("has had", TagKind::PreScope)];
        let tagged = tag(
            "He has had nausea for the past 2 weeks",
            "nausea",
            TriggerCategory::Historical,
            &rules,
        )
        .unwrap();
        assert!(tagged.annotated.contains("[CONJ]for the past[/CONJ]"));
        let conj = tagged
            .tokens
            .iter()
            .find(|t| t.opens == Some(TagKind::Conjunction))
            .expect("conjunction token");
        assert_eq!(conj.text, "for");
    }

    #[test]
    fn duration_rules_are_historical_only() {
        let rules = [rule("no", TagKind::PreScope)];
        let tagged = tag(
            "no nausea for the past 2 weeks",
            "nausea",
            TriggerCategory::Negation,
            &rules,
        )
        .unwrap();
        assert!(!tagged.annotated.contains("[CONJ]"));
    }

    #[test]
    fn invalid_rule_pattern_is_reported() {
        let rules = [rule("if (unclosed", TagKind::PreScope)];
        let err = tag("if anything", "anything", TriggerCategory::Hypothetical, &rules)
            .unwrap_err();
        assert!(matches!(err, ContextError::InvalidPattern { .. }));
    }

    #[test]
    fn no_match_yields_no_tokens() {
        let rules = [rule("denies", TagKind::PreScope)];
        let tagged = tag("A faint murmur was heard.", "murmur", TriggerCategory::Negation, &rules)
            .unwrap();
        assert_eq!(tagged.match_count, 0);
        assert!(tagged.tokens.is_empty());
    }

    #[test]
    fn matching_is_case_insensitive_and_case_preserving() {
        let rules = [rule("medical history", TagKind::PreScope)];
        let tagged = tag(
            "MEDICAL HISTORY: stable",
            "stable",
            TriggerCategory::Historical,
            &rules,
        )
        .unwrap();
        assert!(tagged.annotated.starts_with("[PREN]MEDICAL HISTORY[/PREN]:"));
    }
}
