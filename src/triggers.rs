//! Trigger vocabulary: boundary-tag kinds, categories, and the
//! repository of trigger phrases.
//!
//! Trigger phrases are curated lexical resources, one file per
//! category, in the line format `<phrase>` or `<phrase>\t\t[TAG]`.
//! A bundled lexicon is compiled into the crate; alternative lexicons
//! can be loaded from a directory or assembled in code.

use crate::ContextError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Kind of scope boundary a trigger phrase opens.
///
/// Every tagged phrase also terminates any window scan that reaches it,
/// regardless of kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagKind {
    /// `[PREN]` — opens a forward window after the trigger.
    PreScope,
    /// `[POST]` — opens a backward window before the trigger.
    PostScope,
    /// `[PREP]` — possible-scope variant of [`TagKind::PreScope`];
    /// terminates windows but opens none.
    PrePossible,
    /// `[POSP]` — possible-scope variant of [`TagKind::PostScope`];
    /// terminates windows but opens none.
    PostPossible,
    /// `[PSEU]` — pseudo trigger; consumes a phrase so that a shorter
    /// trigger inside it cannot open a scope ("no increase").
    Pseudo,
    /// `[CONJ]` — conjunction; terminates windows only.
    Conjunction,
    /// `[FSTT]` — opens both a forward and a backward window.
    FirstToken,
    /// `[ONEW]` — single-word trigger opening a forward window.
    OneWord,
}

impl TagKind {
    /// Four-letter code used in trigger files and annotated renderings.
    pub fn code(self) -> &'static str {
        match self {
            TagKind::PreScope => "PREN",
            TagKind::PostScope => "POST",
            TagKind::PrePossible => "PREP",
            TagKind::PostPossible => "POSP",
            TagKind::Pseudo => "PSEU",
            TagKind::Conjunction => "CONJ",
            TagKind::FirstToken => "FSTT",
            TagKind::OneWord => "ONEW",
        }
    }

    pub(crate) fn from_code(code: &str) -> Option<TagKind> {
        match code {
            "PREN" => Some(TagKind::PreScope),
            "POST" => Some(TagKind::PostScope),
            "PREP" => Some(TagKind::PrePossible),
            "POSP" => Some(TagKind::PostPossible),
            "PSEU" => Some(TagKind::Pseudo),
            "CONJ" => Some(TagKind::Conjunction),
            "FSTT" => Some(TagKind::FirstToken),
            "ONEW" => Some(TagKind::OneWord),
            _ => None,
        }
    }

    /// Whether a trigger of this kind starts a forward window scan.
    pub(crate) fn opens_forward(self) -> bool {
        matches!(
            self,
            TagKind::PreScope | TagKind::FirstToken | TagKind::OneWord
        )
    }

    /// Whether a trigger of this kind starts a backward window scan.
    pub(crate) fn opens_backward(self) -> bool {
        matches!(self, TagKind::PostScope | TagKind::FirstToken)
    }
}

/// The four trigger categories, processed in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerCategory {
    /// Negation cues ("no", "denies", "without").
    Negation,
    /// Cues that the assertion concerns someone other than the patient.
    Experiencer,
    /// Cues that the assertion concerns the past.
    Historical,
    /// Cues that the assertion concerns a condition that has not occurred.
    Hypothetical,
}

impl TriggerCategory {
    /// The fixed processing order. Resolution overwrites axis values in
    /// this order, so a later category wins ties on a shared axis.
    pub const ALL: [TriggerCategory; 4] = [
        TriggerCategory::Negation,
        TriggerCategory::Experiencer,
        TriggerCategory::Historical,
        TriggerCategory::Hypothetical,
    ];

    /// Lowercase name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            TriggerCategory::Negation => "negation",
            TriggerCategory::Experiencer => "experiencer",
            TriggerCategory::Historical => "historical",
            TriggerCategory::Hypothetical => "hypothetical",
        }
    }

    /// Forward window size in tokens. Backward windows are a fixed four
    /// tokens for every category.
    pub(crate) fn forward_window(self) -> usize {
        match self {
            TriggerCategory::Negation | TriggerCategory::Hypothetical => 5,
            TriggerCategory::Experiencer | TriggerCategory::Historical => 8,
        }
    }

    fn resource_name(self) -> &'static str {
        match self {
            TriggerCategory::Negation => "negation_triggers.txt",
            TriggerCategory::Experiencer => "experiencer_triggers.txt",
            TriggerCategory::Historical => "historical_triggers.txt",
            TriggerCategory::Hypothetical => "hypothetical_triggers.txt",
        }
    }
}

impl fmt::Display for TriggerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One trigger phrase with its boundary-tag kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerRule {
    /// The phrase, matched whole-word and case-insensitively.
    pub pattern: String,
    /// The boundary tag wrapped around each match.
    pub tag: TagKind,
}

impl TriggerRule {
    /// Create a rule from a phrase and its tag kind.
    pub fn new(pattern: impl Into<String>, tag: TagKind) -> Self {
        Self {
            pattern: pattern.into(),
            tag,
        }
    }
}

/// Parse trigger lines in the `<phrase>` / `<phrase>\t\t[TAG]` format.
///
/// Blank lines are skipped. A line without a tag suffix becomes a
/// generic pre-scope trigger, as does a line with an unrecognized tag
/// (logged).
pub fn parse_trigger_lines(input: &str) -> Vec<TriggerRule> {
    let mut rules = Vec::new();
    for line in input.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (phrase, tag) = match line.split_once("\t\t") {
            Some((phrase, suffix)) => {
                let code = suffix.trim().trim_start_matches('[').trim_end_matches(']');
                let tag = TagKind::from_code(code).unwrap_or_else(|| {
                    log::warn!("unrecognized trigger tag [{}] on \"{}\"", code, phrase);
                    TagKind::PreScope
                });
                (phrase.trim(), tag)
            }
            None => (line, TagKind::PreScope),
        };
        rules.push(TriggerRule::new(phrase, tag));
    }
    rules
}

/// Sort rules so a longer, more specific phrase is always applied before
/// any shorter phrase it contains; stable for equal lengths.
pub(crate) fn sort_longest_first(rules: &mut [TriggerRule]) {
    rules.sort_by(|a, b| b.pattern.len().cmp(&a.pattern.len()));
}

static BUNDLED: Lazy<TriggerRepository> = Lazy::new(|| {
    TriggerRepository::empty()
        .with_rules(
            TriggerCategory::Negation,
            parse_trigger_lines(include_str!("../data/negation_triggers.txt")),
        )
        .with_rules(
            TriggerCategory::Experiencer,
            parse_trigger_lines(include_str!("../data/experiencer_triggers.txt")),
        )
        .with_rules(
            TriggerCategory::Historical,
            parse_trigger_lines(include_str!("../data/historical_triggers.txt")),
        )
        .with_rules(
            TriggerCategory::Hypothetical,
            parse_trigger_lines(include_str!("../data/hypothetical_triggers.txt")),
        )
});

/// Immutable store of the four trigger categories.
///
/// Built once, then shared by reference across any number of concurrent
/// classification calls. Rules are held longest-phrase-first so the
/// tagger never re-sorts on the hot path.
#[derive(Debug, Clone, Default)]
pub struct TriggerRepository {
    negation: Vec<TriggerRule>,
    experiencer: Vec<TriggerRule>,
    historical: Vec<TriggerRule>,
    hypothetical: Vec<TriggerRule>,
}

impl TriggerRepository {
    /// The lexicon compiled into the crate, initialized at most once
    /// per process however many threads race to use it first.
    pub fn bundled() -> &'static TriggerRepository {
        &BUNDLED
    }

    /// A repository with no rules; every call classifies to the
    /// defaults.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Replace one category's rules, sorting them longest phrase first.
    pub fn with_rules(mut self, category: TriggerCategory, mut rules: Vec<TriggerRule>) -> Self {
        sort_longest_first(&mut rules);
        *self.rules_mut(category) = rules;
        self
    }

    /// Load the four named trigger resources from `dir`.
    ///
    /// A category whose file is missing or unreadable is left empty and
    /// the failure logged; the remaining categories load normally.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let mut repository = Self::empty();
        for category in TriggerCategory::ALL {
            match load_category(dir, category) {
                Ok(rules) => repository = repository.with_rules(category, rules),
                Err(err) => log::warn!("{} triggers unavailable: {}", category, err),
            }
        }
        repository
    }

    /// Rules for one category, longest phrase first.
    pub fn rules(&self, category: TriggerCategory) -> &[TriggerRule] {
        match category {
            TriggerCategory::Negation => &self.negation,
            TriggerCategory::Experiencer => &self.experiencer,
            TriggerCategory::Historical => &self.historical,
            TriggerCategory::Hypothetical => &self.hypothetical,
        }
    }

    fn rules_mut(&mut self, category: TriggerCategory) -> &mut Vec<TriggerRule> {
        match category {
            TriggerCategory::Negation => &mut self.negation,
            TriggerCategory::Experiencer => &mut self.experiencer,
            TriggerCategory::Historical => &mut self.historical,
            TriggerCategory::Hypothetical => &mut self.hypothetical,
        }
    }

    /// Total rule count across all categories.
    pub fn len(&self) -> usize {
        TriggerCategory::ALL
            .iter()
            .map(|category| self.rules(*category).len())
            .sum()
    }

    /// Whether no category has any rules.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn load_category(dir: &Path, category: TriggerCategory) -> Result<Vec<TriggerRule>, ContextError> {
    let path = dir.join(category.resource_name());
    let text = fs::read_to_string(&path)
        .map_err(|source| ContextError::TriggerResource { path, source })?;
    Ok(parse_trigger_lines(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_codes_round_trip() {
        for tag in [
            TagKind::PreScope,
            TagKind::PostScope,
            TagKind::PrePossible,
            TagKind::PostPossible,
            TagKind::Pseudo,
            TagKind::Conjunction,
            TagKind::FirstToken,
            TagKind::OneWord,
        ] {
            assert_eq!(TagKind::from_code(tag.code()), Some(tag));
        }
        assert_eq!(TagKind::from_code("WHAT"), None);
    }

    #[test]
    fn parses_tagged_and_untagged_lines() {
        let rules = parse_trigger_lines("no evidence of\t\t[PREN]\n\nh/o\nbut\t\t[CONJ]\n");
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0].pattern, "no evidence of");
        assert_eq!(rules[0].tag, TagKind::PreScope);
        assert_eq!(rules[1].pattern, "h/o");
        assert_eq!(rules[1].tag, TagKind::PreScope);
        assert_eq!(rules[2].tag, TagKind::Conjunction);
    }

    #[test]
    fn unrecognized_tag_falls_back_to_pre_scope() {
        let rules = parse_trigger_lines("no\t\t[BOGUS]\n");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].tag, TagKind::PreScope);
    }

    #[test]
    fn with_rules_sorts_longest_phrase_first() {
        let repository = TriggerRepository::empty().with_rules(
            TriggerCategory::Negation,
            vec![
                TriggerRule::new("no", TagKind::PreScope),
                TriggerRule::new("no evidence of", TagKind::PreScope),
                TriggerRule::new("denies", TagKind::PreScope),
            ],
        );
        let patterns: Vec<&str> = repository
            .rules(TriggerCategory::Negation)
            .iter()
            .map(|rule| rule.pattern.as_str())
            .collect();
        assert_eq!(patterns, ["no evidence of", "denies", "no"]);
    }

    #[test]
    fn equal_length_phrases_keep_their_order() {
        let repository = TriggerRepository::empty().with_rules(
            TriggerCategory::Negation,
            vec![
                TriggerRule::new("abc", TagKind::PreScope),
                TriggerRule::new("xyz", TagKind::Conjunction),
            ],
        );
        let rules = repository.rules(TriggerCategory::Negation);
        assert_eq!(rules[0].pattern, "abc");
        assert_eq!(rules[1].pattern, "xyz");
    }

    #[test]
    fn empty_repository_has_no_rules() {
        let repository = TriggerRepository::empty();
        assert!(repository.is_empty());
        for category in TriggerCategory::ALL {
            assert!(repository.rules(category).is_empty());
        }
    }
}
