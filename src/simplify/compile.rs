use crate::config::ConfigError;
use crate::vocabulary::Vocabulary;
use regex::{Regex, RegexBuilder};

/// Vocabulary tables compiled into matchers once per simplifier.
pub(super) struct CompiledVocabulary {
    indicators: PhraseSet,
    ordinals: Vec<String>,
    action_verbs: PhraseSet,
    pub(super) markers: Vec<ConditionalMarker>,
    negation: Option<Regex>,
    pub(super) action_columns: Vec<String>,
    abbreviations: Vec<String>,
}

/// A conditional phrase such as `check whether` or the bare `if`.
pub(super) struct ConditionalMarker {
    pub(super) compound: bool,
    regex: Regex,
}

impl ConditionalMarker {
    /// Byte range of the first occurrence of the marker in `text`.
    pub(super) fn find(&self, text: &str) -> Option<(usize, usize)> {
        self.regex.find(text).map(|found| (found.start(), found.end()))
    }
}

/// Phrases matched at the start of a text, longest first.
struct PhraseSet {
    leading: Option<Regex>,
}

impl PhraseSet {
    fn new(phrases: &[String], key: &'static str) -> Result<Self, ConfigError> {
        let Some(alternation) = alternation(phrases) else {
            return Ok(PhraseSet { leading: None });
        };
        let leading = compile_regex(&format!(r"^\s*(?:{alternation})"), key)?;
        Ok(PhraseSet {
            leading: Some(leading),
        })
    }

    /// Matched phrase (lowercased) and the byte offset just past it.
    fn leading_match(&self, text: &str) -> Option<(String, usize)> {
        let found = self.leading.as_ref()?.find(text)?;
        Some((found.as_str().trim().to_lowercase(), found.end()))
    }
}

impl CompiledVocabulary {
    pub(super) fn new(vocabulary: &Vocabulary) -> Result<Self, ConfigError> {
        let indicators = PhraseSet::new(
            &vocabulary.sequential_indicators,
            "vocabulary.sequential_indicators",
        )?;
        let action_verbs = PhraseSet::new(&vocabulary.action_verbs, "vocabulary.action_verbs")?;
        let mut markers = Vec::new();
        for marker in &vocabulary.conditional_markers {
            let pattern = phrase_pattern(marker);
            if pattern.is_empty() {
                continue;
            }
            markers.push(ConditionalMarker {
                compound: marker.split_whitespace().count() > 1,
                regex: compile_regex(&pattern, "vocabulary.conditional_markers")?,
            });
        }
        let negation = match alternation(&vocabulary.negation_terms) {
            Some(alternation) => Some(compile_regex(
                &format!("(?:{alternation})"),
                "vocabulary.negation_terms",
            )?),
            None => None,
        };

        Ok(CompiledVocabulary {
            indicators,
            ordinals: lowercased(&vocabulary.ordinal_indicators),
            action_verbs,
            markers,
            negation,
            action_columns: lowercased(&vocabulary.action_columns),
            abbreviations: lowercased(&vocabulary.abbreviations),
        })
    }

    pub(super) fn starts_with_indicator(&self, text: &str) -> bool {
        self.indicators.leading_match(text).is_some()
    }

    pub(super) fn starts_with_action_verb(&self, text: &str) -> bool {
        self.action_verbs.leading_match(text).is_some()
    }

    /// Remove leading sequential indicators.
    ///
    /// With `require_comma` only `Then, ...` style prefixes are removed;
    /// otherwise a bare indicator is removed too, except ordinals (`First step`
    /// keeps its wording). Nothing is removed if it would leave the text empty.
    pub(super) fn strip_indicators<'a>(&self, text: &'a str, require_comma: bool) -> &'a str {
        let mut rest = text.trim_start();
        while let Some((phrase, end)) = self.indicators.leading_match(rest) {
            let after = &rest[end..];
            let trimmed = after.trim_start();
            let has_comma = trimmed.starts_with(',');
            let strip = has_comma
                || (!require_comma && !self.ordinals.iter().any(|ordinal| *ordinal == phrase));
            if !strip {
                break;
            }
            let remainder = if has_comma {
                trimmed[1..].trim_start()
            } else {
                trimmed
            };
            if remainder.is_empty() {
                break;
            }
            rest = remainder;
        }
        rest
    }

    /// Whether the text is nothing but sequential indicators (`Then`, `Next,`).
    pub(super) fn is_only_indicators(&self, text: &str) -> bool {
        let mut rest = text.trim();
        while let Some((_, end)) = self.indicators.leading_match(rest) {
            rest = rest[end..].trim_start().trim_start_matches(',').trim_start();
            if rest.is_empty() {
                return true;
            }
        }
        false
    }

    /// Whether a condition is phrased negatively (`not valid`, `fails`).
    pub(super) fn is_negated(&self, condition: &str) -> bool {
        self.negation
            .as_ref()
            .is_some_and(|negation| negation.is_match(condition))
    }

    pub(super) fn is_abbreviation(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        self.abbreviations.iter().any(|abbr| *abbr == lower)
    }
}

fn lowercased(values: &[String]) -> Vec<String> {
    values.iter().map(|value| value.trim().to_lowercase()).collect()
}

/// Regex for one phrase: words separated by flexible whitespace, with word
/// boundaries on the ends that are word characters.
fn phrase_pattern(phrase: &str) -> String {
    let words: Vec<String> = phrase.split_whitespace().map(regex::escape).collect();
    if words.is_empty() {
        return String::new();
    }
    let body = words.join(r"\s+");
    let starts_word = phrase
        .trim_start()
        .chars()
        .next()
        .is_some_and(char::is_alphanumeric)
        && !phrase.contains('\'');
    let ends_word = phrase
        .trim_end()
        .chars()
        .last()
        .is_some_and(char::is_alphanumeric);
    format!(
        "{}{}{}",
        if starts_word { r"\b" } else { "" },
        body,
        if ends_word { r"\b" } else { "" }
    )
}

fn alternation(phrases: &[String]) -> Option<String> {
    let mut sorted: Vec<&String> = phrases.iter().collect();
    sorted.sort_by_key(|phrase| std::cmp::Reverse(phrase.len()));
    let parts: Vec<String> = sorted
        .into_iter()
        .map(|phrase| phrase_pattern(phrase))
        .filter(|pattern| !pattern.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("|"))
    }
}

fn compile_regex(pattern: &str, key: &'static str) -> Result<Regex, ConfigError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|err| ConfigError::InvalidValue {
            key,
            reason: format!("invalid pattern {pattern}: {err}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiled() -> CompiledVocabulary {
        CompiledVocabulary::new(&Vocabulary::default()).expect("compile default vocabulary")
    }

    #[test]
    fn strips_indicators_in_narrative_mode() {
        let vocab = compiled();
        assert_eq!(vocab.strip_indicators("First, open the app", false), "open the app");
        assert_eq!(
            vocab.strip_indicators("Then the system loads files", false),
            "the system loads files"
        );
        assert_eq!(
            vocab.strip_indicators("After that, check if it works", false),
            "check if it works"
        );
        assert_eq!(vocab.strip_indicators("First step", false), "First step");
        assert_eq!(vocab.strip_indicators("Then", false), "Then");
    }

    #[test]
    fn strips_only_comma_indicators_when_required() {
        let vocab = compiled();
        assert_eq!(vocab.strip_indicators("Then, save", true), "save");
        assert_eq!(vocab.strip_indicators("Then save", true), "Then save");
        assert_eq!(vocab.strip_indicators("Next, then, run it", true), "run it");
        assert_eq!(vocab.strip_indicators("Thenceforth save", false), "Thenceforth save");
    }

    #[test]
    fn recognizes_indicator_only_text() {
        let vocab = compiled();
        assert!(vocab.is_only_indicators("Next,"));
        assert!(vocab.is_only_indicators("after that, then"));
        assert!(!vocab.is_only_indicators("Then save"));
        assert!(!vocab.is_only_indicators(""));
    }

    #[test]
    fn recognizes_action_verbs_as_whole_words() {
        let vocab = compiled();
        assert!(vocab.starts_with_action_verb("Restart the router"));
        assert!(vocab.starts_with_action_verb("  click OK"));
        assert!(!vocab.starts_with_action_verb("Openness matters"));
        assert!(!vocab.starts_with_action_verb("The system loads"));
    }

    #[test]
    fn detects_negated_conditions() {
        let vocab = compiled();
        assert!(vocab.is_negated("not detected"));
        assert!(vocab.is_negated("the drive isn't detected"));
        assert!(vocab.is_negated("invalid"));
        assert!(!vocab.is_negated("authenticated"));
        assert!(!vocab.is_negated("nothing to see"));
    }

    #[test]
    fn markers_keep_priority_order() {
        let vocab = compiled();
        let first = vocab.markers.first().expect("markers");
        assert!(first.compound);
        assert_eq!(first.find("Please CHECK  if it works"), Some((7, 16)));
        let bare = vocab.markers.last().expect("markers");
        assert!(!bare.compound);
        assert_eq!(bare.find("verify the iffy part"), None);
    }
}
