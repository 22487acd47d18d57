//! Heuristic vocabulary used to classify workflow text.
//!
//! Every word list the pipeline consults lives here as plain data, so the
//! heuristics can be unit-tested and extended from configuration without
//! touching control flow.
use serde::{Deserialize, Serialize};

/// Lookup tables consulted by extraction and decision detection.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Vocabulary {
    /// Cue phrases that open a new step in narrative text.
    pub sequential_indicators: Vec<String>,
    /// Indicators that are only stripped when followed by a comma.
    pub ordinal_indicators: Vec<String>,
    /// Imperative verbs that open a new step in narrative text.
    pub action_verbs: Vec<String>,
    /// Conditional markers in priority order; multi-word markers first.
    pub conditional_markers: Vec<String>,
    /// Terms that make an outcome condition negative ("if not valid").
    pub negation_terms: Vec<String>,
    /// Table header names that identify the action column, in priority order.
    pub action_columns: Vec<String>,
    /// Abbreviations whose trailing period does not end a sentence.
    pub abbreviations: Vec<String>,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

impl Default for Vocabulary {
    fn default() -> Self {
        Vocabulary {
            sequential_indicators: strings(&[
                "after that",
                "after this",
                "afterwards",
                "afterward",
                "once done",
                "subsequently",
                "first",
                "firstly",
                "second",
                "secondly",
                "third",
                "thirdly",
                "then",
                "next",
                "finally",
                "lastly",
            ]),
            ordinal_indicators: strings(&["first", "second", "third"]),
            action_verbs: strings(&[
                "open",
                "close",
                "click",
                "select",
                "choose",
                "enter",
                "type",
                "press",
                "load",
                "save",
                "delete",
                "create",
                "install",
                "uninstall",
                "configure",
                "verify",
                "check",
                "connect",
                "disconnect",
                "run",
                "execute",
                "start",
                "stop",
                "restart",
                "reboot",
                "boot",
                "update",
                "upload",
                "download",
                "send",
                "submit",
                "review",
                "remove",
                "insert",
                "plug",
                "unplug",
                "wait",
                "go",
                "navigate",
                "log",
                "sign",
                "copy",
                "paste",
                "print",
                "call",
                "contact",
                "notify",
                "assign",
                "approve",
                "reject",
                "record",
                "fill",
                "set",
                "enable",
                "disable",
                "determine",
                "validate",
                "confirm",
                "ensure",
                "make",
                "use",
                "add",
                "apply",
                "test",
            ]),
            conditional_markers: strings(&[
                "check if",
                "check whether",
                "verify if",
                "verify whether",
                "determine if",
                "determine whether",
                "if",
            ]),
            negation_terms: strings(&[
                "no",
                "not",
                "never",
                "false",
                "fail",
                "fails",
                "failed",
                "invalid",
                "unsuccessful",
                "incorrect",
                "wrong",
                "missing",
                "unavailable",
                "denied",
                "rejected",
                "n't",
            ]),
            action_columns: strings(&["action", "step", "description", "task"]),
            abbreviations: strings(&["e.g.", "i.e.", "approx.", "vs.", "mr.", "dr."]),
        }
    }
}

/// Additions layered on top of the default vocabulary by configuration.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct VocabularyExtension {
    #[serde(default, alias = "sequentialIndicators")]
    pub sequential_indicators: Vec<String>,
    #[serde(default, alias = "actionVerbs")]
    pub action_verbs: Vec<String>,
    #[serde(default, alias = "conditionalMarkers")]
    pub conditional_markers: Vec<String>,
    #[serde(default, alias = "negationTerms")]
    pub negation_terms: Vec<String>,
    #[serde(default, alias = "actionColumns")]
    pub action_columns: Vec<String>,
}

impl VocabularyExtension {
    pub fn is_empty(&self) -> bool {
        self.sequential_indicators.is_empty()
            && self.action_verbs.is_empty()
            && self.conditional_markers.is_empty()
            && self.negation_terms.is_empty()
            && self.action_columns.is_empty()
    }

    /// Every entry paired with the configuration key it came from.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.sequential_indicators
            .iter()
            .map(|v| ("vocabulary.sequential_indicators", v.as_str()))
            .chain(
                self.action_verbs
                    .iter()
                    .map(|v| ("vocabulary.action_verbs", v.as_str())),
            )
            .chain(
                self.conditional_markers
                    .iter()
                    .map(|v| ("vocabulary.conditional_markers", v.as_str())),
            )
            .chain(
                self.negation_terms
                    .iter()
                    .map(|v| ("vocabulary.negation_terms", v.as_str())),
            )
            .chain(
                self.action_columns
                    .iter()
                    .map(|v| ("vocabulary.action_columns", v.as_str())),
            )
    }
}

impl Vocabulary {
    /// Merge configured additions, keeping defaults first and skipping duplicates.
    ///
    /// Added conditional markers go ahead of the bare `if` so a longer phrase
    /// still wins over its suffix.
    pub fn extended(mut self, extension: &VocabularyExtension) -> Self {
        append_unique(
            &mut self.sequential_indicators,
            &extension.sequential_indicators,
        );
        append_unique(&mut self.action_verbs, &extension.action_verbs);
        append_unique(&mut self.negation_terms, &extension.negation_terms);
        append_unique(&mut self.action_columns, &extension.action_columns);

        let bare = self
            .conditional_markers
            .iter()
            .position(|marker| marker == "if");
        let mut added = Vec::new();
        for marker in &extension.conditional_markers {
            let marker = normalize_entry(marker);
            if !self.conditional_markers.contains(&marker) && !added.contains(&marker) {
                added.push(marker);
            }
        }
        match bare {
            Some(idx) => {
                self.conditional_markers.splice(idx..idx, added);
            }
            None => self.conditional_markers.extend(added),
        }
        self
    }
}

fn normalize_entry(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn append_unique(target: &mut Vec<String>, additions: &[String]) {
    for value in additions {
        let value = normalize_entry(value);
        if !target.contains(&value) {
            target.push(value);
        }
    }
}
