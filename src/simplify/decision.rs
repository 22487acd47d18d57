//! Decision detection.
//!
//! A step is read clause by clause. The first clause carrying a conditional
//! marker (or ending in `?`) heads a decision; outcome language in the rest of
//! the step, in its sub-steps, or in the steps right after it fills the yes
//! and no branches. Anything else the step says is emitted as plain actions
//! around the decision.
use super::compile::CompiledVocabulary;
use super::model::{Detail, DetectedStep, RawStep, Step};
use super::sentences::split_sentences;
use super::Rules;
use crate::config::SimplifierConfig;
use regex::{Captures, Regex};

const CLAUSE_TERMINATORS: [char; 4] = ['.', ';', '!', '?'];

/// Following steps that may be read as branch outcomes.
const MAX_OUTCOME_STEPS: usize = 2;

/// Words too common to relate two conditions.
const STOP_WORDS: [&str; 14] = [
    "the", "and", "are", "was", "were", "has", "have", "for", "with", "this", "that", "its",
    "you", "your",
];

/// Fixed outcome-language patterns.
pub(super) struct DecisionPatterns {
    outcome_split: Regex,
    outcome_clause: Regex,
    otherwise: Regex,
    answer: Regex,
    conditional_comma: Regex,
    conditional_then: Regex,
    inline_then: Regex,
}

impl DecisionPatterns {
    pub(super) fn new() -> Self {
        DecisionPatterns {
            outcome_split: Regex::new(r"(?i),\s*(otherwise\b|else\b|if\s+(?:yes|no|not)\b)")
                .expect("regex for outcome clause splits"),
            outcome_clause: Regex::new(
                r"(?i)^(?:otherwise|else)\b|^if\s+(?:yes|no|not)\s*(?:[,:]|$)",
            )
            .expect("regex for outcome clauses"),
            otherwise: Regex::new(r"(?i)^(?:otherwise|else)\b[\s,:]*(?:then\b[\s,]*)?(.*)$")
                .expect("regex for otherwise clauses"),
            answer: Regex::new(r"(?i)^if\s+(yes|no|not)\s*(?:[,:]|$)\s*(?:then\b[\s,]*)?(.*)$")
                .expect("regex for yes/no outcomes"),
            conditional_comma: Regex::new(r"(?i)^if\s+(.+?)\s*[,:]\s*(?:then\b[\s,]*)?(.*)$")
                .expect("regex for conditional clauses"),
            conditional_then: Regex::new(r"(?i)^if\s+(.+?)(?:,\s*|\s+)then\s+(.*)$")
                .expect("regex for if-then clauses"),
            inline_then: Regex::new(r"(?i)(?:,\s*|\s+)then\s+")
                .expect("regex for inline then"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Answer {
    Yes,
    No,
}

#[derive(Debug, Clone, Default)]
struct Branches {
    yes: Option<String>,
    no: Option<String>,
}

impl Branches {
    fn slot(&mut self, answer: Answer) -> &mut Option<String> {
        match answer {
            Answer::Yes => &mut self.yes,
            Answer::No => &mut self.no,
        }
    }

    /// Fill the branch if nothing has claimed it yet.
    fn fill(&mut self, answer: Answer, action: String) -> bool {
        let slot = self.slot(answer);
        if slot.is_some() {
            return false;
        }
        *slot = Some(action);
        true
    }

    fn is_complete(&self) -> bool {
        self.yes.is_some() && self.no.is_some()
    }
}

#[derive(Debug)]
struct Clause<'a> {
    /// Clause as written, terminator included.
    raw: &'a str,
    /// Clause without trailing `.`, `;`, `!` or `,`; a `?` is kept.
    text: &'a str,
}

#[derive(Debug, PartialEq, Eq)]
struct Head {
    preceding: Option<String>,
    condition: String,
    question: String,
    yes: Option<String>,
}

/// Steps produced from one raw step, plus how many following steps were
/// absorbed as branch outcomes.
#[derive(Debug)]
pub(super) struct Detection {
    pub(super) steps: Vec<DetectedStep>,
    pub(super) consumed: usize,
}

pub(super) struct DecisionDetector<'a> {
    patterns: &'a DecisionPatterns,
    vocabulary: &'a CompiledVocabulary,
    config: &'a SimplifierConfig,
}

impl<'a> DecisionDetector<'a> {
    pub(super) fn new(rules: &'a Rules, config: &'a SimplifierConfig) -> Self {
        DecisionDetector {
            patterns: &rules.decisions,
            vocabulary: &rules.vocabulary,
            config,
        }
    }

    pub(super) fn detect_decisions(&self, steps: &[RawStep]) -> Vec<DetectedStep> {
        let mut detected = Vec::new();
        let mut idx = 0;
        while idx < steps.len() {
            let detection = self.detect_decision(&steps[idx], &steps[idx + 1..]);
            detected.extend(detection.steps);
            idx += 1 + detection.consumed;
        }
        detected
    }

    pub(super) fn detect_decision(&self, step: &RawStep, following: &[RawStep]) -> Detection {
        let clauses = self.split_clauses(&step.text);
        let found = clauses
            .iter()
            .enumerate()
            .filter(|(_, clause)| !self.is_outcome_clause(clause.text))
            .find_map(|(idx, clause)| self.parse_head(clause.text).map(|head| (idx, head)));
        let Some((head_idx, head)) = found else {
            return pass_through(step);
        };

        let mut steps = Vec::new();
        let leading: Vec<&str> = clauses[..head_idx].iter().map(|clause| clause.raw).collect();
        if !leading.is_empty() {
            steps.push(DetectedStep::new(Step::action(leading.join(" ")), Vec::new()));
        }
        if let Some(preceding) = &head.preceding {
            steps.push(DetectedStep::new(Step::action(preceding.clone()), Vec::new()));
        }

        let mut branches = Branches {
            yes: head.yes.clone(),
            no: None,
        };
        let mut leftover = Vec::new();
        for clause in &clauses[head_idx + 1..] {
            let filled = self
                .parse_outcome(clause.text, &head.condition, false)
                .is_some_and(|(answer, action)| branches.fill(answer, action));
            if !filled {
                leftover.push(clause.raw);
            }
        }

        let mut sources = step.raw_source.clone();
        let mut other_sub_steps = Vec::new();
        for sub in &step.sub_steps {
            let filled = sub.sub_steps.is_empty()
                && self
                    .parse_outcome(&sub.text, &head.condition, false)
                    .is_some_and(|(answer, action)| branches.fill(answer, action));
            if filled {
                sources.extend(sub.all_sources());
            } else {
                other_sub_steps.push(sub);
            }
        }

        let mut consumed = 0;
        if self.config.merge_multiline {
            for next in following.iter().take(MAX_OUTCOME_STEPS) {
                if branches.is_complete() {
                    break;
                }
                let Some(filled) = self.outcome_step(next, &head.condition, &branches) else {
                    break;
                };
                branches = filled;
                sources.extend(next.all_sources());
                consumed += 1;
            }
        }

        let missing = self.config.missing_branch_text();
        steps.push(DetectedStep::new(
            Step::Decision {
                question: head.question,
                yes_branch: branches.yes.unwrap_or_else(|| missing.to_string()),
                no_branch: branches.no.unwrap_or_else(|| missing.to_string()),
            },
            sources,
        ));

        if !leftover.is_empty() {
            let mut rest = RawStep::unfilled();
            rest.text = leftover.join(" ");
            steps.extend(self.detect_decision(&rest, &[]).steps);
        }
        for sub in other_sub_steps {
            steps.extend(self.detect_decision(sub, &[]).steps);
        }
        Detection { steps, consumed }
    }

    /// Clauses split at sentence punctuation and before `, otherwise` style
    /// outcome phrases.
    fn split_clauses<'t>(&self, text: &'t str) -> Vec<Clause<'t>> {
        let mut clauses = Vec::new();
        for sentence in split_sentences(text, &CLAUSE_TERMINATORS, self.vocabulary) {
            let mut start = 0;
            for caps in self.patterns.outcome_split.captures_iter(sentence.text) {
                let (Some(whole), Some(word)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                push_clause(&mut clauses, &sentence.text[start..whole.start()]);
                start = word.start();
            }
            push_clause(&mut clauses, &sentence.text[start..]);
        }
        clauses
    }

    fn is_outcome_clause(&self, text: &str) -> bool {
        self.patterns.outcome_clause.is_match(text)
    }

    fn parse_head(&self, text: &str) -> Option<Head> {
        let found = self
            .vocabulary
            .markers
            .iter()
            .enumerate()
            .filter_map(|(priority, marker)| {
                marker
                    .find(text)
                    .map(|(start, end)| (start, priority, end, marker.compound))
            })
            .min_by_key(|(start, priority, ..)| (*start, *priority));
        let explicit = found.and_then(|(start, _, end, compound)| {
            if compound {
                self.compound_head(&text[..start], &text[end..])
            } else if start == 0 {
                self.leading_if_head(text, &text[end..])
            } else {
                self.trailing_if_head(&text[..start], &text[end..])
            }
        });
        explicit.or_else(|| implicit_head(text))
    }

    /// `check if <condition>[, then <yes>]`, possibly after other words.
    fn compound_head(&self, prefix: &str, rest: &str) -> Option<Head> {
        let (condition, yes) = match self.patterns.inline_then.find(rest) {
            Some(found) => (&rest[..found.start()], non_empty(&rest[found.end()..])),
            None => (rest, None),
        };
        let condition = clean_condition(condition)?;
        Some(Head {
            preceding: self.preceding_action(prefix),
            question: question_for(&condition),
            condition,
            yes,
        })
    }

    /// `if <condition>, [then] <yes>` at the start of a clause.
    fn leading_if_head(&self, text: &str, rest: &str) -> Option<Head> {
        let parsed = self
            .patterns
            .conditional_then
            .captures(text)
            .or_else(|| self.patterns.conditional_comma.captures(text));
        let (condition, yes) = match parsed {
            Some(caps) => (group(&caps, 1), non_empty(group(&caps, 2))),
            None => (rest, None),
        };
        let condition = clean_condition(condition)?;
        Some(Head {
            preceding: None,
            question: question_for(&condition),
            condition,
            yes,
        })
    }

    /// `<yes> if <condition>`, or `<action> if <condition>, <yes>`.
    fn trailing_if_head(&self, prefix: &str, rest: &str) -> Option<Head> {
        let split = match self.patterns.inline_then.find(rest) {
            Some(found) => Some((found.start(), found.end())),
            None => rest.find(',').map(|comma| (comma, comma + 1)),
        };
        if let Some((condition_end, action_start)) = split {
            let condition = clean_condition(&rest[..condition_end]);
            let yes = non_empty(strip_leading_then(&rest[action_start..]));
            if let (Some(condition), Some(yes)) = (condition, yes) {
                return Some(Head {
                    preceding: self.preceding_action(prefix),
                    question: question_for(&condition),
                    condition,
                    yes: Some(yes),
                });
            }
        }
        let condition = clean_condition(rest)?;
        Some(Head {
            preceding: None,
            question: question_for(&condition),
            condition,
            yes: non_empty(strip_trailing_connectives(prefix)),
        })
    }

    fn preceding_action(&self, prefix: &str) -> Option<String> {
        let prefix = strip_trailing_connectives(prefix);
        if self.vocabulary.is_only_indicators(prefix) {
            return None;
        }
        non_empty(prefix)
    }

    /// The answer an outcome clause belongs to, and the action it names.
    ///
    /// A plain `if <condition>, <action>` counts as an outcome only when its
    /// condition matches the head's wording if `require_related` is set.
    fn parse_outcome(
        &self,
        text: &str,
        head_condition: &str,
        require_related: bool,
    ) -> Option<(Answer, String)> {
        if let Some(caps) = self.patterns.otherwise.captures(text) {
            return Some((Answer::No, group(&caps, 1).to_string()));
        }
        if let Some(caps) = self.patterns.answer.captures(text) {
            let answer = if group(&caps, 1).eq_ignore_ascii_case("yes") {
                Answer::Yes
            } else {
                Answer::No
            };
            return Some((answer, group(&caps, 2).to_string()));
        }
        let caps = self
            .patterns
            .conditional_then
            .captures(text)
            .or_else(|| self.patterns.conditional_comma.captures(text))?;
        let condition = group(&caps, 1);
        let action = non_empty(group(&caps, 2))?;
        if require_related && !self.related(condition, head_condition) {
            return None;
        }
        let answer =
            if self.vocabulary.is_negated(condition) == self.vocabulary.is_negated(head_condition) {
                Answer::Yes
            } else {
                Answer::No
            };
        Some((answer, action))
    }

    /// Branches after absorbing `next`, if every clause of it is an outcome
    /// for a branch that is still open.
    fn outcome_step(
        &self,
        next: &RawStep,
        head_condition: &str,
        branches: &Branches,
    ) -> Option<Branches> {
        if !next.sub_steps.is_empty() {
            return None;
        }
        let clauses = self.split_clauses(&next.text);
        if clauses.is_empty() {
            return None;
        }
        let mut filled = branches.clone();
        for clause in &clauses {
            let (answer, action) = self.parse_outcome(clause.text, head_condition, true)?;
            if !filled.fill(answer, action) {
                return None;
            }
        }
        Some(filled)
    }

    /// Whether two conditions talk about the same thing (`valid` and
    /// `data is invalid` do; `it rains` and `door is open` do not).
    fn related(&self, condition: &str, head_condition: &str) -> bool {
        let words = self.content_words(condition);
        let head_words = self.content_words(head_condition);
        words.iter().any(|word| {
            head_words
                .iter()
                .any(|head| word.contains(head.as_str()) || head.contains(word.as_str()))
        })
    }

    /// Lowercased words of three or more letters, minus stop words and
    /// negation terms (unless nothing else is left).
    fn content_words(&self, text: &str) -> Vec<String> {
        let words: Vec<String> = text
            .split(|ch: char| !(ch.is_alphanumeric() || ch == '\''))
            .filter(|word| word.chars().count() >= 3)
            .map(str::to_lowercase)
            .filter(|word| !STOP_WORDS.contains(&word.as_str()))
            .collect();
        let content: Vec<String> = words
            .iter()
            .filter(|word| !self.vocabulary.is_negated(word))
            .cloned()
            .collect();
        if content.is_empty() {
            words
        } else {
            content
        }
    }
}

fn pass_through(step: &RawStep) -> Detection {
    let mut details = Vec::new();
    collect_details(&step.sub_steps, 1, &mut details);
    Detection {
        steps: vec![DetectedStep::new(
            Step::Action {
                text: step.text.clone(),
                details,
            },
            step.all_sources(),
        )],
        consumed: 0,
    }
}

fn collect_details(steps: &[RawStep], depth: usize, out: &mut Vec<Detail>) {
    for step in steps {
        out.push(Detail::new(depth, step.text.clone()));
        collect_details(&step.sub_steps, depth + 1, out);
    }
}

fn push_clause<'t>(clauses: &mut Vec<Clause<'t>>, segment: &'t str) {
    let raw = segment.trim();
    let text = raw.trim_end_matches(['.', ';', '!', ',']).trim_end();
    if !text.is_empty() {
        clauses.push(Clause { raw, text });
    }
}

/// A clause phrased as a question with no explicit marker.
fn implicit_head(text: &str) -> Option<Head> {
    if !text.ends_with('?') {
        return None;
    }
    Some(Head {
        preceding: None,
        condition: clean_condition(text)?,
        question: text.to_string(),
        yes: None,
    })
}

fn question_for(condition: &str) -> String {
    format!("Check if {condition}?")
}

fn clean_condition(text: &str) -> Option<String> {
    non_empty(text.trim().trim_end_matches(['?', '.', '!', ',', ';', ':']))
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn group<'t>(caps: &Captures<'t>, idx: usize) -> &'t str {
    caps.get(idx).map_or("", |found| found.as_str().trim())
}

fn strip_leading_then(text: &str) -> &str {
    let text = text.trim_start();
    let Some(rest) = text
        .get(..4)
        .filter(|word| word.eq_ignore_ascii_case("then"))
        .map(|_| &text[4..])
    else {
        return text;
    };
    match rest.chars().next() {
        Some(next) if !(next.is_whitespace() || next == ',') => text,
        _ => rest.trim_start_matches(|ch: char| ch.is_whitespace() || ch == ','),
    }
}

/// Drop dangling `,`, `and` and `then` left before a marker.
fn strip_trailing_connectives(text: &str) -> &str {
    let mut rest = text.trim_end();
    loop {
        let before = rest;
        rest = rest.trim_end_matches(',').trim_end();
        for word in ["and", "then"] {
            if let Some(stripped) = strip_trailing_word(rest, word) {
                rest = stripped.trim_end();
            }
        }
        if rest == before {
            return rest;
        }
    }
}

fn strip_trailing_word<'t>(text: &'t str, word: &str) -> Option<&'t str> {
    let split = text.len().checked_sub(word.len())?;
    let tail = text.get(split..)?;
    if !tail.eq_ignore_ascii_case(word) {
        return None;
    }
    let head = &text[..split];
    match head.chars().last() {
        Some(last) if !(last.is_whitespace() || last == ',') => None,
        _ => Some(head),
    }
}

#[cfg(test)]
#[path = "decision_tests.rs"]
mod tests;
