//! Workflow simplification pipeline.
//!
//! Text flows through four stages, each a pure function over the output of
//! the one before: format detection, step extraction, decision detection and
//! normalization. [`Simplifier`] holds the compiled rules so a configuration
//! is validated once and reused across documents.
mod compile;
mod decision;
mod detect;
mod extract;
mod format;
mod lines;
mod model;
mod normalize;
mod sentences;

pub use model::{
    Detail, DetectedStep, InputFormat, NumberedStep, RawStep, Step, StepKind, StructuredStep,
};

use self::compile::CompiledVocabulary;
use self::decision::{DecisionDetector, DecisionPatterns};
use self::lines::LinePatterns;
use self::normalize::{normalize, NormalizedWorkflow};
use crate::config::{ConfigError, SimplifierConfig};
use crate::vocabulary::Vocabulary;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Everything the stages match against, compiled once.
struct Rules {
    lines: LinePatterns,
    vocabulary: CompiledVocabulary,
    decisions: DecisionPatterns,
}

impl Rules {
    fn new(vocabulary: &Vocabulary) -> Result<Self, ConfigError> {
        Ok(Rules {
            lines: LinePatterns::new(),
            vocabulary: CompiledVocabulary::new(vocabulary)?,
            decisions: DecisionPatterns::new(),
        })
    }
}

/// Summary of one document, as printed by `wfsimplify analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub format: InputFormat,
    /// Steps found by extraction, before decisions were split out.
    pub raw_steps: usize,
    pub counts: BTreeMap<StepKind, usize>,
    pub steps: Vec<StructuredStep>,
}

impl Analysis {
    pub fn count(&self, kind: StepKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn decisions(&self) -> impl Iterator<Item = &StructuredStep> {
        self.steps
            .iter()
            .filter(|step| step.kind == StepKind::Decision)
    }
}

struct Run {
    format: InputFormat,
    raw_steps: Vec<RawStep>,
    workflow: NormalizedWorkflow,
}

/// Converts free-form workflow text into numbered steps.
pub struct Simplifier {
    config: SimplifierConfig,
    rules: Rules,
}

impl Simplifier {
    pub fn new(config: SimplifierConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let vocabulary = Vocabulary::default().extended(&config.vocabulary);
        let rules = Rules::new(&vocabulary)?;
        Ok(Simplifier { config, rules })
    }

    pub fn config(&self) -> &SimplifierConfig {
        &self.config
    }

    pub fn detect_format(&self, text: &str) -> InputFormat {
        detect::detect_format(&self.bounded(text), &self.rules.lines)
    }

    /// Raw steps in document order, before decision detection.
    pub fn extract(&self, text: &str) -> Vec<RawStep> {
        let text = self.bounded(text);
        let format = detect::detect_format(&text, &self.rules.lines);
        let lines: Vec<&str> = text.lines().collect();
        extract::extract(&lines, format, &self.rules, &self.config)
    }

    /// Canonical numbered text.
    pub fn simplify(&self, text: &str) -> String {
        self.run(text).workflow.rendered
    }

    pub fn simplify_to_structured(&self, text: &str) -> Vec<StructuredStep> {
        structured(&self.run(text).workflow.steps)
    }

    pub fn analyze(&self, text: &str) -> Analysis {
        let run = self.run(text);
        let mut counts = BTreeMap::new();
        for numbered in &run.workflow.steps {
            *counts.entry(numbered.step.kind()).or_insert(0) += 1;
        }
        Analysis {
            format: run.format,
            raw_steps: run.raw_steps.len(),
            counts,
            steps: structured(&run.workflow.steps),
        }
    }

    fn run(&self, text: &str) -> Run {
        let text = self.bounded(text);
        let format = detect::detect_format(&text, &self.rules.lines);
        let lines: Vec<&str> = text.lines().collect();
        let raw_steps = extract::extract(&lines, format, &self.rules, &self.config);
        let detected =
            DecisionDetector::new(&self.rules, &self.config).detect_decisions(&raw_steps);
        tracing::debug!(
            format = %format,
            raw_steps = raw_steps.len(),
            detected_steps = detected.len(),
            "workflow extracted"
        );
        let workflow = normalize(detected, &self.rules.vocabulary, &self.config);
        Run {
            format,
            raw_steps,
            workflow,
        }
    }

    /// The input cut to `max_lines`.
    fn bounded<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let max_lines = self.config.max_lines;
        let total = text.lines().count();
        if total <= max_lines {
            return Cow::Borrowed(text);
        }
        tracing::warn!(
            lines = total,
            max_lines,
            "input exceeds max_lines; extra lines ignored"
        );
        Cow::Owned(text.lines().take(max_lines).collect::<Vec<_>>().join("\n"))
    }
}

fn structured(steps: &[NumberedStep]) -> Vec<StructuredStep> {
    steps.iter().map(StructuredStep::from).collect()
}

/// One-shot [`Simplifier::simplify`]; `None` uses the default configuration.
pub fn simplify(text: &str, config: Option<&SimplifierConfig>) -> Result<String, ConfigError> {
    let simplifier = Simplifier::new(config.cloned().unwrap_or_default())?;
    Ok(simplifier.simplify(text))
}

/// One-shot [`Simplifier::simplify_to_structured`].
pub fn simplify_to_structured(
    text: &str,
    config: Option<&SimplifierConfig>,
) -> Result<Vec<StructuredStep>, ConfigError> {
    let simplifier = Simplifier::new(config.cloned().unwrap_or_default())?;
    Ok(simplifier.simplify_to_structured(text))
}

#[cfg(test)]
#[path = "simplify_tests.rs"]
mod tests;
