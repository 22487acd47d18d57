use serde::{Deserialize, Serialize};
use std::fmt;

/// Input shape selected by the format detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFormat {
    Numbered,
    StepPrefix,
    Bullet,
    Table,
    Narrative,
    Mixed,
}

impl InputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            InputFormat::Numbered => "numbered",
            InputFormat::StepPrefix => "step_prefix",
            InputFormat::Bullet => "bullet",
            InputFormat::Table => "table",
            InputFormat::Narrative => "narrative",
            InputFormat::Mixed => "mixed",
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logical action as it came out of the extractor, before numbering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStep {
    /// Position in document order.
    pub index: usize,
    pub text: String,
    /// Original line(s) the step was taken from.
    pub raw_source: Vec<String>,
    pub sub_steps: Vec<RawStep>,
}

impl RawStep {
    pub(crate) fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        RawStep {
            index: 0,
            text: text.into(),
            raw_source: vec![source.into()],
            sub_steps: Vec::new(),
        }
    }

    /// A step opened by a marker-only line; its text arrives later.
    pub(crate) fn unfilled() -> Self {
        RawStep {
            index: 0,
            text: String::new(),
            raw_source: Vec::new(),
            sub_steps: Vec::new(),
        }
    }

    /// Append a wrapped line to this step's text.
    pub(crate) fn push_continuation(&mut self, text: &str, source: &str) {
        if self.text.is_empty() {
            self.text = text.to_string();
        } else if !text.is_empty() {
            self.text.push(' ');
            self.text.push_str(text);
        }
        self.raw_source.push(source.to_string());
    }

    /// Number of source lines attributed to this step and its children.
    pub fn source_line_count(&self) -> usize {
        self.raw_source.len()
            + self
                .sub_steps
                .iter()
                .map(RawStep::source_line_count)
                .sum::<usize>()
    }

    /// Every source line of this step and its children, in document order.
    pub(crate) fn all_sources(&self) -> Vec<String> {
        let mut sources = self.raw_source.clone();
        for child in &self.sub_steps {
            sources.extend(child.all_sources());
        }
        sources
    }
}

/// A canonical workflow step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Start,
    End,
    Action {
        text: String,
        /// Preserved sub-steps in document order, rendered nested under the action.
        details: Vec<Detail>,
    },
    Decision {
        question: String,
        yes_branch: String,
        no_branch: String,
    },
}

impl Step {
    pub(crate) fn action(text: impl Into<String>) -> Self {
        Step::Action {
            text: text.into(),
            details: Vec::new(),
        }
    }

    pub fn kind(&self) -> StepKind {
        match self {
            Step::Start => StepKind::Start,
            Step::End => StepKind::End,
            Step::Action { .. } => StepKind::Step,
            Step::Decision { .. } => StepKind::Decision,
        }
    }

    /// Headline text shown after the step number.
    pub fn text(&self) -> &str {
        match self {
            Step::Start => "Start",
            Step::End => "End",
            Step::Action { text, .. } => text,
            Step::Decision { question, .. } => question,
        }
    }
}

/// A preserved sub-step of an action; depth 1 sits directly under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detail {
    pub depth: usize,
    pub text: String,
}

impl Detail {
    pub(crate) fn new(depth: usize, text: impl Into<String>) -> Self {
        Detail {
            depth,
            text: text.into(),
        }
    }
}

/// A step after decision detection, carrying its source attribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedStep {
    pub step: Step,
    pub sources: Vec<String>,
}

impl DetectedStep {
    pub(crate) fn new(step: Step, sources: Vec<String>) -> Self {
        DetectedStep { step, sources }
    }
}

/// A step with its final position in the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedStep {
    pub number: usize,
    pub step: Step,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Start,
    End,
    Step,
    Decision,
}

impl StepKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StepKind::Start => "start",
            StepKind::End => "end",
            StepKind::Step => "step",
            StepKind::Decision => "decision",
        }
    }
}

/// Structured form of one numbered step, for programmatic consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredStep {
    pub number: usize,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: StepKind,
    /// `[yes, no]` for decisions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branches: Option<[String; 2]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub substeps: Vec<String>,
}

impl From<&NumberedStep> for StructuredStep {
    fn from(numbered: &NumberedStep) -> Self {
        let (branches, substeps) = match &numbered.step {
            Step::Decision {
                yes_branch,
                no_branch,
                ..
            } => (Some([yes_branch.clone(), no_branch.clone()]), Vec::new()),
            Step::Action { details, .. } => (
                None,
                details.iter().map(|detail| detail.text.clone()).collect(),
            ),
            Step::Start | Step::End => (None, Vec::new()),
        };
        StructuredStep {
            number: numbered.number,
            text: numbered.step.text().to_string(),
            kind: numbered.step.kind(),
            branches,
            substeps,
        }
    }
}
