//! Cleanup, terminators and numbering.
//!
//! Numbers are assigned here and nowhere else; the rendered text and the
//! structured form are both derived from the sequence this stage returns.
use super::compile::CompiledVocabulary;
use super::format::render;
use super::model::{Detail, DetectedStep, NumberedStep, Step};
use crate::config::SimplifierConfig;
use crate::util::{capitalize_first, collapse_whitespace, trim_trailing_punctuation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct NormalizedWorkflow {
    pub(super) steps: Vec<NumberedStep>,
    pub(super) rendered: String,
}

pub(super) fn normalize(
    steps: Vec<DetectedStep>,
    vocabulary: &CompiledVocabulary,
    config: &SimplifierConfig,
) -> NormalizedWorkflow {
    let mut cleaned: Vec<DetectedStep> = Vec::with_capacity(steps.len() + 2);
    for detected in steps {
        cleaned.extend(clean_step(detected, vocabulary));
    }
    mark_terminators(&mut cleaned);

    if config.auto_terminators {
        if !matches!(cleaned.first().map(|first| &first.step), Some(Step::Start)) {
            cleaned.insert(0, DetectedStep::new(Step::Start, Vec::new()));
        }
        if !matches!(cleaned.last().map(|last| &last.step), Some(Step::End)) {
            cleaned.push(DetectedStep::new(Step::End, Vec::new()));
        }
    }

    let steps: Vec<NumberedStep> = cleaned
        .into_iter()
        .enumerate()
        .map(|(idx, detected)| NumberedStep {
            number: idx + 1,
            step: detected.step,
            sources: detected.sources,
        })
        .collect();
    let rendered = render(&steps);
    NormalizedWorkflow { steps, rendered }
}

/// Whitespace collapsed, `Then,` style lead-ins and trailing sentence
/// punctuation removed, first letter capitalized.
pub(super) fn clean_text(text: &str, vocabulary: &CompiledVocabulary) -> String {
    let collapsed = collapse_whitespace(text);
    let stripped = vocabulary.strip_indicators(&collapsed, true);
    capitalize_first(trim_trailing_punctuation(stripped))
}

fn clean_step(detected: DetectedStep, vocabulary: &CompiledVocabulary) -> Vec<DetectedStep> {
    let DetectedStep { step, sources } = detected;
    match step {
        Step::Start | Step::End => vec![DetectedStep::new(step, sources)],
        Step::Action { text, details } => {
            let text = clean_text(&text, vocabulary);
            let details = clean_details(&details, vocabulary);
            if !text.is_empty() {
                return vec![DetectedStep::new(Step::Action { text, details }, sources)];
            }
            // Nothing left of the headline; its details stand on their own.
            details
                .into_iter()
                .map(|detail| DetectedStep::new(Step::action(detail.text), Vec::new()))
                .collect()
        }
        Step::Decision {
            question,
            yes_branch,
            no_branch,
        } => {
            let mut question = clean_text(&question, vocabulary);
            if !question.ends_with('?') {
                question.push('?');
            }
            vec![DetectedStep::new(
                Step::Decision {
                    question,
                    yes_branch: clean_text(&yes_branch, vocabulary),
                    no_branch: clean_text(&no_branch, vocabulary),
                },
                sources,
            )]
        }
    }
}

/// Cleaned details with empty ones dropped. A detail never sits more than
/// one level below the detail before it, so dropping a parent lifts its
/// children.
fn clean_details(details: &[Detail], vocabulary: &CompiledVocabulary) -> Vec<Detail> {
    let mut cleaned = Vec::with_capacity(details.len());
    let mut deepest = 1;
    for detail in details {
        let text = clean_text(&detail.text, vocabulary);
        if text.is_empty() {
            continue;
        }
        let depth = detail.depth.clamp(1, deepest);
        deepest = depth + 1;
        cleaned.push(Detail::new(depth, text));
    }
    cleaned
}

/// A leading `Start` or trailing `End` action is the terminator itself.
fn mark_terminators(steps: &mut [DetectedStep]) {
    if let Some(first) = steps.first_mut() {
        if is_bare_action(&first.step, "start") {
            first.step = Step::Start;
        }
    }
    if let Some(last) = steps.last_mut() {
        if is_bare_action(&last.step, "end") {
            last.step = Step::End;
        }
    }
}

fn is_bare_action(step: &Step, word: &str) -> bool {
    matches!(step, Step::Action { text, details } if details.is_empty() && text.eq_ignore_ascii_case(word))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::Vocabulary;

    fn vocab() -> CompiledVocabulary {
        CompiledVocabulary::new(&Vocabulary::default()).expect("compile vocabulary")
    }

    fn actions(texts: &[&str]) -> Vec<DetectedStep> {
        texts
            .iter()
            .map(|text| DetectedStep::new(Step::action(*text), vec![text.to_string()]))
            .collect()
    }

    #[test]
    fn inserts_terminators_and_numbers_steps() {
        let workflow = normalize(
            actions(&["do task A.", "Then, do task B;"]),
            &vocab(),
            &SimplifierConfig::default(),
        );
        assert_eq!(workflow.rendered, "1. Start\n2. Do task A\n3. Do task B\n4. End");
        let numbers: Vec<usize> = workflow.steps.iter().map(|step| step.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn existing_start_and_end_lines_become_terminators() {
        let workflow = normalize(
            actions(&["START", "Load data", "End."]),
            &vocab(),
            &SimplifierConfig::default(),
        );
        assert_eq!(workflow.rendered, "1. Start\n2. Load data\n3. End");
        assert_eq!(workflow.steps[0].sources, vec!["START".to_string()]);
    }

    #[test]
    fn terminators_can_be_left_out() {
        let config = SimplifierConfig {
            auto_terminators: false,
            ..SimplifierConfig::default()
        };
        let workflow = normalize(actions(&["Load data"]), &vocab(), &config);
        assert_eq!(workflow.rendered, "1. Load data");
    }

    #[test]
    fn empty_input_still_gets_terminators() {
        let workflow = normalize(Vec::new(), &vocab(), &SimplifierConfig::default());
        assert_eq!(workflow.rendered, "1. Start\n2. End");
    }

    #[test]
    fn empty_actions_are_dropped() {
        let workflow = normalize(
            actions(&["  ", "...", "Save"]),
            &vocab(),
            &SimplifierConfig::default(),
        );
        assert_eq!(workflow.rendered, "1. Start\n2. Save\n3. End");
    }

    #[test]
    fn decisions_keep_their_question_mark() {
        let steps = vec![DetectedStep::new(
            Step::Decision {
                question: "next, is  it late".to_string(),
                yes_branch: "go to bed.".to_string(),
                no_branch: String::new(),
            },
            Vec::new(),
        )];
        let workflow = normalize(steps, &vocab(), &SimplifierConfig::default());
        assert_eq!(
            workflow.rendered,
            "1. Start\n2. Is it late?\n   - If yes: Go to bed\n   - If no:\n3. End"
        );
    }

    #[test]
    fn dropped_details_lift_their_children() {
        let steps = vec![DetectedStep::new(
            Step::Action {
                text: "Prepare".to_string(),
                details: vec![
                    Detail::new(1, "..."),
                    Detail::new(2, "boil water."),
                    Detail::new(3, "fill the kettle"),
                    Detail::new(1, "toast bread"),
                ],
            },
            Vec::new(),
        )];
        let workflow = normalize(steps, &vocab(), &SimplifierConfig::default());
        assert_eq!(
            workflow.rendered,
            "1. Start\n2. Prepare\n   - Boil water\n      - Fill the kettle\n   - Toast bread\n3. End"
        );
    }

    #[test]
    fn clean_text_leaves_bare_indicators() {
        let vocab = vocab();
        assert_eq!(clean_text("then save the file.", &vocab), "Then save the file");
        assert_eq!(clean_text("Finally,  close   it", &vocab), "Close it");
    }
}
