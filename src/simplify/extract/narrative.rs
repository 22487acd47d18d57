use super::super::compile::CompiledVocabulary;
use super::super::model::RawStep;
use super::super::sentences::split_sentences;
use crate::config::SimplifierConfig;

const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Split prose into steps at sentences that open with a sequential indicator
/// or an imperative verb; other sentences extend the step before them.
pub(super) fn extract_narrative(
    lines: &[&str],
    vocabulary: &CompiledVocabulary,
    config: &SimplifierConfig,
) -> Vec<RawStep> {
    let mut steps = Vec::new();
    for paragraph in paragraphs(lines) {
        if config.merge_multiline {
            steps.extend(split_unit(&paragraph, vocabulary));
        } else {
            for line in paragraph {
                steps.extend(split_unit(&[line], vocabulary));
            }
        }
    }
    steps
}

/// Runs of non-blank lines.
fn paragraphs<'a>(lines: &[&'a str]) -> Vec<Vec<&'a str>> {
    let mut paragraphs = Vec::new();
    let mut current = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else {
            current.push(*line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }
    paragraphs
}

/// Split one block of lines joined into a single text.
fn split_unit(lines: &[&str], vocabulary: &CompiledVocabulary) -> Vec<RawStep> {
    let mut joined = String::new();
    let mut line_starts = Vec::with_capacity(lines.len());
    for line in lines {
        if !joined.is_empty() {
            joined.push(' ');
        }
        line_starts.push(joined.len());
        joined.push_str(line.trim());
    }

    let sentences = split_sentences(&joined, &SENTENCE_TERMINATORS, vocabulary);
    let mut steps: Vec<RawStep> = Vec::new();
    // Step index for each sentence.
    let mut owner = Vec::with_capacity(sentences.len());
    for sentence in &sentences {
        let opens_step = steps.is_empty()
            || vocabulary.starts_with_indicator(sentence.text)
            || vocabulary.starts_with_action_verb(sentence.text);
        if opens_step {
            let mut step = RawStep::unfilled();
            step.text = vocabulary.strip_indicators(sentence.text, false).to_string();
            steps.push(step);
        } else if let Some(last) = steps.last_mut() {
            last.text.push(' ');
            last.text.push_str(sentence.text);
        }
        owner.push(steps.len() - 1);
    }

    for (line, start) in lines.iter().zip(line_starts) {
        let covering = sentences
            .iter()
            .rposition(|sentence| sentence.start <= start)
            .unwrap_or(0);
        if let Some(step) = owner.get(covering).and_then(|idx| steps.get_mut(*idx)) {
            step.raw_source.push(line.trim_end().to_string());
        }
    }
    steps
}
