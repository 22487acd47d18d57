use super::compile::CompiledVocabulary;

/// A sentence and the byte offset where it starts in the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Sentence<'a> {
    pub(super) start: usize,
    pub(super) text: &'a str,
}

/// Split text at sentence terminators followed by whitespace or the end.
///
/// Terminators stay attached to their sentence so a trailing `?` survives.
/// A period ending a known abbreviation does not split.
pub(super) fn split_sentences<'a>(
    text: &'a str,
    terminators: &[char],
    vocabulary: &CompiledVocabulary,
) -> Vec<Sentence<'a>> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        if !terminators.contains(&ch) {
            continue;
        }
        let at_boundary = match chars.peek() {
            Some((_, next)) => next.is_whitespace(),
            None => true,
        };
        if !at_boundary {
            continue;
        }
        let end = idx + ch.len_utf8();
        if ch == '.' && ends_with_abbreviation(&text[start..end], vocabulary) {
            continue;
        }
        push_trimmed(&mut sentences, text, start, end);
        start = end;
    }
    push_trimmed(&mut sentences, text, start, text.len());
    sentences
}

fn ends_with_abbreviation(segment: &str, vocabulary: &CompiledVocabulary) -> bool {
    segment
        .split_whitespace()
        .last()
        .is_some_and(|word| vocabulary.is_abbreviation(word))
}

fn push_trimmed<'a>(sentences: &mut Vec<Sentence<'a>>, text: &'a str, start: usize, end: usize) {
    let slice = &text[start..end];
    let trimmed = slice.trim_start();
    let offset = start + (slice.len() - trimmed.len());
    let trimmed = trimmed.trim_end();
    if !trimmed.is_empty() {
        sentences.push(Sentence {
            start: offset,
            text: trimmed,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::Vocabulary;

    fn vocab() -> CompiledVocabulary {
        CompiledVocabulary::new(&Vocabulary::default()).expect("compile vocabulary")
    }

    fn texts<'a>(sentences: &[Sentence<'a>]) -> Vec<&'a str> {
        sentences.iter().map(|s| s.text).collect()
    }

    #[test]
    fn keeps_terminators_and_offsets() {
        let text = "Open it. Is it on? Yes!";
        let sentences = split_sentences(text, &['.', '!', '?'], &vocab());
        assert_eq!(texts(&sentences), vec!["Open it.", "Is it on?", "Yes!"]);
        assert_eq!(sentences[1].start, 9);
    }

    #[test]
    fn ignores_decimals_and_abbreviations() {
        let text = "Set the value to 3.5 units, e.g. via the dial. Save.";
        let sentences = split_sentences(text, &['.', '!', '?'], &vocab());
        assert_eq!(
            texts(&sentences),
            vec!["Set the value to 3.5 units, e.g. via the dial.", "Save."]
        );
    }

    #[test]
    fn semicolons_split_when_requested() {
        let text = "If successful, continue; if not, show error";
        let clauses = split_sentences(text, &['.', '!', '?', ';'], &vocab());
        assert_eq!(
            texts(&clauses),
            vec!["If successful, continue;", "if not, show error"]
        );
    }
}
