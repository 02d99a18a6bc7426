//! Sentence splitting for speech synthesis
//!
//! Sentences end on runs of `!`, `?` or `;`, or on runs of `.`, `-` or `:`
//! followed by a space or the end of the text. The second class needs the
//! trailing space so decimals (`3.5`), dotted abbreviations (`e.g`) and
//! hyphenated words stay inside their sentence.

use once_cell::sync::Lazy;
use regex::{Matches, Regex};

static SENTENCE_PUNCTUATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[!?;]+|[.\-:]+(?:$| )").expect("sentence pattern is valid")
});

/// A sentence with its punctuation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceUnit {
    /// Trimmed sentence text, terminal punctuation included
    pub text: String,
    /// Length in characters of the sentence in the source text, before trimming
    pub original_len: usize,
}

impl SentenceUnit {
    /// Length in characters of the trimmed text
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Lazy iterator over the sentences of a text
pub struct Sentences<'a> {
    text: &'a str,
    matches: Matches<'static, 'a>,
    cursor: usize,
    include_last: bool,
    finished: bool,
}

impl<'a> Iterator for Sentences<'a> {
    type Item = SentenceUnit;

    fn next(&mut self) -> Option<SentenceUnit> {
        if self.finished {
            return None;
        }

        for punctuation in self.matches.by_ref() {
            let segment = &self.text[self.cursor..punctuation.start()];
            self.cursor = punctuation.end();

            // Punctuation without words before it is dropped with the gap
            if segment.trim().is_empty() {
                continue;
            }

            let punctuation = punctuation.as_str();
            return Some(SentenceUnit {
                text: format!("{}{}", segment.trim(), punctuation.trim()),
                original_len: segment.chars().count() + punctuation.chars().count(),
            });
        }

        self.finished = true;
        let last = &self.text[self.cursor..];
        if self.include_last && !last.trim().is_empty() {
            return Some(SentenceUnit {
                text: last.trim().to_string(),
                original_len: last.chars().count(),
            });
        }
        None
    }
}

/// Split text into sentences
///
/// Whitespace around sentences is dropped, punctuation is kept as written.
/// The trailing fragment without terminal punctuation is only yielded when
/// `include_last` is set.
///
/// # Example
///
/// ```
/// use voicebot_text_processing::split_sentences;
///
/// let sentences: Vec<_> = split_sentences("Hello, world! How are you?", true)
///     .map(|s| s.text)
///     .collect();
/// assert_eq!(sentences, vec!["Hello, world!", "How are you?"]);
/// ```
pub fn split_sentences(text: &str, include_last: bool) -> Sentences<'_> {
    Sentences {
        text,
        matches: SENTENCE_PUNCTUATION.find_iter(text),
        cursor: 0,
        include_last,
        finished: false,
    }
}
