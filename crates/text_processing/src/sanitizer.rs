//! Text sanitizer for speech synthesis
//!
//! The speech backend rejects or mispronounces many symbols (emoji, markdown
//! markers, math signs). Anything outside the allow-list becomes a space,
//! then whitespace runs collapse to a single space.

use once_cell::sync::Lazy;
use regex::Regex;

/// Characters the synthesizer accepts: ASCII word characters, whitespace,
/// Latin-1 letters, typographic quotes and a few punctuation and currency
/// symbols.
static DISALLOWED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[^0-9A-Za-z_\sÀ-ÿ'«»“”"‘’(),.!?;:\-+@/\&€$%=]"#)
        .expect("sanitizer pattern is valid")
});

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Sanitize text before it is split and synthesized
pub fn sanitize(text: &str) -> String {
    let replaced = DISALLOWED.replace_all(text, " ");
    WHITESPACE.replace_all(&replaced, " ").into_owned()
}
