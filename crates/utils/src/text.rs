//! Character-level text helpers.

/// Replace typographic punctuation with the ASCII forms card databases use.
///
/// Card names pasted from web pages often carry curly apostrophes
/// ("Thassa’s Oracle") that the validator does not recognise.
pub fn fold_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' => out.push('"'),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            other => out.push(other),
        }
    }
    out
}
