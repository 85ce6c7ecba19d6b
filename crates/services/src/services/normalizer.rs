//! Text hygiene applied to decklists before they are sent to Scrollrack.

use utils::text::fold_punctuation;

/// Lines with this prefix record where a list was exported from; they are not cards.
const PROVENANCE_PREFIX: &str = "Imported from ";

/// Rewrite raw decklist text into the shape the validator expects.
///
/// TopDeck stores lists with escaped line breaks, so literal `\r\n` and `\n`
/// sequences are unescaped first (`\r\n` before `\n`, otherwise a stray `\r`
/// would be left behind). Lines are then trimmed, provenance lines dropped and
/// trailing blank lines removed. Blank lines between sections are kept.
///
/// The function is total and idempotent.
pub fn normalize(raw: &str) -> String {
    let unescaped = raw.replace("\\r\\n", "\n").replace("\\n", "\n");
    let folded = fold_punctuation(&unescaped);

    let mut lines: Vec<&str> = folded
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.starts_with(PROVENANCE_PREFIX))
        .collect();

    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}
