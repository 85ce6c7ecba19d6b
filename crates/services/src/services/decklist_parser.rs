//! Parser for Moxfield-style plaintext decklists ("1 Sol Ring", "1x Sol Ring").

use std::{collections::HashSet, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

const MAX_QUANTITY: u32 = 100;

static CARD_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+)\s*x?\s+(.+?)(?:\s+\([A-Z0-9]+\).*)?$").expect("card line pattern")
});
static FOIL_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\*F\*\s*$").expect("foil marker pattern"));
static COLLECTOR_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*#\d+\s*$").expect("collector number pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct ParsedCard {
    pub name: String,
    pub quantity: u32,
}

/// Parse a single line, or `None` for blanks, comments and non-card text.
fn parse_card_line(line: &str) -> Option<ParsedCard> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with("//") || trimmed.starts_with('#') {
        return None;
    }

    let caps = CARD_LINE.captures(trimmed)?;
    let quantity: u32 = caps[1].parse().ok()?;
    let name = FOIL_MARKER.replace(caps[2].trim(), "");
    let name = COLLECTOR_NUMBER.replace(&name, "").trim().to_string();

    if quantity == 0 || quantity > MAX_QUANTITY || name.is_empty() {
        return None;
    }

    Some(ParsedCard { name, quantity })
}

/// Parse every recognisable card line. Set codes in parentheses are dropped.
pub fn parse_decklist(decklist: &str) -> Vec<ParsedCard> {
    decklist.lines().filter_map(parse_card_line).collect()
}

/// Unique card names in first-seen order.
pub fn card_names(cards: &[ParsedCard]) -> Vec<String> {
    let mut seen = HashSet::new();
    cards
        .iter()
        .filter(|card| seen.insert(card.name.as_str()))
        .map(|card| card.name.clone())
        .collect()
}

pub fn total_cards(cards: &[ParsedCard]) -> u32 {
    cards.iter().map(|card| card.quantity).sum()
}

pub fn format_decklist(cards: &[ParsedCard]) -> String {
    cards
        .iter()
        .map(|card| format!("{} {}", card.quantity, card.name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Convert a plaintext list into the sectioned layout Scrollrack expects.
///
/// `commander` may name two partners separated by `" / "`.
pub fn prepare_for_validation(decklist: &str, commander: &str) -> String {
    let mut lines = vec!["~~Commanders~~".to_string()];
    lines.extend(
        commander
            .split(" / ")
            .map(|name| format!("1 {}", name.trim())),
    );
    lines.push(String::new());
    lines.push("~~Mainboard~~".to_string());

    let cards = parse_decklist(decklist);
    if !cards.is_empty() {
        lines.push(format_decklist(&cards));
    }

    lines.join("\n")
}
