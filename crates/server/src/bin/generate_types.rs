//! Print TypeScript declarations for the JSON shapes the front-end consumes.
//!
//! Usage: `cargo run -p server --bin generate_types [OUT_FILE]`

use server::error::ErrorResponse;
use services::services::{decklist_parser::ParsedCard, scrollrack::ValidationResult};
use ts_rs::TS;

fn main() -> anyhow::Result<()> {
    let decls = [
        ValidationResult::decl(),
        ErrorResponse::decl(),
        ParsedCard::decl(),
    ];

    let mut out = String::from("// Generated by `generate_types`. Do not edit.\n\n");
    for decl in decls {
        out.push_str("export ");
        out.push_str(&decl);
        out.push_str("\n\n");
    }

    match std::env::args().nth(1) {
        Some(path) => std::fs::write(&path, out)?,
        None => print!("{out}"),
    }
    Ok(())
}
