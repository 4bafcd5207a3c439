//! CLI command: `vaakku languages`

use vaakku_core::languages::{AUTO_DETECT, DEFAULT_SPEAKER, LANGUAGES, SPEAKERS};

/// Print the language and voice catalog.
pub fn run() {
    println!();
    println!("  {:<8} {:<12} Native", "Code", "Language");
    println!("  {}", "-".repeat(36));
    for lang in LANGUAGES {
        println!("  {:<8} {:<12} {}", lang.code, lang.label, lang.native);
    }
    println!("  {:<8} {:<12}", AUTO_DETECT, "(detect, translation source only)");
    println!();
    println!("  Voices (default {}):", DEFAULT_SPEAKER);
    for chunk in SPEAKERS.chunks(8) {
        println!("    {}", chunk.join(", "));
    }
    println!();
}
