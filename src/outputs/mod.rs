//! Locally rendered digests.
//!
//! # Submodules
//!
//! - [`fallback`]: deterministic digest used when the completion API fails
//!
//! Digests are plain text for a chat client: no Markdown, numbered emoji
//! glyphs, `【】` for emphasis and one labelled line per field.

pub mod fallback;

/// Divider placed between the item list and the footer.
pub const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━";

/// Glyphs for the first five items.
const NUMBER_GLYPHS: [&str; 5] = ["1️⃣", "2️⃣", "3️⃣", "4️⃣", "5️⃣"];

/// Keycap glyph for the zero-based item `index`.
///
/// Items past the fifth get the digits followed by the keycap combining
/// sequence, which most clients render as plain digits.
pub fn number_glyph(index: usize) -> String {
    match NUMBER_GLYPHS.get(index) {
        Some(glyph) => (*glyph).to_string(),
        None => format!("{}\u{fe0f}\u{20e3}", index + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_glyph() {
        assert_eq!(number_glyph(0), "1️⃣");
        assert_eq!(number_glyph(4), "5️⃣");
        assert_eq!(number_glyph(5), "6\u{fe0f}\u{20e3}");
        assert_eq!(number_glyph(11), "12\u{fe0f}\u{20e3}");
    }
}
