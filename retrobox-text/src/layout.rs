//! Text layout — wrapping, truncation, and width measurement.
//!
//! Pure functions over [`BitmapFont`] metrics; no pixels are touched
//! here. Paragraphs (text split on `'\n'`) wrap independently and an
//! empty paragraph yields exactly one empty line, so blank lines in the
//! input survive layout.
//!
//! ## Break rules
//!
//! - **Symbol wrapping** appends symbols until the accumulated line
//!   width has exceeded `max_width`; the symbol that observes the
//!   overflow starts the next line. A line therefore always keeps at
//!   least one symbol, and for a `max_width` narrower than a single
//!   symbol layout degenerates to one symbol per line.
//! - **Word wrapping** breaks on spaces; a word wider than `max_width`
//!   on its own is symbol-wrapped, contributing all but its last
//!   fragment as full lines.
//! - **Truncation** collapses newlines to spaces first and cuts at the
//!   last symbol boundary that fits, reserving the ellipsis width up
//!   front in `Ellipsis` mode.

use retrobox_core::Symbol;

use crate::font::BitmapFont;

/// The literal appended by [`Truncation::Ellipsis`]. Three full stops —
/// the bitmap fonts carry no U+2026 glyph.
pub const ELLIPSIS: &str = "...";

/// Line-breaking granularity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// Break anywhere, at symbol boundaries.
    Symbol,
    /// Break at spaces; oversized words fall back to symbol breaks.
    #[default]
    Word,
}

/// Single-line truncation behavior. Any mode other than `None`
/// suppresses wrapping entirely.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Truncation {
    /// Wrap normally.
    #[default]
    None,
    /// One line, cut silently at the last symbol that fits.
    SingleLine,
    /// One line, cut with a trailing `"..."` whose width is reserved.
    Ellipsis,
}

/// Wrap `text` into lines no wider than `max_width` (with the single
/// exception of an individually oversized symbol or word fragment).
///
/// The returned sequence is finite and final; re-wrapping any returned
/// line with the same parameters yields that line unchanged.
pub fn wrap(
    font: &BitmapFont,
    text: &str,
    max_width: i32,
    mode: WrapMode,
    truncation: Truncation,
) -> Vec<String> {
    match truncation {
        Truncation::SingleLine => return vec![truncate(font, text, max_width, false)],
        Truncation::Ellipsis => return vec![truncate(font, text, max_width, true)],
        Truncation::None => {}
    }

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let paragraph = paragraph.strip_suffix('\r').unwrap_or(paragraph);
        if paragraph.is_empty() {
            lines.push(String::new());
            continue;
        }
        match mode {
            WrapMode::Symbol => {
                let symbols = Symbol::split(paragraph);
                for fragment in wrap_symbols(font, &symbols, max_width) {
                    lines.push(join(&fragment));
                }
            }
            WrapMode::Word => wrap_words(font, paragraph, max_width, &mut lines),
        }
    }
    lines
}

/// Collapse newlines to spaces and cut the result to `max_width`.
fn truncate(font: &BitmapFont, text: &str, max_width: i32, ellipsis: bool) -> String {
    let collapsed = text
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ");
    let symbols = Symbol::split(&collapsed);
    if font.measure(&symbols) <= max_width {
        return collapsed;
    }

    let reserved = if ellipsis { font.measure_str(ELLIPSIS) } else { 0 };
    let budget = max_width - reserved;

    let mut kept = Vec::new();
    let mut width = 0;
    for sym in &symbols {
        let advance = if let Some(prev) = kept.last() {
            font.kerning(prev, sym) + font.char_advance(sym)
        } else {
            font.char_advance(sym)
        };
        if width + advance > budget {
            break;
        }
        width += advance;
        kept.push(sym.clone());
    }

    if ellipsis {
        // No trailing space directly before the suffix.
        while kept.last().is_some_and(Symbol::is_space) {
            kept.pop();
        }
    }
    let mut out = join(&kept);
    if ellipsis {
        out.push_str(ELLIPSIS);
    }
    out
}

/// Symbol-granular wrapping. A symbol is placed on the current line
/// unless the line has already overflowed `max_width`, in which case it
/// opens the next line. Every line keeps at least one symbol.
fn wrap_symbols(font: &BitmapFont, symbols: &[Symbol], max_width: i32) -> Vec<Vec<Symbol>> {
    let mut fragments = Vec::new();
    let mut line: Vec<Symbol> = Vec::new();
    let mut width = 0;

    for sym in symbols {
        if !line.is_empty() && width > max_width {
            fragments.push(std::mem::take(&mut line));
            width = 0;
        }
        if let Some(prev) = line.last() {
            width += font.kerning(prev, sym);
        }
        width += font.char_advance(sym);
        line.push(sym.clone());
    }
    if !line.is_empty() {
        fragments.push(line);
    }
    fragments
}

/// Word-granular wrapping of one paragraph, appending to `lines`.
fn wrap_words(font: &BitmapFont, paragraph: &str, max_width: i32, lines: &mut Vec<String>) {
    let mut current = String::new();
    for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if font.measure_str(&candidate) <= max_width {
            current = candidate;
            continue;
        }

        // The word does not fit after `current`.
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if font.measure_str(word) > max_width {
            // Oversized word: symbol-wrap it, all but the last fragment
            // become full lines, the last one stays open for joining.
            let symbols = Symbol::split(word);
            let mut fragments = wrap_symbols(font, &symbols, max_width);
            if let Some(last) = fragments.pop() {
                for fragment in fragments {
                    lines.push(join(&fragment));
                }
                current = join(&last);
            }
        } else {
            current = word.to_string();
        }
    }
    // A paragraph with only spaces still produced no words; keep it as
    // an empty line rather than dropping it.
    lines.push(current);
}

fn join(symbols: &[Symbol]) -> String {
    symbols.iter().map(Symbol::as_str).collect()
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::tests::fixed_font;

    #[test]
    fn test_symbol_wrap_break_rule() {
        // Every glyph advances 10. maxWidth 25: the line absorbs "ABC"
        // (width 30 observed only when "D" arrives), then "DE".
        let font = fixed_font();
        let lines = wrap(&font, "ABCDE", 25, WrapMode::Symbol, Truncation::None);
        assert_eq!(lines, vec!["ABC", "DE"]);
    }

    #[test]
    fn test_symbol_wrap_exact_fit_no_break() {
        let font = fixed_font();
        let lines = wrap(&font, "ABC", 30, WrapMode::Symbol, Truncation::None);
        assert_eq!(lines, vec!["ABC"]);
    }

    #[test]
    fn test_symbol_wrap_degenerate_width_one_symbol_per_line() {
        let font = fixed_font();
        let lines = wrap(&font, "AB", 5, WrapMode::Symbol, Truncation::None);
        assert_eq!(lines, vec!["A", "B"]);
    }

    #[test]
    fn test_symbol_wrap_idempotent() {
        let font = fixed_font();
        let lines = wrap(&font, "ABCDEFGHIJ", 35, WrapMode::Symbol, Truncation::None);
        for line in &lines {
            let again = wrap(&font, line, 35, WrapMode::Symbol, Truncation::None);
            assert_eq!(&again, &vec![line.clone()], "re-wrap changed {line:?}");
        }
    }

    #[test]
    fn test_word_wrap_on_spaces() {
        let font = fixed_font();
        // "The quick" = 90, "brown" = 50.
        let lines = wrap(&font, "The quick brown", 90, WrapMode::Word, Truncation::None);
        assert_eq!(lines, vec!["The quick", "brown"]);
    }

    #[test]
    fn test_word_wrap_single_word_fits() {
        let font = fixed_font();
        let lines = wrap(&font, "hello", 100, WrapMode::Word, Truncation::None);
        assert_eq!(lines, vec!["hello"]);
    }

    #[test]
    fn test_word_wrap_oversized_word_symbol_breaks() {
        let font = fixed_font();
        // 8-symbol word at width 30: symbol rule gives 4+4 per the
        // lenient break (overflow observed one symbol late).
        let lines = wrap(&font, "abcdefgh", 30, WrapMode::Word, Truncation::None);
        assert_eq!(lines, vec!["abcd", "efgh"]);
    }

    #[test]
    fn test_word_wrap_oversized_word_last_fragment_joins_next_word() {
        let font = fixed_font();
        let lines = wrap(&font, "abcdefgh x", 30, WrapMode::Word, Truncation::None);
        // Last fragment "efgh" is already over 30, so "x" opens its own
        // line rather than joining.
        assert_eq!(lines, vec!["abcd", "efgh", "x"]);
    }

    #[test]
    fn test_word_wrap_idempotent() {
        let font = fixed_font();
        let text = "the quick brown fox jumps over the lazy dog";
        let lines = wrap(&font, text, 120, WrapMode::Word, Truncation::None);
        for line in &lines {
            assert!(
                font.measure_str(line) <= 120,
                "line {line:?} exceeds width",
            );
            let again = wrap(&font, line, 120, WrapMode::Word, Truncation::None);
            assert_eq!(&again, &vec![line.clone()]);
        }
    }

    #[test]
    fn test_paragraphs_wrap_independently() {
        let font = fixed_font();
        let lines = wrap(&font, "ab\ncd", 1000, WrapMode::Word, Truncation::None);
        assert_eq!(lines, vec!["ab", "cd"]);
    }

    #[test]
    fn test_empty_paragraph_preserved() {
        let font = fixed_font();
        let lines = wrap(&font, "ab\n\ncd", 1000, WrapMode::Word, Truncation::None);
        assert_eq!(lines, vec!["ab", "", "cd"]);
    }

    #[test]
    fn test_empty_text_single_empty_line() {
        let font = fixed_font();
        let lines = wrap(&font, "", 100, WrapMode::Word, Truncation::None);
        assert_eq!(lines, vec![""]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let font = fixed_font();
        let lines = wrap(&font, "ab\r\ncd", 1000, WrapMode::Word, Truncation::None);
        assert_eq!(lines, vec!["ab", "cd"]);
    }

    #[test]
    fn test_ellipsis_truncation_scenario() {
        let font = fixed_font();
        // "The quick" = 90, "..." = 30. maxWidth fits exactly that.
        let lines = wrap(
            &font,
            "The quick brown fox",
            120,
            WrapMode::Word,
            Truncation::Ellipsis,
        );
        assert_eq!(lines, vec!["The quick..."]);
    }

    #[test]
    fn test_ellipsis_no_cut_when_text_fits() {
        let font = fixed_font();
        let lines = wrap(&font, "short", 1000, WrapMode::Word, Truncation::Ellipsis);
        assert_eq!(lines, vec!["short"]);
    }

    #[test]
    fn test_truncation_collapses_newlines() {
        let font = fixed_font();
        let lines = wrap(&font, "a\nb\r\nc", 1000, WrapMode::Word, Truncation::SingleLine);
        assert_eq!(lines, vec!["a b c"]);
    }

    #[test]
    fn test_single_line_truncation_no_suffix() {
        let font = fixed_font();
        let lines = wrap(&font, "abcdef", 35, WrapMode::Word, Truncation::SingleLine);
        assert_eq!(lines, vec!["abc"]);
    }

    #[test]
    fn test_ellipsis_trims_trailing_space_before_suffix() {
        let font = fixed_font();
        // Budget 35 after the 30px suffix: keeps "ab " and the trim
        // drops the dangling space.
        let lines = wrap(&font, "ab cdef", 65, WrapMode::Word, Truncation::Ellipsis);
        assert_eq!(lines, vec!["ab..."]);
    }

    #[test]
    fn test_ellipsis_budget_smaller_than_ellipsis() {
        let font = fixed_font();
        // Nothing fits next to the ellipsis; the cut keeps just "...".
        let lines = wrap(&font, "abcdef", 30, WrapMode::Word, Truncation::Ellipsis);
        assert_eq!(lines, vec!["..."]);
    }

    #[test]
    fn test_wrap_respects_kerning() {
        let font = fixed_font();
        // "AV" measures 18 thanks to the -2 kern, so it fits in 18.
        let lines = wrap(&font, "AV", 18, WrapMode::Symbol, Truncation::None);
        assert_eq!(lines, vec!["AV"]);
    }

    #[test]
    fn test_whitespace_only_paragraph_becomes_empty_line() {
        let font = fixed_font();
        let lines = wrap(&font, "   ", 100, WrapMode::Word, Truncation::None);
        assert_eq!(lines, vec![""]);
    }
}
