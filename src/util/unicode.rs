//! Width and cursor helpers for terminal text.
//!
//! Offsets are byte offsets into UTF-8 strings; cursor movement snaps to
//! grapheme clusters so combining marks and emoji move as one unit.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells. Tabs count as 4 cells.
pub fn display_width(s: &str) -> usize {
    s.graphemes(true).map(grapheme_width).sum()
}

/// Truncate to at most `max_cells`, ending with `…` when something was cut.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }
    let budget = max_cells - 1;
    let mut used = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        let w = grapheme_width(g);
        if used + w > budget {
            break;
        }
        used += w;
        out.push_str(g);
    }
    out.push('\u{2026}');
    out
}

/// Truncate or right-pad with spaces to exactly `cells` wide.
pub fn fit_to_width(s: &str, cells: usize) -> String {
    let mut out = truncate_to_width(s, cells);
    let w = display_width(&out);
    if w < cells {
        out.push_str(&" ".repeat(cells - w));
    }
    out
}

/// Byte offset of the grapheme after the one at `offset`, or None at the end.
pub fn next_grapheme_boundary(s: &str, offset: usize) -> Option<usize> {
    if offset >= s.len() {
        return None;
    }
    let step = s[offset..].graphemes(true).next().map_or(0, str::len);
    Some(offset + step)
}

/// Byte offset where the grapheme ending at `offset` starts, or None at 0.
pub fn prev_grapheme_boundary(s: &str, offset: usize) -> Option<usize> {
    if offset == 0 {
        return None;
    }
    s[..offset]
        .grapheme_indices(true)
        .next_back()
        .map(|(i, _)| i)
}

/// Display column (cells) of a byte offset.
pub fn byte_offset_to_display_col(s: &str, offset: usize) -> usize {
    display_width(&s[..offset.min(s.len())])
}

/// Byte offset for a display column. A column inside a wide grapheme maps
/// to that grapheme's start; columns past the end map to `s.len()`.
pub fn display_col_to_byte_offset(s: &str, col: usize) -> usize {
    let mut used = 0;
    for (i, g) in s.grapheme_indices(true) {
        let w = grapheme_width(g);
        if used + w > col {
            return i;
        }
        used += w;
    }
    s.len()
}

/// Start of the word left of `offset` (whitespace-delimited).
pub fn word_boundary_left(s: &str, offset: usize) -> usize {
    let graphemes: Vec<(usize, &str)> = s[..offset.min(s.len())].grapheme_indices(true).collect();
    let mut idx = graphemes.len();
    while idx > 0 && is_blank(graphemes[idx - 1].1) {
        idx -= 1;
    }
    while idx > 0 && !is_blank(graphemes[idx - 1].1) {
        idx -= 1;
    }
    graphemes.get(idx).map_or(0, |(i, _)| *i)
}

/// Start of the next word right of `offset` (or the end of `s`).
pub fn word_boundary_right(s: &str, offset: usize) -> usize {
    let start = offset.min(s.len());
    let mut iter = s[start..].grapheme_indices(true).peekable();
    while iter.next_if(|(_, g)| !is_blank(g)).is_some() {}
    while iter.next_if(|(_, g)| is_blank(g)).is_some() {}
    iter.peek().map_or(s.len(), |(i, _)| start + i)
}

fn is_blank(g: &str) -> bool {
    g.chars().all(char::is_whitespace)
}

fn grapheme_width(g: &str) -> usize {
    if g == "\t" { 4 } else { UnicodeWidthStr::width(g) }
}
