use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells. Tabs count as 4 cells.
pub fn display_width(s: &str) -> usize {
    s.split('\t')
        .enumerate()
        .map(|(i, part)| {
            let w = UnicodeWidthStr::width(part);
            if i > 0 { w + 4 } else { w }
        })
        .sum()
}

/// Widest line of a possibly multi-line string
pub fn max_line_width(s: &str) -> usize {
    s.lines().map(display_width).max().unwrap_or(0)
}

/// Cut `s` down to `max_cells` terminal cells, ending in `…` when anything
/// was dropped. Never splits a grapheme.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }
    let budget = max_cells - 1;
    let mut used = 0;
    let mut out: String = s
        .graphemes(true)
        .take_while(|g| {
            used += grapheme_display_width(g);
            used <= budget
        })
        .collect();
    out.push('\u{2026}');
    out
}

/// Pad with trailing spaces to exactly `cells` wide. Wider strings are
/// returned unchanged.
pub fn pad_to_width(s: &str, cells: usize) -> String {
    let w = display_width(s);
    let mut out = s.to_string();
    out.extend(std::iter::repeat_n(' ', cells.saturating_sub(w)));
    out
}

/// Pad with leading spaces to `cells` wide (right alignment)
pub fn pad_left_to_width(s: &str, cells: usize) -> String {
    let w = display_width(s);
    let mut out: String = std::iter::repeat_n(' ', cells.saturating_sub(w)).collect();
    out.push_str(s);
    out
}

/// Byte offset just past the grapheme starting at `byte_offset`, None at the end
pub fn next_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    s.get(byte_offset..)?
        .graphemes(true)
        .next()
        .map(|g| byte_offset + g.len())
}

/// Byte offset of the grapheme ending at `byte_offset`, None at the start
pub fn prev_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    s.get(..byte_offset)?
        .grapheme_indices(true)
        .next_back()
        .map(|(i, _)| i)
}

fn is_blank(g: &str) -> bool {
    g.chars().all(char::is_whitespace)
}

/// Start of the word left of `byte_offset`, skipping blanks first
pub fn word_boundary_left(s: &str, byte_offset: usize) -> usize {
    let byte_offset = byte_offset.min(s.len());
    let mut boundary = byte_offset;
    let mut graphemes = s[..byte_offset].grapheme_indices(true).rev().peekable();
    while let Some((i, _)) = graphemes.next_if(|(_, g)| is_blank(g)) {
        boundary = i;
    }
    while let Some((i, _)) = graphemes.next_if(|(_, g)| !is_blank(g)) {
        boundary = i;
    }
    boundary
}

/// Start of the next word right of `byte_offset`, or the end of `s`
pub fn word_boundary_right(s: &str, byte_offset: usize) -> usize {
    let byte_offset = byte_offset.min(s.len());
    let mut graphemes = s[byte_offset..].grapheme_indices(true).peekable();
    while graphemes.next_if(|(_, g)| !is_blank(g)).is_some() {}
    while graphemes.next_if(|(_, g)| is_blank(g)).is_some() {}
    graphemes.peek().map_or(s.len(), |(i, _)| byte_offset + i)
}

fn grapheme_display_width(g: &str) -> usize {
    if g == "\t" {
        return 4;
    }
    UnicodeWidthStr::width(g)
}
