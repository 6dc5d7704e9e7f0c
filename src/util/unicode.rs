use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Marker appended to text cut by `truncate_graphemes`
pub const ELLIPSIS: &str = "...";

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

/// Number of user-perceived characters (grapheme clusters)
pub fn grapheme_count(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Cut `s` to `max_len - 3` grapheme clusters plus `...` if it has more than
/// `max_len` clusters. Shorter text is returned unchanged.
pub fn truncate_graphemes(s: &str, max_len: usize) -> String {
    if grapheme_count(s) <= max_len {
        return s.to_string();
    }
    let keep = max_len.saturating_sub(ELLIPSIS.len());
    let mut result: String = s.graphemes(true).take(keep).collect();
    result.push_str(ELLIPSIS);
    result
}

/// Pad `s` with spaces on the right to `width` display cells.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let w = display_width(s);
    let mut out = s.to_string();
    if w < width {
        out.push_str(&" ".repeat(width - w));
    }
    out
}
