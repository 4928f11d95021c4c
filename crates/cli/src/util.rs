use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Shorten `s` to at most `width` display columns, marking the cut with "..".
pub(crate) fn truncate_display(s: &str, width: usize) -> String {
    if UnicodeWidthStr::width(s) <= width {
        return s.to_string();
    }
    let budget = width.saturating_sub(2);
    let mut used = 0;
    let mut out = String::new();
    for ch in s.chars() {
        let cw = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + cw > budget {
            break;
        }
        used += cw;
        out.push(ch);
    }
    if width >= 2 {
        out.push_str("..");
    }
    out
}

/// Pad or truncate to exactly `width` display columns.
pub(crate) fn pad_right(s: &str, width: usize) -> String {
    let cut = truncate_display(s, width);
    let used = UnicodeWidthStr::width(cut.as_str());
    format!("{}{}", cut, " ".repeat(width.saturating_sub(used)))
}
