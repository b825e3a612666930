// src/util/text.rs

/// First non-empty line of `content`, trimmed and cut to `max_chars`.
///
/// An ellipsis is appended when the content continues past what is shown.
///
/// # Examples
///
/// ```
/// use notekeep::util::text::preview;
///
/// assert_eq!(preview("Milk, eggs\nBread", 80), "Milk, eggs …");
/// assert_eq!(preview("Short", 80), "Short");
/// ```
pub fn preview(content: &str, max_chars: usize) -> String {
    let mut lines = content.lines().map(str::trim).filter(|l| !l.is_empty());
    let first = lines.next().unwrap_or("");
    let more_lines = lines.next().is_some();

    let shown: String = first.chars().take(max_chars).collect();
    let truncated = first.chars().count() > max_chars;

    if truncated {
        format!("{}…", shown.trim_end())
    } else if more_lines {
        format!("{shown} …")
    } else {
        shown
    }
}

/// `"1 note"` / `"3 notes"`
pub fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
