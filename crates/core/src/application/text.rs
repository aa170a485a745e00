// Report text helpers

use percent_encoding::percent_decode_str;

/// Suffix appended to shortened text
pub const ELLIPSIS: &str = "...";

/// Decode a form-urlencoded string (`+` is a space, `%XX` escapes).
///
/// Invalid UTF-8 sequences are replaced rather than rejected.
pub fn urldecode(text: &str) -> String {
    let spaced = text.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Shorten `text` to roughly `ideal` characters, breaking on a word
/// boundary where one exists and appending `...`.
pub fn shorten_text(text: &str, ideal: usize) -> String {
    if text.chars().count() <= ideal {
        return text.to_string();
    }

    let head: String = text.chars().take(ideal).collect();
    let at_boundary = text
        .chars()
        .nth(ideal)
        .map(char::is_whitespace)
        .unwrap_or(true);

    let cut = if at_boundary {
        head.as_str()
    } else {
        match head.rfind(char::is_whitespace) {
            Some(idx) if idx > 0 => &head[..idx],
            _ => head.as_str(),
        }
    };

    format!("{}{}", cut.trim_end(), ELLIPSIS)
}
