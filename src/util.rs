use compact_str::CompactString;
use url::form_urlencoded::byte_serialize;

/// Scraped rows look like `Ubuntu 22.04 » 1.2 GB, 3 seeds`.
pub const MARK: char = '»';

/// Turns `elementary os` into `elementary+os`.
pub fn query_segment(term: &str) -> String {
    term.split_whitespace()
        .map(|word| byte_serialize(word.as_bytes()).collect::<String>())
        .collect::<Vec<_>>()
        .join("+")
}

/// Keeps the part before the first `»` standing between blanks, squeezed
/// onto one line.
///
/// Returns `None` when nothing printable is left.
pub fn trim_title(raw: &str) -> Option<CompactString> {
    let head = separator_at(raw).map_or(raw, |end| &raw[..end]);

    let mut line = CompactString::default();
    for word in head.split_whitespace() {
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }

    if line.is_empty() { None } else { Some(line) }
}

fn separator_at(raw: &str) -> Option<usize> {
    raw.char_indices().find_map(|(i, c)| {
        (c == MARK
            && raw[..i].chars().next_back().is_some_and(char::is_whitespace)
            && raw[i + c.len_utf8()..].chars().next().is_none_or(char::is_whitespace))
        .then_some(i)
    })
}
