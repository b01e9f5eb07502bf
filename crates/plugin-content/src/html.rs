//! HTML escaping for user-supplied content.

/// Escapes `<`, `>`, and `&`, leaving quotes untouched.
///
/// Output is UTF-8, so non-ASCII characters pass through as is rather than
/// being turned into named entities (`é` stays `é`, not `&eacute;`).
///
/// An `&` that already starts a character reference (`&amp;`, `&#39;`,
/// `&#x27;`) is kept as is, so escaping twice is a no-op.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());

    for (index, ch) in input.char_indices() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' if starts_entity(&input[index..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            other => out.push(other),
        }
    }

    out
}

/// Returns whether `s` (beginning with `&`) starts a character reference.
fn starts_entity(s: &str) -> bool {
    let Some(end) = s.find(';') else {
        return false;
    };
    let body = &s[1..end];

    if let Some(num) = body.strip_prefix('#') {
        return match num.strip_prefix(['x', 'X']) {
            Some(hex) => !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()),
            None => !num.is_empty() && num.chars().all(|c| c.is_ascii_digit()),
        };
    }

    !body.is_empty() && body.len() <= 32 && body.chars().all(|c| c.is_ascii_alphanumeric())
}
