//! Field name normalization

/// Map an arbitrary tag or attribute identifier to a canonical field name.
///
/// Underscores are inserted at acronym boundaries (`HTMLParser` →
/// `html_parser`) and camelCase boundaries (`mobilePhone` → `mobile_phone`),
/// dashes become underscores, and the result is lowercased. Total and
/// idempotent; empty input stays empty.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    let mut prev: Option<char> = None;
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '-' {
            out.push('_');
            prev = Some(c);
            continue;
        }

        if c.is_ascii_uppercase() {
            if let Some(p) = prev {
                if p.is_ascii_lowercase() || p.is_ascii_digit() {
                    // camelCase boundary
                    out.push('_');
                } else if p.is_ascii_uppercase()
                    && chars.peek().is_some_and(char::is_ascii_lowercase)
                {
                    // acronym boundary: uppercase run followed by Capital+lowercase
                    out.push('_');
                }
            }
        }

        out.extend(c.to_lowercase());
        prev = Some(c);
    }

    out
}
