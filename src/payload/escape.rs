//! Character escaping for the textual QR payload formats.

/// Escape a field for the `WIFI:` config string: every occurrence of
/// `\`, `;`, `,`, `:`, `"` gains a single backslash prefix. Nothing else
/// is altered.
#[must_use]
pub fn escape_wifi_field(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        match c {
            '\\' | ';' | ',' | ':' | '"' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode a `mailto:` query component (subject).
#[must_use]
pub fn encode_mailto_component(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Percent-encode a `mailto:` body. Newlines become the literal
/// three-character sequence `%0A` first; the rest is percent-encoded.
#[must_use]
pub fn encode_mailto_body(s: &str) -> String {
    s.split('\n')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("%0A")
}
