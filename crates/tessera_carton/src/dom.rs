//! DOM helpers shared by the lowering pass and the SSR assembler.

use phf::phf_set;

/// HTML void elements. They never have children or a closing tag.
static VOID_TAGS: phf::Set<&'static str> = phf_set! {
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
};

/// Check whether `tag` is an HTML void element (case-insensitive).
#[inline]
pub fn is_void_tag(tag: &str) -> bool {
    if VOID_TAGS.contains(tag) {
        return true;
    }
    tag.bytes().any(|b| b.is_ascii_uppercase()) && VOID_TAGS.contains(&*tag.to_ascii_lowercase())
}

/// Escape HTML special characters in text content and attribute values.
pub fn escape_html(s: &str) -> std::string::String {
    let mut result = std::string::String::with_capacity(s.len());
    escape_html_into(&mut result, s);
    result
}

/// Escape `s` and append it to `out`.
pub fn escape_html_into(out: &mut std::string::String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}
