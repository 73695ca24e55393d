//! Escaping and tag-building helpers shared by the widget renderers.
//!
//! Molecule text ends up in two hostile contexts: HTML attribute values
//! (the hidden input's `value`) and double-quoted JavaScript string
//! literals (inline-seeded viewers). Each needs its own escaping.

/// Escape a string for use inside a double-quoted HTML attribute value.
#[must_use]
pub fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a string for use inside a double-quoted JavaScript string literal.
///
/// Backslash and double quote are escaped, newlines become `\n` and
/// carriage returns are dropped so the literal stays on one line and can
/// never terminate the enclosing `<script>` string early.
#[must_use]
pub fn escape_js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Build a `<script src=...>` tag for an already-resolved URL.
#[must_use]
pub fn script_src_tag(url: &str) -> String {
    format!(
        "<script type=\"text/javascript\" src=\"{}\"></script>",
        escape_attr(url)
    )
}

/// Build a stylesheet `<link>` tag for an already-resolved URL.
#[must_use]
pub fn css_link_tag(url: &str) -> String {
    format!(
        "<link rel=\"stylesheet\" type=\"text/css\" href=\"{}\" />",
        escape_attr(url)
    )
}

/// Wrap inline JavaScript in a `<script>` tag.
#[must_use]
pub fn inline_script_tag(body: &str) -> String {
    format!("<script type=\"text/javascript\">{body}</script>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attr_escaping_covers_markup_characters() {
        assert_eq!(
            escape_attr("a<b>&\"c\""),
            "a&lt;b&gt;&amp;&quot;c&quot;"
        );
        assert_eq!(escape_attr("plain"), "plain");
    }

    #[test]
    fn js_escaping_neutralizes_quotes_and_line_breaks() {
        let escaped = escape_js_string("line1\r\nC\\H \"quoted\"");
        assert_eq!(escaped, "line1\\nC\\\\H \\\"quoted\\\"");
    }

    /// No interpolated segment may contain an unescaped double quote.
    #[test]
    fn js_escaping_leaves_no_bare_double_quote() {
        let nasty = "\"\\\"\r\n\\\\\"mol\"";
        let escaped = escape_js_string(nasty);
        let mut bare_quotes = 0;
        let mut prev_backslashes = 0;
        for c in escaped.chars() {
            if c == '"' && prev_backslashes % 2 == 0 {
                bare_quotes += 1;
            }
            if c == '\\' {
                prev_backslashes += 1;
            } else {
                prev_backslashes = 0;
            }
        }
        assert_eq!(bare_quotes, 0);
    }

    #[test]
    fn tags_escape_their_urls() {
        let tag = script_src_tag("https://a/b?x=1&y=\"2\"");
        assert!(tag.contains("&amp;"));
        assert!(tag.contains("&quot;2&quot;"));
        assert!(tag.starts_with("<script"));
        assert!(css_link_tag("/main.css").contains("href=\"/main.css\""));
    }
}
