//! Page regions that receive flushed resource tags.
//!
//! A [`Page`] stands in for whatever template the host assembles: it
//! collects tags destined for the document `<head>` and for the top of
//! `<body>`, and hands them back as HTML fragments for the host to splice
//! into its layout. Insertion order is preserved within a region, but no
//! load-order guarantee is made among top-of-body resources.

/// Tag sink for one server-rendered page.
#[derive(Debug, Default)]
pub struct Page {
    head: Vec<String>,
    body_top: Vec<String>,
}

impl Page {
    /// Create an empty page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tag to the document head region.
    pub fn insert_head(&mut self, tag: String) {
        self.head.push(tag);
    }

    /// Append a tag to the top-of-body region.
    pub fn insert_body_top(&mut self, tag: String) {
        self.body_top.push(tag);
    }

    /// Tags collected for the head region.
    #[must_use]
    pub fn head_tags(&self) -> &[String] {
        &self.head
    }

    /// Tags collected for the top-of-body region.
    #[must_use]
    pub fn body_top_tags(&self) -> &[String] {
        &self.body_top
    }

    /// The head region joined into one HTML fragment.
    #[must_use]
    pub fn head_html(&self) -> String {
        self.head.join("\n")
    }

    /// The top-of-body region joined into one HTML fragment.
    #[must_use]
    pub fn body_top_html(&self) -> String {
        self.body_top.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regions_keep_insertion_order() {
        let mut page = Page::new();
        page.insert_head("<a/>".to_owned());
        page.insert_head("<b/>".to_owned());
        page.insert_body_top("<c/>".to_owned());

        assert_eq!(page.head_tags(), ["<a/>", "<b/>"]);
        assert_eq!(page.head_html(), "<a/>\n<b/>");
        assert_eq!(page.body_top_html(), "<c/>");
    }
}
