//! Markdown to HTML rendering with GitHub Flavored Markdown support.

use comrak::Options;

/// Renders markdown to HTML with GitHub Flavored Markdown extensions.
///
/// Used to preview translated descriptions. Raw HTML passes through so the
/// `<cite>`, `<ins>`, `<sup>` and `<sub>` tags emitted by translation keep
/// their meaning.
pub struct MarkdownRenderer<'a> {
    options: Options<'a>,
}

impl<'a> MarkdownRenderer<'a> {
    /// Creates renderer with GitHub Flavored Markdown options.
    ///
    /// Enables tables, strikethrough, autolinks and task lists, and keeps
    /// raw inline HTML.
    pub fn new() -> Self {
        let mut options = Options::default();

        options.extension.strikethrough = true;
        options.extension.table = true;
        options.extension.autolink = true;
        options.extension.tasklist = true;

        // Translation output carries inline HTML tags
        options.render.unsafe_ = true;

        Self { options }
    }

    /// Renders markdown content to HTML string.
    pub fn render(&self, content: &str) -> String {
        comrak::markdown_to_html(content, &self.options)
    }
}

impl Default for MarkdownRenderer<'_> {
    fn default() -> Self {
        Self::new()
    }
}
