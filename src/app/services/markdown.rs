use pulldown_cmark::{Event, Options, Parser, html};

use crate::app::domain::settings::MarkdownSettings;

/// Markdown-to-HTML capability handed to the preview controller.
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, source: &str) -> String;
}

impl<F> MarkdownRenderer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn render(&self, source: &str) -> String {
        self(source)
    }
}

/// Renderer backed by pulldown-cmark.
#[derive(Debug, Clone, Copy, Default)]
pub struct CmarkRenderer {
    settings: MarkdownSettings,
}

impl CmarkRenderer {
    pub fn new(settings: MarkdownSettings) -> Self {
        Self { settings }
    }

    fn options(&self) -> Options {
        let mut options = Options::empty();
        if self.settings.tables {
            options.insert(Options::ENABLE_TABLES);
        }
        if self.settings.strikethrough {
            options.insert(Options::ENABLE_STRIKETHROUGH);
        }
        options
    }
}

impl MarkdownRenderer for CmarkRenderer {
    fn render(&self, source: &str) -> String {
        let allow_raw_html = self.settings.allow_raw_html;
        // Raw HTML is downgraded to text so push_html escapes it
        let parser = Parser::new_ext(source, self.options()).map(move |event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) if !allow_raw_html => Event::Text(raw),
            other => other,
        });

        let mut html_output = String::with_capacity(source.len() * 3 / 2);
        html::push_html(&mut html_output, parser);
        html_output
    }
}
