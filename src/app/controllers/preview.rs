use std::sync::Arc;

use crate::app::domain::settings::WidgetSettings;
use crate::app::infrastructure::dom::{Page, Selector};
use crate::app::services::markdown::MarkdownRenderer;

/// Keeps every markdown editor's preview pane in sync with its text.
pub struct PreviewController {
    renderer: Arc<dyn MarkdownRenderer>,
    editor_class: String,
    preview_suffix: String,
}

impl PreviewController {
    pub fn new(renderer: Arc<dyn MarkdownRenderer>, settings: &WidgetSettings) -> Self {
        Self {
            renderer,
            editor_class: settings.editor_class.clone(),
            preview_suffix: settings.preview_suffix.clone(),
        }
    }

    pub fn is_editor(&self, page: &Page, id: &str) -> bool {
        page.get(id).is_some_and(|e| e.has_class(&self.editor_class))
    }

    /// Render every editor on the page once. Returns how many were rendered.
    pub fn init(&self, page: &mut Page) -> usize {
        let editors = page.select(&Selector::Class(self.editor_class.clone()));
        for id in &editors {
            self.update(page, id);
        }
        tracing::debug!(editors = editors.len(), "markdown previews initialised");
        editors.len()
    }

    /// Re-render one editor into its `<id>-preview` pane.
    ///
    /// Exactly one render per call. A missing editor or pane leaves the page
    /// untouched.
    pub fn update(&self, page: &mut Page, editor_id: &str) {
        let Some(source) = page.get(editor_id).map(|e| e.value.clone()) else {
            return;
        };
        let html = self.renderer.render(&source);

        let preview_id = format!("{}{}", editor_id, self.preview_suffix);
        if !page.update(&preview_id, |pane| pane.inner_html = html) {
            tracing::trace!(editor = editor_id, "no preview pane for editor");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::app::infrastructure::dom::Element;
    use crate::app::services::markdown::CmarkRenderer;
    use crate::app::services::markup::markdown_editor;

    /// Counts calls so tests can assert one render per event.
    #[derive(Default)]
    struct CountingRenderer {
        calls: AtomicUsize,
    }

    impl MarkdownRenderer for CountingRenderer {
        fn render(&self, source: &str) -> String {
            self.calls.fetch_add(1, Ordering::SeqCst);
            CmarkRenderer::default().render(source)
        }
    }

    fn page_with_editors(settings: &WidgetSettings) -> Page {
        let mut page = Page::default();
        page.extend(markdown_editor("post-body", "*draft*", settings));
        page.extend(markdown_editor("comment-text", "", settings));
        page.push(Element::new("textarea", "plain").with_value("# not markdown"));
        page
    }

    #[test]
    fn test_init_renders_every_editor() {
        let settings = WidgetSettings::default();
        let renderer = Arc::new(CountingRenderer::default());
        let controller = PreviewController::new(renderer.clone(), &settings);
        let mut page = page_with_editors(&settings);

        assert_eq!(controller.init(&mut page), 2);
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 2);
        assert_eq!(page.get("post-body-preview").unwrap().inner_html, "<p><em>draft</em></p>\n");
        assert_eq!(page.get("comment-text-preview").unwrap().inner_html, "");
    }

    #[test]
    fn test_update_renders_once_per_call() {
        let settings = WidgetSettings::default();
        let renderer = Arc::new(CountingRenderer::default());
        let controller = PreviewController::new(renderer.clone(), &settings);
        let mut page = page_with_editors(&settings);

        page.update("post-body", |e| e.value = "# Hi".to_string());
        controller.update(&mut page, "post-body");

        assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            page.get("post-body-preview").unwrap().inner_html,
            CmarkRenderer::default().render("# Hi")
        );
    }

    #[test]
    fn test_update_missing_preview_is_noop() {
        let settings = WidgetSettings::default();
        let controller = PreviewController::new(Arc::new(CmarkRenderer::default()), &settings);
        let mut page = Page::new(vec![Element::new("textarea", "lonely").with_class("markdown-editor")]);
        let before = page.clone();
        controller.update(&mut page, "lonely");
        controller.update(&mut page, "does-not-exist");
        assert_eq!(page, before);
    }

    #[test]
    fn test_is_editor() {
        let settings = WidgetSettings::default();
        let controller = PreviewController::new(Arc::new(CmarkRenderer::default()), &settings);
        let page = page_with_editors(&settings);
        assert!(controller.is_editor(&page, "post-body"));
        assert!(!controller.is_editor(&page, "plain"));
        assert!(!controller.is_editor(&page, "missing"));
    }

    #[test]
    fn test_injected_closure_renderer() {
        let settings = WidgetSettings::default();
        let controller = PreviewController::new(Arc::new(|s: &str| format!("<pre>{}</pre>", s)), &settings);
        let mut page = page_with_editors(&settings);
        controller.init(&mut page);
        assert_eq!(page.get("post-body-preview").unwrap().inner_html, "<pre>*draft*</pre>");
    }
}
