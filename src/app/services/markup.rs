//! Server-side markup for the widgets: the elements a comment page renders
//! before any controller touches it.

use crate::app::domain::settings::WidgetSettings;
use crate::app::domain::vote::{CommentVotes, VoteKind};
use crate::app::infrastructure::dom::Element;
use crate::app::services::compact::intcompact;

pub fn votes_element_id(comment_id: &str) -> String {
    format!("comment-{}-votes", comment_id)
}

pub fn icon_element_id(comment_id: &str, kind: VoteKind) -> String {
    format!("{}-icon-{}", comment_id, kind.wire_code())
}

pub fn preview_element_id(editor_id: &str, settings: &WidgetSettings) -> String {
    format!("{}{}", editor_id, settings.preview_suffix)
}

/// A markdown textarea and its empty preview pane.
pub fn markdown_editor(editor_id: &str, text: &str, settings: &WidgetSettings) -> Vec<Element> {
    vec![
        Element::new("textarea", editor_id)
            .with_class(&settings.editor_class)
            .with_attr("name", editor_id)
            .with_value(text),
        Element::new("div", &preview_element_id(editor_id, settings)).with_class("markdown-preview"),
    ]
}

/// Class (without the leading dot) from a `.class` selector setting.
fn selector_class(selector: &str) -> &str {
    selector.strip_prefix('.').unwrap_or(selector)
}

/// Upvote/downvote forms, icons and count for one comment.
///
/// `vote_url` is the action both forms post to; `csrf_token` lands in a
/// hidden input inside each form.
pub fn comment_vote_controls(
    comment: &CommentVotes,
    vote_url: &str,
    csrf_token: &str,
    settings: &WidgetSettings,
) -> Vec<Element> {
    let icons = &settings.icons;
    let id = comment.id.as_str();
    let mut elements = Vec::with_capacity(7);

    for kind in [VoteKind::Up, VoteKind::Down] {
        let (form_selector, icon_class) = match kind {
            VoteKind::Up => (
                &settings.upvote_form_selector,
                if comment.upvoted() { &icons.up_filled } else { &icons.up_outline },
            ),
            VoteKind::Down => (
                &settings.downvote_form_selector,
                if comment.downvoted() { &icons.down_filled } else { &icons.down_outline },
            ),
        };
        let form_id = format!("comment-{}-{}-form", id, kind.wire_code());

        elements.push(
            Element::new("form", &form_id)
                .with_class(selector_class(form_selector))
                .with_attr("method", "post")
                .with_attr("action", vote_url)
                .with_data("id", id),
        );
        elements.push(
            Element::new("input", &format!("{}-csrf", form_id))
                .with_attr("type", "hidden")
                .with_attr("name", &settings.csrf_field)
                .with_value(csrf_token)
                .with_parent(&form_id),
        );
        elements.push(
            Element::new("i", &icon_element_id(id, kind))
                .with_class("bi")
                .with_class(icon_class)
                .with_parent(&form_id),
        );
    }

    elements.push(
        Element::new("span", &votes_element_id(id))
            .with_data("votes", &comment.count.to_string())
            .with_inner_html(&intcompact(comment.count)),
    );

    elements
}
