use std::collections::HashMap;
use std::thread::JoinHandle;

use crate::app::domain::settings::{IconClasses, WidgetSettings};
use crate::app::domain::vote::{CommentVotes, VoteKind, VoteState};
use crate::app::infrastructure::dom::{Page, Selector, SubmitEvent};
use crate::app::infrastructure::error::Result;
use crate::app::services::compact::compact_int;
use crate::app::services::markup::{icon_element_id, votes_element_id};
use crate::app::services::vote_client::{VoteDispatcher, VoteRequest, resolve_action};

/// What a submitted vote did to the page.
pub struct VoteSubmission {
    pub votes: CommentVotes,
    pub delta: i64,
    /// Background POST, if one could be sent. Joining it is optional.
    pub delivery: Option<JoinHandle<()>>,
}

/// Read the vote indicator and count for `comment_id` off the page.
///
/// The count comes from `data-votes` on `comment-<id>-votes`; a missing or
/// non-numeric value reads as zero.
pub fn read_comment_votes(page: &Page, comment_id: &str, icons: &IconClasses) -> CommentVotes {
    let count_id = votes_element_id(comment_id);
    let count = match page.get(&count_id).and_then(|e| e.data("votes")) {
        Some(raw) => raw.trim().parse::<i64>().unwrap_or_else(|_| {
            tracing::warn!(element = %count_id, value = raw, "vote count is not an integer, reading as 0");
            0
        }),
        None => 0,
    };

    let upvoted = page
        .get(&icon_element_id(comment_id, VoteKind::Up))
        .is_some_and(|e| e.has_class(&icons.up_filled));
    let downvoted = page
        .get(&icon_element_id(comment_id, VoteKind::Down))
        .is_some_and(|e| e.has_class(&icons.down_filled));

    let state = match (upvoted, downvoted) {
        (true, false) => VoteState::Up,
        (false, true) => VoteState::Down,
        (false, false) => VoteState::None,
        // Inconsistent markup: reset to no vote rather than treating it as an upvote (which would give -1)
        (true, true) => {
            tracing::warn!(comment_id, "both vote icons filled, treating as no vote");
            VoteState::None
        }
    };

    CommentVotes::new(comment_id, state, count)
}

/// Write `votes` back onto the page: both icons, `data-votes` and the
/// compact count text. Missing elements are skipped.
pub fn project_comment_votes(page: &mut Page, votes: &CommentVotes, icons: &IconClasses) {
    let up_filled = votes.upvoted();
    page.update(&icon_element_id(&votes.id, VoteKind::Up), |icon| {
        icon.remove_class(&icons.up_filled);
        icon.remove_class(&icons.up_outline);
        icon.add_class(if up_filled { &icons.up_filled } else { &icons.up_outline });
    });

    let down_filled = votes.downvoted();
    page.update(&icon_element_id(&votes.id, VoteKind::Down), |icon| {
        icon.remove_class(&icons.down_filled);
        icon.remove_class(&icons.down_outline);
        icon.add_class(if down_filled { &icons.down_filled } else { &icons.down_outline });
    });

    let count = votes.count;
    page.update(&votes_element_id(&votes.id), |el| {
        el.set_data("votes", &count.to_string());
        el.inner_html = compact_int(count);
    });
}

/// Optimistic upvote/downvote handling for comment forms.
pub struct VoteController {
    dispatcher: VoteDispatcher,
    icons: IconClasses,
    csrf_field: String,
    base_url: Option<String>,
    bindings: HashMap<String, VoteKind>,
}

impl VoteController {
    pub fn new(dispatcher: VoteDispatcher, settings: &WidgetSettings) -> Self {
        Self {
            dispatcher,
            icons: settings.icons.clone(),
            csrf_field: settings.csrf_field.clone(),
            base_url: settings.base_url.clone(),
            bindings: HashMap::new(),
        }
    }

    /// Bind every form matching `selector` to submit a `kind` vote.
    /// Returns the number of forms bound.
    pub fn add_vote_handlers(&mut self, page: &Page, selector: &str, kind: VoteKind) -> Result<usize> {
        let selector: Selector = selector.parse()?;
        let forms = page.select(&selector);
        for form_id in &forms {
            self.bindings.insert(form_id.clone(), kind);
        }
        tracing::debug!(%selector, %kind, forms = forms.len(), "vote handlers bound");
        Ok(forms.len())
    }

    pub fn binding(&self, form_id: &str) -> Option<VoteKind> {
        self.bindings.get(form_id).copied()
    }

    /// Handle a submit on a bound vote form.
    pub fn handle_submit(&self, page: &mut Page, event: &mut SubmitEvent) -> Option<VoteSubmission> {
        let kind = self.binding(&event.form_id)?;
        let comment_id = page
            .get(&event.form_id)
            .and_then(|form| form.data("id"))
            .unwrap_or_default()
            .to_string();
        Some(self.submit_vote(page, event, &comment_id, kind))
    }

    /// Record a vote: send it in the background and update the page at once.
    ///
    /// The page update never waits on, or is undone by, the network call.
    pub fn submit_vote(
        &self,
        page: &mut Page,
        event: &mut SubmitEvent,
        comment_id: &str,
        kind: VoteKind,
    ) -> VoteSubmission {
        event.prevent_default();

        let delivery = self.send(page, &event.form_id, comment_id, kind);

        let mut votes = read_comment_votes(page, comment_id, &self.icons);
        let delta = votes.apply(kind);
        project_comment_votes(page, &votes, &self.icons);

        tracing::info!(comment_id, %kind, delta, votes = votes.count, "vote applied");
        VoteSubmission { votes, delta, delivery }
    }

    fn send(&self, page: &Page, form_id: &str, comment_id: &str, kind: VoteKind) -> Option<JoinHandle<()>> {
        let csrf_token = page.scoped_input_value(form_id, &self.csrf_field);
        let action = page.get(form_id).and_then(|form| form.attr("action")).unwrap_or_default();

        // The document URL wins, as in the browser; settings are the fallback
        let base_url = page.url.as_deref().or(self.base_url.as_deref());
        match resolve_action(base_url, action) {
            Ok(url) => Some(self.dispatcher.dispatch(
                comment_id,
                VoteRequest {
                    url,
                    csrf_token,
                    kind,
                },
            )),
            Err(e) => {
                tracing::warn!(form_id, comment_id, error = %e, "vote not sent");
                None
            }
        }
    }
}
