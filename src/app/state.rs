use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::thread::JoinHandle;
use std::time::Duration;

use super::controllers::preview::PreviewController;
use super::controllers::vote::VoteController;
use super::domain::messages::Message;
use super::domain::settings::WidgetSettings;
use super::domain::vote::VoteKind;
use super::infrastructure::dom::{Page, SubmitEvent};
use super::infrastructure::error::Result;
use super::services::markdown::{CmarkRenderer, MarkdownRenderer};
use super::services::vote_client::{HttpTransport, VoteDispatcher, VoteTransport};

/// Whether the page should go on to perform the event's default action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Handled,
    DefaultAction,
}

/// Page-level coordinator: owns the page and routes events to the controllers.
pub struct PageState {
    pub page: Page,
    pub settings: WidgetSettings,
    pub preview: PreviewController,
    pub votes: VoteController,
    receiver: Receiver<Message>,
    in_flight: Vec<JoinHandle<()>>,
}

impl PageState {
    /// Wire up the production renderer and HTTP transport.
    pub fn new(page: Page, settings: WidgetSettings) -> Self {
        let renderer = Arc::new(CmarkRenderer::new(settings.markdown));
        let transport = Arc::new(HttpTransport::new(
            Duration::from_secs(settings.request_timeout_secs),
            &settings.user_agent,
        ));
        Self::with_capabilities(page, settings, renderer, transport)
    }

    pub fn with_capabilities(
        page: Page,
        settings: WidgetSettings,
        renderer: Arc<dyn MarkdownRenderer>,
        transport: Arc<dyn VoteTransport>,
    ) -> Self {
        let (sender, receiver) = mpsc::channel();
        let dispatcher = VoteDispatcher::new(transport).with_sender(sender);

        Self {
            preview: PreviewController::new(renderer, &settings),
            votes: VoteController::new(dispatcher, &settings),
            page,
            settings,
            receiver,
            in_flight: Vec::new(),
        }
    }

    /// Page-load wiring: render all previews, bind the vote forms.
    pub fn ready(&mut self) -> Result<()> {
        self.preview.init(&mut self.page);

        let up = self.settings.upvote_form_selector.clone();
        let down = self.settings.downvote_form_selector.clone();
        self.votes.add_vote_handlers(&self.page, &up, VoteKind::Up)?;
        self.votes.add_vote_handlers(&self.page, &down, VoteKind::Down)?;
        Ok(())
    }

    pub fn handle(&mut self, message: Message) -> EventResult {
        match message {
            Message::EditorInput { id, text } => {
                if !self.page.update(&id, |editor| editor.value = text) {
                    return EventResult::DefaultAction;
                }
                if self.preview.is_editor(&self.page, &id) {
                    self.preview.update(&mut self.page, &id);
                    EventResult::Handled
                } else {
                    EventResult::DefaultAction
                }
            }
            Message::FormSubmit { form_id } => {
                let mut event = SubmitEvent::new(&form_id);
                if let Some(submission) = self.votes.handle_submit(&mut self.page, &mut event) {
                    self.prune_finished();
                    self.in_flight.extend(submission.delivery);
                }
                if event.default_prevented() {
                    EventResult::Handled
                } else {
                    EventResult::DefaultAction
                }
            }
            Message::VoteDelivered { comment_id, kind, error } => {
                // Optimistic update stands either way
                match error {
                    Some(error) => tracing::warn!(%comment_id, %kind, %error, "server did not record vote"),
                    None => tracing::debug!(%comment_id, %kind, "server recorded vote"),
                }
                EventResult::Handled
            }
        }
    }

    /// Handle any background messages that have arrived. Returns how many.
    pub fn drain_background(&mut self) -> usize {
        self.prune_finished();
        let pending: Vec<Message> = self.receiver.try_iter().collect();
        let count = pending.len();
        for message in pending {
            self.handle(message);
        }
        count
    }

    /// Votes still being delivered.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    fn prune_finished(&mut self) {
        self.in_flight.retain(|handle| !handle.is_finished());
    }

    /// Block until every vote sent so far has finished, then drain.
    pub fn wait_for_deliveries(&mut self) -> usize {
        for handle in self.in_flight.drain(..) {
            if handle.join().is_err() {
                tracing::error!("vote delivery thread panicked");
            }
        }
        self.drain_background()
    }
}
