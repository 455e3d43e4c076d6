use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use url::Url;
use url::form_urlencoded;

use crate::app::domain::messages::Message;
use crate::app::domain::vote::VoteKind;
use crate::app::infrastructure::error::{AppError, Result};

/// One vote POST, as the comment form would submit it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteRequest {
    pub url: String,
    pub csrf_token: Option<String>,
    pub kind: VoteKind,
}

impl VoteRequest {
    /// `application/x-www-form-urlencoded` body. A missing token is sent empty.
    pub fn form_body(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("csrfmiddlewaretoken", self.csrf_token.as_deref().unwrap_or(""))
            .append_pair("type", self.kind.wire_code())
            .finish()
    }
}

/// Resolve a form's `action` against the page URL, as the browser does.
pub fn resolve_action(base_url: Option<&str>, action: &str) -> Result<String> {
    match Url::parse(action) {
        Ok(absolute) => Ok(absolute.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = base_url.ok_or_else(|| {
                AppError::Vote(format!("relative action '{}' with no base URL configured", action))
            })?;
            Ok(Url::parse(base)?.join(action)?.to_string())
        }
        Err(e) => Err(e.into()),
    }
}

pub trait VoteTransport: Send + Sync {
    fn post(&self, request: &VoteRequest) -> Result<()>;
}

/// Blocking HTTP transport; only ever called off the UI path.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    timeout: Duration,
    user_agent: String,
}

impl HttpTransport {
    pub fn new(timeout: Duration, user_agent: &str) -> Self {
        Self {
            timeout,
            user_agent: user_agent.to_string(),
        }
    }
}

impl VoteTransport for HttpTransport {
    fn post(&self, request: &VoteRequest) -> Result<()> {
        let response = minreq::post(request.url.as_str())
            .with_header("Content-Type", "application/x-www-form-urlencoded")
            .with_header("User-Agent", self.user_agent.as_str())
            .with_header("X-Requested-With", "XMLHttpRequest")
            .with_timeout(self.timeout.as_secs().max(1))
            .with_body(request.form_body())
            .send()?;

        if !(200..300).contains(&response.status_code) {
            return Err(AppError::Vote(format!(
                "server returned {} {}",
                response.status_code, response.reason_phrase
            )));
        }
        Ok(())
    }
}

/// Sends votes on background threads without ever blocking the caller.
#[derive(Clone)]
pub struct VoteDispatcher {
    transport: Arc<dyn VoteTransport>,
    sender: Option<Sender<Message>>,
}

impl VoteDispatcher {
    pub fn new(transport: Arc<dyn VoteTransport>) -> Self {
        Self {
            transport,
            sender: None,
        }
    }

    /// Report every delivery outcome back on `sender`.
    pub fn with_sender(mut self, sender: Sender<Message>) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Fire the request. The handle is only for callers that want to wait;
    /// the optimistic page update never depends on it.
    pub fn dispatch(&self, comment_id: &str, request: VoteRequest) -> JoinHandle<()> {
        let transport = Arc::clone(&self.transport);
        let sender = self.sender.clone();
        let comment_id = comment_id.to_string();

        thread::spawn(move || {
            let result = transport.post(&request);
            let error = match result {
                Ok(()) => {
                    tracing::debug!(comment_id = %comment_id, kind = %request.kind, url = %request.url, "vote delivered");
                    None
                }
                Err(e) => {
                    tracing::warn!(comment_id = %comment_id, kind = %request.kind, url = %request.url, error = %e, "vote delivery failed");
                    Some(e.to_string())
                }
            };

            if let Some(tx) = sender {
                // Receiver gone means the page was torn down; nothing left to tell
                let _ = tx.send(Message::VoteDelivered {
                    comment_id,
                    kind: request.kind,
                    error,
                });
            }
        })
    }
}
