use super::vote::VoteKind;

/// All events the page coordinator dispatches.
/// Browser-side events arrive from the caller; `VoteDelivered` comes back
/// from the background vote threads through the channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // Editor
    EditorInput { id: String, text: String },

    // Forms
    FormSubmit { form_id: String },

    // Background deliveries
    VoteDelivered {
        comment_id: String,
        kind: VoteKind,
        error: Option<String>,
    },
}
