use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::app::infrastructure::error::AppError;

/// Which vote button was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteKind {
    Up,
    Down,
}

impl VoteKind {
    /// Single-letter code sent in the `type` form field.
    pub fn wire_code(&self) -> &'static str {
        match self {
            Self::Up => "u",
            Self::Down => "d",
        }
    }
}

impl fmt::Display for VoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_code())
    }
}

impl FromStr for VoteKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "u" => Ok(Self::Up),
            "d" => Ok(Self::Down),
            other => Err(AppError::Vote(format!("unknown vote type '{}'", other))),
        }
    }
}

/// The viewer's current vote on one comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VoteState {
    #[default]
    None,
    Up,
    Down,
}

impl VoteState {
    /// Next state and count delta after pressing `kind`.
    ///
    /// Pressing the active direction again withdraws the vote; pressing the
    /// other direction switches it, moving the count by two.
    pub fn apply(self, kind: VoteKind) -> (VoteState, i64) {
        match (self, kind) {
            (Self::None, VoteKind::Up) => (Self::Up, 1),
            (Self::None, VoteKind::Down) => (Self::Down, -1),
            (Self::Up, VoteKind::Up) => (Self::None, -1),
            (Self::Up, VoteKind::Down) => (Self::Down, -2),
            (Self::Down, VoteKind::Down) => (Self::None, 1),
            (Self::Down, VoteKind::Up) => (Self::Up, 2),
        }
    }

    pub fn upvoted(&self) -> bool {
        *self == Self::Up
    }

    pub fn downvoted(&self) -> bool {
        *self == Self::Down
    }
}

/// Vote indicator and running total for one comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentVotes {
    pub id: String,
    pub state: VoteState,
    pub count: i64,
}

impl CommentVotes {
    pub fn new(id: &str, state: VoteState, count: i64) -> Self {
        Self {
            id: id.to_string(),
            state,
            count,
        }
    }

    /// Apply a click, returning the count delta.
    pub fn apply(&mut self, kind: VoteKind) -> i64 {
        let (next, delta) = self.state.apply(kind);
        self.state = next;
        self.count = self.count.saturating_add(delta);
        delta
    }

    pub fn upvoted(&self) -> bool {
        self.state.upvoted()
    }

    pub fn downvoted(&self) -> bool {
        self.state.downvoted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [VoteState; 3] = [VoteState::None, VoteState::Up, VoteState::Down];
    const ALL_KINDS: [VoteKind; 2] = [VoteKind::Up, VoteKind::Down];

    #[test]
    fn test_transition_table() {
        use VoteKind as K;
        use VoteState as S;
        assert_eq!(S::None.apply(K::Up), (S::Up, 1));
        assert_eq!(S::None.apply(K::Down), (S::Down, -1));
        assert_eq!(S::Up.apply(K::Up), (S::None, -1));
        assert_eq!(S::Up.apply(K::Down), (S::Down, -2));
        assert_eq!(S::Down.apply(K::Down), (S::None, 1));
        assert_eq!(S::Down.apply(K::Up), (S::Up, 2));
    }

    #[test]
    fn test_same_click_twice_returns_to_baseline() {
        for kind in ALL_KINDS {
            let mut votes = CommentVotes::new("7", VoteState::None, 10);
            let baseline = votes.clone();
            let first = votes.apply(kind);
            let second = votes.apply(kind);
            assert_eq!(first + second, 0);
            assert_eq!(votes, baseline);
        }
    }

    #[test]
    fn test_switch_up_to_down() {
        let mut votes = CommentVotes::new("7", VoteState::Up, 5);
        let delta = votes.apply(VoteKind::Down);
        assert_eq!(delta, -2);
        assert_eq!(votes.count, 3);
        assert!(votes.downvoted());
        assert!(!votes.upvoted());
    }

    #[test]
    fn test_never_both_directions() {
        for state in ALL_STATES {
            for kind in ALL_KINDS {
                let (next, _) = state.apply(kind);
                assert!(!(next.upvoted() && next.downvoted()));
            }
        }
    }

    #[test]
    fn test_count_saturates() {
        let mut votes = CommentVotes::new("7", VoteState::None, i64::MAX);
        votes.apply(VoteKind::Up);
        assert_eq!(votes.count, i64::MAX);
    }

    #[test]
    fn test_vote_kind_wire_codes() {
        assert_eq!(VoteKind::Up.to_string(), "u");
        assert_eq!("d".parse::<VoteKind>().unwrap(), VoteKind::Down);
        assert!("x".parse::<VoteKind>().is_err());
    }
}
