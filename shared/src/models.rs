use serde::{Serialize, Deserialize};

/// A single quote as stored on disk and served over the wire.
///
/// `id` and `text` are fixed at store initialization; only `votes` changes,
/// and only through the vote coordinator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: u64,
    pub text: String,
    pub votes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub success: bool,
    pub votes: u64,
    pub votes_left: u32,
    pub total_votes: u32,
}

/// Vote budget for the caller's session. `total_votes` is the cap, not a
/// tally; `voted_quotes` lists the quote ids this session has spent votes on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionVotes {
    pub votes_left: u32,
    pub total_votes: u32,
    pub voted_quotes: Vec<u64>,
}
