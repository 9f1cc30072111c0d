use thiserror::Error;

/// Why a single inbound message produced no notification. Every variant is
/// local and terminal for that message: the pipeline logs it and moves on,
/// nothing escalates to a process-level fault.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("empty message")]
    EmptyMessage,

    #[error("message carries no new-forecast marker")]
    MissingMarker,

    /// The message already states its own result, so it is not a pending
    /// prediction and must not be forwarded.
    #[error("outcome already present in message")]
    OutcomeAlreadyPresent,

    #[error("capper line missing or malformed")]
    MalformedCapperLine,

    #[error("sport line missing")]
    MissingSportLine,

    #[error("league line missing")]
    MissingLeagueLine,

    #[error("teams line missing")]
    MissingTeamsLine,

    #[error("match start line missing")]
    MissingDateLine,

    #[error("no wager entry found for '{teams}'")]
    NoMatchingEntry { teams: String },

    #[error("wager entry matched but no outcome or coefficient extracted")]
    OutcomeNotFound,

    #[error("listing fetch timed out")]
    FetchTimeout,

    #[error("listing fetch failed: {0:#}")]
    FetchFailed(anyhow::Error),
}
