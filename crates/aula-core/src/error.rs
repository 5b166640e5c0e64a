//! Error types shared across Aula crates.

/// Why the LTI context could not be obtained.
///
/// The `Display` strings are part of the client contract; forms and tests
/// compare against them verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    /// The call itself failed (network error, unreadable body).
    #[error("Connection error")]
    Connection,

    /// HTTP 401: the backend has no session for this tab.
    #[error("No active LTI session")]
    NoSession,

    /// Any other non-2xx status.
    #[error("Failed to fetch LTI data")]
    Http { status: u16 },

    /// 2xx, but the body's own `success` flag was false.
    #[error("Failed to retrieve LTI data")]
    Rejected,
}

/// Wire form of a pending-activity decision violated its invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PendingActivityError {
    #[error("hasPendingActivity is true but resourceLinkId is missing")]
    MissingResourceLinkId,

    #[error("resourceLinkId present without a pending activity")]
    UnexpectedResourceLinkId,
}
