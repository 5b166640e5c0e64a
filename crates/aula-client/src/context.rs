//! LTI context fetch: the one place where transport, HTTP and application
//! failures collapse into a [`ContextError`]. Nothing escapes as a panic or
//! a transport error.

use aula_core::{ContextBody, ContextError, FetchResult, LtiContext};
use aula_session::{HttpResponse, RequestConfig, SessionClient, Transport, TransportError};

pub const LTI_DATA_PATH: &str = "/api/lti-data";

/// Fetch the current LTI context through the session-aware request layer.
pub async fn fetch_context<T: Transport>(client: &SessionClient<T>) -> FetchResult {
    let outcome = client.fetch(LTI_DATA_PATH, RequestConfig::get()).await;
    interpret(outcome)
}

/// Same fetch, cookies only, no session header.
pub(crate) async fn fetch_context_credentials_only<T: Transport>(
    client: &SessionClient<T>,
) -> FetchResult {
    let outcome = client
        .fetch_credentials_only(LTI_DATA_PATH, RequestConfig::get())
        .await;
    interpret(outcome)
}

fn interpret(outcome: Result<HttpResponse, TransportError>) -> FetchResult {
    let resp = match outcome {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(error = %e, "LTI context request failed");
            return Err(ContextError::Connection);
        }
    };

    if !resp.is_success() {
        tracing::debug!(status = resp.status, "LTI context request rejected");
        return Err(match resp.status {
            401 => ContextError::NoSession,
            status => ContextError::Http { status },
        });
    }

    let body: ContextBody = match resp.json() {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(error = %e, "LTI context body unreadable");
            return Err(ContextError::Connection);
        }
    };
    if !body.success {
        return Err(ContextError::Rejected);
    }
    Ok(body.data.map(LtiContext::from_data).unwrap_or_default())
}
