//! One-time startup capture of the session token from the launch URL.
//!
//! The LTI launch redirects into the app with `?lti_session=<token>` so the
//! tab can keep its session even when the iframe drops the cookie. The token
//! is moved into the tab's [`SessionStore`] and scrubbed from the address bar.

use aula_core::{SessionToken, SESSION_PARAM};
use reqwest::Url;

use crate::location::{ExecutionContext, Location};
use crate::store::SessionStore;

/// Capture the session token from the current URL, if present.
///
/// Returns the committed token. Outside a browser, or when the parameter is
/// absent, nothing changes. An empty value is scrubbed but not committed.
pub fn capture_session(
    context: ExecutionContext,
    location: &dyn Location,
    session: &SessionStore,
) -> Option<SessionToken> {
    if !context.is_browser() {
        return None;
    }

    let href = location.href();
    let mut url = match Url::parse(&href) {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!(error = %e, "cannot parse current location, skipping capture");
            return None;
        }
    };

    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    let token = pairs
        .iter()
        .find(|(k, _)| k == SESSION_PARAM)
        .map(|(_, v)| v.clone())?;

    let remaining: Vec<(String, String)> = pairs
        .into_iter()
        .filter(|(k, _)| k != SESSION_PARAM)
        .collect();
    if remaining.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(remaining.iter());
    }

    let committed = if token.is_empty() {
        tracing::warn!("launch URL carried an empty session parameter");
        None
    } else {
        session.set(&token);
        tracing::info!("captured LTI session from launch URL");
        Some(token)
    };

    location.replace(&path_query_fragment(&url));
    committed
}

fn path_query_fragment(url: &Url) -> String {
    let mut out = url.path().to_string();
    if let Some(q) = url.query() {
        out.push('?');
        out.push_str(q);
    }
    if let Some(f) = url.fragment() {
        out.push('#');
        out.push_str(f);
    }
    out
}
