//! Route guards run before a page renders.
//!
//! Each guard returns a [`Navigation`]. Fetch failures never block
//! rendering; a redirect, once decided, is returned as a value and cannot be
//! lost in error handling.

use aula_core::nav::{activity_detail_path, ROOT_PATH};
use aula_core::Navigation;
use aula_session::{CacheMode, ExecutionContext, SessionClient, Transport};

use crate::context::{fetch_context, fetch_context_credentials_only};
use crate::pending::{probe_activity, ActivityProbe};

/// How the root-layout guard fetches the LTI context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutFetch {
    /// Cookies only. Fails when the iframe drops the session cookie.
    #[default]
    CredentialsOnly,
    /// Through the session-aware request layer, like every other call.
    SessionHeader,
}

impl std::str::FromStr for LayoutFetch {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credentials_only" => Ok(LayoutFetch::CredentialsOnly),
            "session_header" => Ok(LayoutFetch::SessionHeader),
            other => anyhow::bail!(
                "unknown layout fetch mode '{other}' (expected credentials_only or session_header)"
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GuardOptions {
    pub layout_fetch: LayoutFetch,
}

/// Keep students on the root page.
///
/// Off the root path, a context whose roles classify as student redirects to
/// `/`. Everything else, failures included, renders.
pub async fn root_layout_guard<T: Transport>(
    client: &SessionClient<T>,
    context: ExecutionContext,
    path: &str,
    options: GuardOptions,
) -> Navigation {
    if !context.is_browser() || path == ROOT_PATH {
        return Navigation::Render;
    }

    let result = match options.layout_fetch {
        LayoutFetch::CredentialsOnly => fetch_context_credentials_only(client).await,
        LayoutFetch::SessionHeader => fetch_context(client).await,
    };
    match result {
        Ok(ctx) if ctx.is_student() => {
            tracing::info!(path, "student outside root, redirecting");
            Navigation::redirect(ROOT_PATH)
        }
        Ok(_) => Navigation::Render,
        Err(e) => {
            tracing::warn!(path, error = %e, "could not check role for redirection");
            Navigation::Render
        }
    }
}

/// Send teachers whose activity already exists to its detail page.
///
/// Students, missing activities (404), failed probes and failed context
/// fetches all stay on the root page.
pub async fn root_page_guard<T: Transport>(
    client: &SessionClient<T>,
    context: ExecutionContext,
) -> Navigation {
    if !context.is_browser() {
        return Navigation::Render;
    }

    let ctx = match fetch_context(client).await {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::debug!(error = %e, "no LTI context on root page");
            return Navigation::Render;
        }
    };
    if !ctx.is_teacher_or_admin() {
        return Navigation::Render;
    }
    let Some(resource_link_id) = ctx.resource_link_id() else {
        return Navigation::Render;
    };

    match probe_activity(client, resource_link_id, CacheMode::Default).await {
        ActivityProbe::Exists => {
            let target = activity_detail_path(resource_link_id);
            tracing::info!(%target, "activity exists, redirecting");
            Navigation::Redirect(target)
        }
        ActivityProbe::Missing | ActivityProbe::Unknown => Navigation::Render,
    }
}

/// Run the guards for navigating to `path`: the layout guard first, then,
/// on the root path, the page guard.
pub async fn resolve_navigation<T: Transport>(
    client: &SessionClient<T>,
    context: ExecutionContext,
    path: &str,
    options: GuardOptions,
) -> Navigation {
    let nav = root_layout_guard(client, context, path, options).await;
    if nav.is_redirect() || path != ROOT_PATH {
        return nav;
    }
    root_page_guard(client, context).await
}
