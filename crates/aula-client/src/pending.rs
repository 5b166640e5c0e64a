//! Does a teacher landing on this placement still have to create its activity?
//!
//! Every failure or ambiguous outcome resolves to "nothing pending": missing
//! a creation prompt is preferred to prompting when the activity exists.

use aula_core::PendingActivity;
use aula_session::{CacheMode, RequestConfig, SessionClient, Transport};

use crate::context::fetch_context;

/// API path of the activity backing a placement.
pub fn activity_path(resource_link_id: &str) -> String {
    format!("/api/activities/{resource_link_id}")
}

/// Result of checking whether an activity record exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityProbe {
    /// 2xx
    Exists,
    /// 404
    Missing,
    /// Any other status, or the request failed.
    Unknown,
}

/// Read `/api/activities/{id}` once and classify the outcome.
pub async fn probe_activity<T: Transport>(
    client: &SessionClient<T>,
    resource_link_id: &str,
    cache: CacheMode,
) -> ActivityProbe {
    let path = activity_path(resource_link_id);
    let probe = match client.fetch(&path, RequestConfig::get().with_cache(cache)).await {
        Ok(resp) if resp.is_success() => ActivityProbe::Exists,
        Ok(resp) if resp.status == 404 => ActivityProbe::Missing,
        Ok(resp) => {
            tracing::debug!(status = resp.status, "activity probe inconclusive");
            ActivityProbe::Unknown
        }
        Err(e) => {
            tracing::warn!(error = %e, "activity probe failed");
            ActivityProbe::Unknown
        }
    };
    tracing::debug!(resource_link_id, ?probe, "activity probe");
    probe
}

/// Decide whether the current user must be routed to activity creation.
///
/// Only teachers/admins on a placement whose activity is confirmed missing
/// (404) get `Pending`. The probe bypasses caches.
pub async fn check_pending_activity<T: Transport>(client: &SessionClient<T>) -> PendingActivity {
    let ctx = match fetch_context(client).await {
        Ok(ctx) if ctx.is_teacher_or_admin() => ctx,
        _ => return PendingActivity::None,
    };
    let Some(resource_link_id) = ctx.resource_link_id() else {
        return PendingActivity::None;
    };

    match probe_activity(client, resource_link_id, CacheMode::NoCache).await {
        ActivityProbe::Missing => {
            tracing::info!(resource_link_id, "activity pending creation");
            PendingActivity::Pending {
                resource_link_id: resource_link_id.to_string(),
            }
        }
        ActivityProbe::Exists | ActivityProbe::Unknown => PendingActivity::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aula_session::{ScriptedTransport, SessionStore};

    fn client(transport: ScriptedTransport) -> SessionClient<ScriptedTransport> {
        SessionClient::new(transport, SessionStore::ephemeral())
    }

    fn lti(data: serde_json::Value) -> serde_json::Value {
        serde_json::json!({"success": true, "data": data})
    }

    /// Transport whose first reply is a launch with `roles` on placement `link`.
    fn launch(roles: &str, link: &str) -> ScriptedTransport {
        let data = serde_json::json!({"roles": roles, "resource_link_id": link});
        ScriptedTransport::new().reply_json(200, lti(data))
    }

    #[tokio::test]
    async fn learner_has_nothing_pending_and_no_probe() {
        let c = client(
            ScriptedTransport::new()
                .reply_json(200, lti(serde_json::json!({"roles": "Learner"}))),
        );
        assert_eq!(check_pending_activity(&c).await, PendingActivity::None);
        assert_eq!(c.transport().requests().len(), 1);
    }

    #[tokio::test]
    async fn instructor_without_link_id_has_nothing_pending() {
        let c = client(
            ScriptedTransport::new()
                .reply_json(200, lti(serde_json::json!({"roles": "Instructor"}))),
        );
        assert_eq!(check_pending_activity(&c).await, PendingActivity::None);
        assert_eq!(c.transport().requests().len(), 1);
    }

    #[tokio::test]
    async fn existing_activity_is_not_pending() {
        let c = client(launch("Instructor", "activity123").reply_status(200));
        assert_eq!(check_pending_activity(&c).await, PendingActivity::None);
    }

    #[tokio::test]
    async fn missing_activity_is_pending() {
        let c = client(launch("Instructor", "activity123").reply_status(404));
        let result = check_pending_activity(&c).await;
        assert!(result.has_pending_activity());
        assert_eq!(result.resource_link_id(), Some("activity123"));
    }

    #[tokio::test]
    async fn probe_targets_link_id_without_cache() {
        let c = client(launch("Administrator", "test-activity-456").reply_status(404));
        assert!(check_pending_activity(&c).await.has_pending_activity());

        let sent = c.transport().requests();
        assert_eq!(sent[1].path, "/api/activities/test-activity-456");
        assert_eq!(sent[1].config.cache, CacheMode::NoCache);
        assert_eq!(sent[1].config.credentials, aula_session::Credentials::Include);
    }

    #[tokio::test]
    async fn probe_failure_is_not_pending() {
        let c = client(launch("Instructor", "activity123").fail("Network error"));
        assert_eq!(check_pending_activity(&c).await, PendingActivity::None);
    }

    #[tokio::test]
    async fn probe_server_error_is_not_pending() {
        let c = client(launch("Instructor", "activity123").reply_status(500));
        assert_eq!(check_pending_activity(&c).await, PendingActivity::None);
    }

    #[tokio::test]
    async fn context_failure_is_not_pending() {
        let c = client(ScriptedTransport::new().reply_status(401));
        assert_eq!(check_pending_activity(&c).await, PendingActivity::None);
        assert_eq!(c.transport().requests().len(), 1);
    }

    #[tokio::test]
    async fn probe_classifies_statuses() {
        let c = client(
            ScriptedTransport::new()
                .reply_status(204)
                .reply_status(404)
                .reply_status(403),
        );
        assert_eq!(probe_activity(&c, "a", CacheMode::Default).await, ActivityProbe::Exists);
        assert_eq!(probe_activity(&c, "a", CacheMode::Default).await, ActivityProbe::Missing);
        assert_eq!(probe_activity(&c, "a", CacheMode::Default).await, ActivityProbe::Unknown);
    }
}
