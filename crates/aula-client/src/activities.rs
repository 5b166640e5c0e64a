//! Activity API calls used by the creation and submission forms.
//!
//! Unlike the context fetch, failures here reach the caller: the forms show
//! the backend's message.

use serde::{Deserialize, Serialize};

use aula_session::{FilePart, HttpResponse, RequestConfig, SessionClient, Transport, TransportError};

use crate::pending::activity_path;

const ACTIVITIES_PATH: &str = "/api/activities";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid activity: {0}")]
    Invalid(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected response body: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Individual,
    Group,
}

impl std::str::FromStr for ActivityType {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "individual" => Ok(ActivityType::Individual),
            "group" => Ok(ActivityType::Group),
            other => Err(ApiError::Invalid(format!("unknown activity type '{other}'"))),
        }
    }
}

/// Payload of `POST /api/activities`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewActivity {
    pub title: String,
    pub description: String,
    pub activity_type: ActivityType,
    pub max_group_size: Option<u32>,
    /// ISO 8601, e.g. `2025-12-31T23:59:00Z`.
    pub deadline: Option<String>,
    pub evaluator_id: Option<String>,
}

impl NewActivity {
    /// Check what the backend would reject, and normalize: titles are
    /// trimmed and individual activities carry no group size.
    pub fn validated(mut self) -> Result<Self, ApiError> {
        self.title = self.title.trim().to_string();
        if self.title.is_empty() {
            return Err(ApiError::Invalid("title is required".into()));
        }
        match self.activity_type {
            ActivityType::Group => match self.max_group_size {
                Some(n) if n >= 2 => {}
                _ => {
                    return Err(ApiError::Invalid(
                        "group activities need a max_group_size of at least 2".into(),
                    ))
                }
            },
            ActivityType::Individual => self.max_group_size = None,
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityCreated {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub activity_id: Option<String>,
    #[serde(default)]
    pub activity: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionReceipt {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub file_id: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Create the activity for the current placement.
pub async fn create_activity<T: Transport>(
    client: &SessionClient<T>,
    activity: &NewActivity,
) -> Result<ActivityCreated, ApiError> {
    let activity = activity.clone().validated()?;
    let body = serde_json::to_value(&activity).map_err(|e| ApiError::Decode(e.to_string()))?;
    let resp = client
        .fetch(ACTIVITIES_PATH, RequestConfig::post().with_json(body))
        .await?;
    let created: ActivityCreated = read_json(&resp)?;
    tracing::info!(title = %activity.title, "activity created");
    Ok(created)
}

/// Fetch an activity record as served.
pub async fn get_activity<T: Transport>(
    client: &SessionClient<T>,
    id: &str,
) -> Result<serde_json::Value, ApiError> {
    let resp = client.fetch(&activity_path(id), RequestConfig::get()).await?;
    read_json(&resp)
}

/// Upload one file as a submission to an activity.
pub async fn submit_file<T: Transport>(
    client: &SessionClient<T>,
    activity_id: &str,
    file: FilePart,
) -> Result<SubmissionReceipt, ApiError> {
    let path = format!("{}/submit", activity_path(activity_id));
    let file_name = file.file_name.clone();
    let resp = client
        .fetch(&path, RequestConfig::post().with_multipart(vec![file]))
        .await?;
    let receipt: SubmissionReceipt = read_json(&resp)?;
    tracing::info!(activity_id, %file_name, "submission uploaded");
    Ok(receipt)
}

fn read_json<T: serde::de::DeserializeOwned>(resp: &HttpResponse) -> Result<T, ApiError> {
    if !resp.is_success() {
        return Err(ApiError::Rejected {
            status: resp.status,
            message: error_message(resp),
        });
    }
    resp.json().map_err(|e| ApiError::Decode(e.to_string()))
}

/// Backend message from an error body: `error`, else FastAPI's `detail`.
fn error_message(resp: &HttpResponse) -> String {
    let body: serde_json::Value = resp.json().unwrap_or(serde_json::Value::Null);
    ["error", "detail"]
        .iter()
        .find_map(|k| body.get(*k).and_then(|v| v.as_str()))
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", resp.status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aula_core::SESSION_HEADER;
    use aula_session::{Body, ScriptedTransport, SessionStore};

    fn client(transport: ScriptedTransport) -> SessionClient<ScriptedTransport> {
        let session = SessionStore::ephemeral();
        session.set("sess-1");
        SessionClient::new(transport, session)
    }

    fn sample() -> NewActivity {
        NewActivity {
            title: "Test Activity".into(),
            description: "Test Description".into(),
            activity_type: ActivityType::Individual,
            max_group_size: None,
            deadline: Some("2025-12-31T23:59:00Z".into()),
            evaluator_id: None,
        }
    }

    #[tokio::test]
    async fn create_posts_json_payload() {
        let c = client(ScriptedTransport::new().reply_json(
            200,
            serde_json::json!({"success": true, "activity_id": "new-activity-123"}),
        ));
        let created = create_activity(&c, &sample()).await.unwrap();
        assert!(created.success);
        assert_eq!(created.activity_id.as_deref(), Some("new-activity-123"));

        let sent = c.transport().requests();
        assert_eq!(sent[0].path, "/api/activities");
        assert_eq!(sent[0].config.method, RequestConfig::post().method);
        assert_eq!(sent[0].config.header("Content-Type"), Some("application/json"));
        assert_eq!(sent[0].config.header(SESSION_HEADER), Some("sess-1"));
        match &sent[0].config.body {
            Body::Json(v) => {
                assert_eq!(v["title"], "Test Activity");
                assert_eq!(v["activity_type"], "individual");
                assert!(v["max_group_size"].is_null());
            }
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_surfaces_backend_error() {
        let c = client(ScriptedTransport::new().reply_json(
            400,
            serde_json::json!({"success": false, "error": "Invalid activity data"}),
        ));
        let err = create_activity(&c, &sample()).await.unwrap_err();
        match err {
            ApiError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid activity data");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_reads_fastapi_detail() {
        let c = client(ScriptedTransport::new().reply_json(
            403,
            serde_json::json!({"detail": "Solo profesores pueden crear actividades"}),
        ));
        let err = create_activity(&c, &sample()).await.unwrap_err();
        assert!(err.to_string().contains("Solo profesores"));
    }

    #[tokio::test]
    async fn blank_title_is_rejected_locally() {
        let c = client(ScriptedTransport::new());
        let mut activity = sample();
        activity.title = "   ".into();
        assert!(matches!(
            create_activity(&c, &activity).await,
            Err(ApiError::Invalid(_))
        ));
        assert!(c.transport().requests().is_empty());
    }

    #[test]
    fn group_needs_size_of_two() {
        let mut activity = sample();
        activity.activity_type = ActivityType::Group;
        activity.max_group_size = Some(1);
        assert!(activity.clone().validated().is_err());
        activity.max_group_size = Some(3);
        assert_eq!(activity.validated().unwrap().max_group_size, Some(3));
    }

    #[test]
    fn individual_drops_group_size() {
        let mut activity = sample();
        activity.max_group_size = Some(4);
        assert_eq!(activity.validated().unwrap().max_group_size, None);
    }

    #[test]
    fn activity_type_parses_any_case() {
        assert_eq!("GROUP".parse::<ActivityType>().unwrap(), ActivityType::Group);
        assert!("pair".parse::<ActivityType>().is_err());
    }

    #[tokio::test]
    async fn submit_uploads_multipart() {
        let c = client(ScriptedTransport::new().reply_json(
            200,
            serde_json::json!({"success": true, "file_id": "file-123", "filename": "test.pdf"}),
        ));
        let file = FilePart {
            field: "file".into(),
            file_name: "test.pdf".into(),
            content_type: Some("application/pdf".into()),
            bytes: b"test content".to_vec(),
        };
        let receipt = submit_file(&c, "activity123", file).await.unwrap();
        assert_eq!(receipt.file_id.as_deref(), Some("file-123"));

        let sent = c.transport().requests();
        assert_eq!(sent[0].path, "/api/activities/activity123/submit");
        match &sent[0].config.body {
            Body::Multipart(parts) => assert_eq!(parts[0].file_name, "test.pdf"),
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[tokio::test]
    async fn submit_surfaces_too_large() {
        let c = client(ScriptedTransport::new().reply_json(
            413,
            serde_json::json!({"success": false, "error": "File too large"}),
        ));
        let file = FilePart {
            field: "file".into(),
            file_name: "large-file.pdf".into(),
            content_type: None,
            bytes: vec![b'x'; 16],
        };
        let err = submit_file(&c, "activity123", file).await.unwrap_err();
        match err {
            ApiError::Rejected { status, message } => {
                assert_eq!(status, 413);
                assert_eq!(message, "File too large");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_activity_not_found() {
        let c = client(ScriptedTransport::new().reply_status(404));
        let err = get_activity(&c, "nope").await.unwrap_err();
        assert_eq!(err.to_string(), "request rejected (404): HTTP 404");
    }

    #[tokio::test]
    async fn transport_failure_is_reported() {
        let c = client(ScriptedTransport::new().fail("Network error"));
        assert!(matches!(
            get_activity(&c, "a1").await,
            Err(ApiError::Transport(_))
        ));
    }
}
