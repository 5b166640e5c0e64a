use serde::{Deserialize, Serialize};

use crate::error::{ContextError, PendingActivityError};

/// Query parameter carrying the session token on the launch redirect.
pub const SESSION_PARAM: &str = "lti_session";

/// Header carrying the session token on API calls.
pub const SESSION_HEADER: &str = "X-LTI-Session";

/// Opaque LTI launch session identifier.
pub type SessionToken = String;

/// Launch attributes of the current user and placement, as served by
/// `GET /api/lti-data`.
///
/// Decoding never fails on an object: a named attribute that is not a string
/// stays in `extra` and reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Map<String, serde_json::Value>")]
pub struct LtiContext {
    /// Freeform, comma- or space-separated role names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_link_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lis_person_name_full: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext_user_username: Option<String>,
    /// Every other launch attribute, untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl From<serde_json::Map<String, serde_json::Value>> for LtiContext {
    fn from(mut extra: serde_json::Map<String, serde_json::Value>) -> Self {
        LtiContext {
            roles: take_string(&mut extra, "roles"),
            resource_link_id: take_string(&mut extra, "resource_link_id"),
            lis_person_name_full: take_string(&mut extra, "lis_person_name_full"),
            ext_user_username: take_string(&mut extra, "ext_user_username"),
            extra,
        }
    }
}

fn take_string(
    map: &mut serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Option<String> {
    if !map.get(key).is_some_and(serde_json::Value::is_string) {
        return None;
    }
    match map.remove(key) {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    }
}

impl LtiContext {
    pub fn roles(&self) -> Option<&str> {
        self.roles.as_deref()
    }

    /// Context from a response's `data` member. Anything but an object is an
    /// empty context.
    pub fn from_data(data: serde_json::Value) -> Self {
        match data {
            serde_json::Value::Object(map) => LtiContext::from(map),
            _ => LtiContext::default(),
        }
    }

    /// Placement id; an empty string counts as absent.
    pub fn resource_link_id(&self) -> Option<&str> {
        self.resource_link_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn is_student(&self) -> bool {
        crate::roles::is_student_role(self.roles())
    }

    pub fn is_teacher_or_admin(&self) -> bool {
        crate::roles::is_teacher_or_admin_role(self.roles())
    }
}

/// Body of a `GET /api/lti-data` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ContextBody {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Outcome of one context fetch. Transport, HTTP and application failures
/// all collapse into [`ContextError`].
pub type FetchResult = Result<LtiContext, ContextError>;

/// Flat `{success, data?, error?}` rendering of a [`FetchResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<LtiContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&FetchResult> for FetchEnvelope {
    fn from(result: &FetchResult) -> Self {
        match result {
            Ok(ctx) => FetchEnvelope {
                success: true,
                data: Some(ctx.clone()),
                error: None,
            },
            Err(e) => FetchEnvelope {
                success: false,
                data: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Whether a teacher must be sent to the activity-creation flow.
///
/// Serialized as `{"hasPendingActivity": bool, "resourceLinkId"?: string}`;
/// the id is present exactly when an activity is pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "PendingActivityWire", try_from = "PendingActivityWire")]
pub enum PendingActivity {
    None,
    Pending { resource_link_id: String },
}

impl PendingActivity {
    pub fn has_pending_activity(&self) -> bool {
        matches!(self, PendingActivity::Pending { .. })
    }

    pub fn resource_link_id(&self) -> Option<&str> {
        match self {
            PendingActivity::None => None,
            PendingActivity::Pending { resource_link_id } => Some(resource_link_id),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PendingActivityWire {
    has_pending_activity: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resource_link_id: Option<String>,
}

impl From<PendingActivity> for PendingActivityWire {
    fn from(p: PendingActivity) -> Self {
        match p {
            PendingActivity::None => PendingActivityWire {
                has_pending_activity: false,
                resource_link_id: None,
            },
            PendingActivity::Pending { resource_link_id } => PendingActivityWire {
                has_pending_activity: true,
                resource_link_id: Some(resource_link_id),
            },
        }
    }
}

impl TryFrom<PendingActivityWire> for PendingActivity {
    type Error = PendingActivityError;

    fn try_from(w: PendingActivityWire) -> Result<Self, Self::Error> {
        match (w.has_pending_activity, w.resource_link_id) {
            (true, Some(resource_link_id)) => Ok(PendingActivity::Pending { resource_link_id }),
            (false, None) => Ok(PendingActivity::None),
            (true, None) => Err(PendingActivityError::MissingResourceLinkId),
            (false, Some(_)) => Err(PendingActivityError::UnexpectedResourceLinkId),
        }
    }
}
