use serde::Serialize;

/// Application root path.
pub const ROOT_PATH: &str = "/";

/// Status code hosts attach to a guard redirect.
pub const REDIRECT_STATUS: u16 = 302;

/// Path of the detail page for an activity.
pub fn activity_detail_path(resource_link_id: &str) -> String {
    format!("/actividad/{resource_link_id}")
}

/// Outcome of a route guard: either let the page render, or go elsewhere.
///
/// A redirect is a value, not an error, so nothing that handles fetch
/// failures can swallow it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "location", rename_all = "snake_case")]
pub enum Navigation {
    Render,
    Redirect(String),
}

impl Navigation {
    pub fn redirect(path: impl Into<String>) -> Self {
        Navigation::Redirect(path.into())
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Navigation::Redirect(_))
    }

    /// Redirect target, if any.
    pub fn location(&self) -> Option<&str> {
        match self {
            Navigation::Render => None,
            Navigation::Redirect(path) => Some(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_path_embeds_id() {
        assert_eq!(activity_detail_path("activity123"), "/actividad/activity123");
    }

    #[test]
    fn navigation_serializes_tagged() {
        let json = serde_json::to_value(Navigation::redirect("/")).unwrap();
        assert_eq!(json["action"], "redirect");
        assert_eq!(json["location"], "/");

        let json = serde_json::to_value(Navigation::Render).unwrap();
        assert_eq!(json["action"], "render");
    }

    #[test]
    fn location_only_for_redirects() {
        assert_eq!(Navigation::Render.location(), None);
        assert_eq!(Navigation::redirect("/x").location(), Some("/x"));
        assert!(Navigation::redirect("/x").is_redirect());
    }
}
