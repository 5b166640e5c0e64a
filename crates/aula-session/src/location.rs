use std::sync::Mutex;

use reqwest::Url;

/// Where the code is running. Capture and route guards only act in a browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionContext {
    #[default]
    Browser,
    /// Server-side prerendering or any other host without a window.
    Server,
}

impl ExecutionContext {
    pub fn is_browser(self) -> bool {
        self == ExecutionContext::Browser
    }
}

/// `scheme://host[:port]` of an absolute URL.
pub fn origin_of(url: &str) -> anyhow::Result<String> {
    let url = Url::parse(url)?;
    let origin = url.origin();
    if !origin.is_tuple() {
        anyhow::bail!("{url} has no origin");
    }
    Ok(origin.ascii_serialization())
}

/// Access to the address bar.
pub trait Location: Send + Sync {
    /// Absolute URL currently shown.
    fn href(&self) -> String;

    /// Show `url` (absolute, or relative to the current href) without
    /// navigating and without adding a history entry.
    fn replace(&self, url: &str);
}

struct LocationState {
    href: Url,
    history_len: usize,
}

/// In-process address bar with a history counter.
pub struct MemoryLocation {
    state: Mutex<LocationState>,
}

impl MemoryLocation {
    pub fn new(href: &str) -> anyhow::Result<Self> {
        let href = Url::parse(href)?;
        Ok(Self {
            state: Mutex::new(LocationState {
                href,
                history_len: 1,
            }),
        })
    }

    /// Navigate to `url`, adding a history entry.
    pub fn push(&self, url: &str) -> anyhow::Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| anyhow::anyhow!("location lock poisoned"))?;
        state.href = state.href.join(url)?;
        state.history_len += 1;
        Ok(())
    }

    pub fn history_len(&self) -> usize {
        self.state.lock().map(|s| s.history_len).unwrap_or(0)
    }
}

impl Location for MemoryLocation {
    fn href(&self) -> String {
        self.state
            .lock()
            .map(|s| s.href.to_string())
            .unwrap_or_default()
    }

    fn replace(&self, url: &str) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        match state.href.join(url) {
            Ok(next) => state.href = next,
            Err(e) => tracing::warn!(url, error = %e, "ignoring unparseable location"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_keeps_history_length() {
        let loc = MemoryLocation::new("https://lti.example.edu/?a=1").unwrap();
        loc.replace("/page?b=2#top");
        assert_eq!(loc.href(), "https://lti.example.edu/page?b=2#top");
        assert_eq!(loc.history_len(), 1);
    }

    #[test]
    fn push_adds_history_entry() {
        let loc = MemoryLocation::new("https://lti.example.edu/").unwrap();
        loc.push("/actividad/a1").unwrap();
        assert_eq!(loc.href(), "https://lti.example.edu/actividad/a1");
        assert_eq!(loc.history_len(), 2);
    }

    #[test]
    fn origin_drops_path_and_query() {
        assert_eq!(
            origin_of("https://lti.example.edu:8443/a?lti_session=x").unwrap(),
            "https://lti.example.edu:8443"
        );
        assert!(origin_of("data:text/plain,hi").is_err());
    }

    #[test]
    fn rejects_relative_start() {
        assert!(MemoryLocation::new("/not-absolute").is_err());
    }
}
