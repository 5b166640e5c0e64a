//! One simulated browser tab: address bar, session storage and client.

use std::path::Path;

use aula_session::{
    capture_session, origin_of, ExecutionContext, MemoryLocation, ReqwestTransport,
    SessionClient, SessionStore,
};
use aula_store::LocalStore;

use crate::cmd_config::AulaConfig;

/// Global flags that decide how the tab is opened.
#[derive(Debug, Clone, Default)]
pub struct TabArgs {
    pub launch_url: Option<String>,
    pub base_url: Option<String>,
    pub server: bool,
}

pub struct Tab {
    pub context: ExecutionContext,
    pub location: MemoryLocation,
    pub client: SessionClient<ReqwestTransport>,
    /// Backend origin, keying durable storage.
    pub origin: String,
}

impl Tab {
    /// Load the launch URL into the address bar and capture the session
    /// token before any request is built.
    pub fn open(args: &TabArgs, config: &AulaConfig) -> anyhow::Result<Self> {
        let base_url = resolve_base_url(args, config)?;
        let href = args
            .launch_url
            .clone()
            .unwrap_or_else(|| format!("{}/", base_url.trim_end_matches('/')));

        let context = if args.server {
            ExecutionContext::Server
        } else {
            ExecutionContext::Browser
        };
        let location = MemoryLocation::new(&href)?;
        let session = if context.is_browser() {
            SessionStore::ephemeral()
        } else {
            SessionStore::unavailable()
        };
        if capture_session(context, &location, &session).is_some() {
            tracing::debug!("session token captured from launch URL");
        }

        let transport = ReqwestTransport::new(&base_url)?;
        let origin = origin_of(&base_url)?;
        Ok(Self {
            context,
            location,
            client: SessionClient::new(transport, session),
            origin,
        })
    }

    /// Durable per-origin storage under `store_root`.
    pub fn local_store(&self, store_root: &Path) -> LocalStore {
        LocalStore::open(store_root, &self.origin)
    }
}

/// `--base-url`, else config `base_url`, else the launch URL's origin.
fn resolve_base_url(args: &TabArgs, config: &AulaConfig) -> anyhow::Result<String> {
    if let Some(url) = args.base_url.clone().or_else(|| config.base_url.clone()) {
        return Ok(url);
    }
    match &args.launch_url {
        Some(launch) => origin_of(launch),
        None => anyhow::bail!(
            "no backend: pass --launch-url or --base-url, or run `aula config set base_url <url>`"
        ),
    }
}
