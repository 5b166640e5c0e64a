use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{CACHE_CONTROL, COOKIE, PRAGMA, SET_COOKIE};
use reqwest::multipart::{Form, Part};
use reqwest::Url;

use crate::request::{
    Body, CacheMode, Credentials, FilePart, HttpResponse, RequestConfig, Transport,
    TransportError,
};

/// HTTP transport over reqwest.
///
/// Paths resolve against `base_url`, the origin the app was served from.
/// Cookies live in a jar and travel according to each request's
/// [`Credentials`] mode.
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
    jar: Arc<Jar>,
}

impl ReqwestTransport {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let base_url = Url::parse(base_url).map_err(|e| TransportError::InvalidUrl {
            path: base_url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            jar: Arc::new(Jar::default()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Cookie jar shared by all requests of this transport.
    pub fn jar(&self) -> &Jar {
        &self.jar
    }

    fn resolve(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path)
            .map_err(|e| TransportError::InvalidUrl {
                path: path.to_string(),
                reason: e.to_string(),
            })
    }

    fn sends_cookies(&self, credentials: Credentials, url: &Url) -> bool {
        match credentials {
            Credentials::Include => true,
            Credentials::SameOrigin => url.origin() == self.base_url.origin(),
            Credentials::Omit => false,
        }
    }
}

fn multipart_form(parts: Vec<FilePart>) -> Result<Form, TransportError> {
    let mut form = Form::new();
    for p in parts {
        let mut part = Part::bytes(p.bytes).file_name(p.file_name);
        if let Some(ct) = p.content_type {
            part = part
                .mime_str(&ct)
                .map_err(|e| TransportError::Body(e.to_string()))?;
        }
        form = form.part(p.field, part);
    }
    Ok(form)
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        path: &str,
        config: RequestConfig,
    ) -> Result<HttpResponse, TransportError> {
        let url = self.resolve(path)?;
        let with_cookies = self.sends_cookies(config.credentials, &url);

        let mut builder = self.client.request(config.method, url.clone());
        for (name, value) in &config.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if with_cookies {
            if let Some(cookies) = self.jar.cookies(&url) {
                builder = builder.header(COOKIE, cookies);
            }
        }
        if config.cache == CacheMode::NoCache {
            builder = builder
                .header(CACHE_CONTROL, "no-cache")
                .header(PRAGMA, "no-cache");
        }
        builder = match config.body {
            Body::Empty => builder,
            Body::Json(value) => {
                let bytes =
                    serde_json::to_vec(&value).map_err(|e| TransportError::Body(e.to_string()))?;
                builder.body(bytes)
            }
            Body::Multipart(parts) => builder.multipart(multipart_form(parts)?),
        };

        let resp = builder
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let status = resp.status().as_u16();
        if with_cookies {
            let mut set_cookies = resp.headers().get_all(SET_COOKIE).iter();
            self.jar.set_cookies(&mut set_cookies, &url);
        }
        let body = resp
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}
