//! Blocking HTTP client for the JSS classic REST API.
//!
//! Objects live below `<server>/JSSResource/<endpoint>` and are addressed as
//! `/id/<n>` or `/name/<name>`. All payloads are XML. A read-only client
//! performs GET requests only; writes are logged and reported as `None`.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use tracing::{debug, info, warn};
use xml_tree_core::{parse, ParseError};

use crate::api::{ApiError, ResourceApi};
use crate::identifier::Identifier;
use crate::resource::ResourceType;

/// Default timeout for HTTP requests (30 seconds)
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const API_ROOT: &str = "JSSResource";

/// A session with one JSS server.
pub struct JssClient {
    http: Client,
    base: Url,
    username: String,
    password: String,
    read_only: bool,
}

impl JssClient {
    /// Build a client without contacting the server.
    pub fn new(
        url: &str,
        username: &str,
        password: &str,
        read_only: bool,
    ) -> Result<Self, ApiError> {
        let root = format!("{}/{API_ROOT}", url.trim_end_matches('/'));
        let base = Url::parse(&root).map_err(|e| ApiError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                url: url.to_string(),
                message: "url cannot carry a path".to_string(),
            });
        }
        let http = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|source| ApiError::Transport { url: root, source })?;

        Ok(Self {
            http,
            base,
            username: username.to_string(),
            password: password.to_string(),
            read_only,
        })
    }

    /// Build a client and confirm the server answers by reading its version.
    pub fn connect(
        url: &str,
        username: &str,
        password: &str,
        read_only: bool,
    ) -> Result<Self, ApiError> {
        let client = Self::new(url, username, password, read_only)?;
        let version = client.version()?;
        info!(
            url,
            version = version.as_deref().unwrap_or("unknown"),
            read_only,
            "connected to JSS"
        );
        Ok(client)
    }

    /// Server version as reported by the `jssuser` resource.
    pub fn version(&self) -> Result<Option<String>, ApiError> {
        let url = self.url(&["jssuser"])?;
        let body = self.execute(Method::GET, &url, None)?;
        let root = parse(&body).map_err(|source| ApiError::InvalidResponse {
            url: url.to_string(),
            source,
        })?;
        Ok(root.get_text(&["version"]).map(str::to_string))
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl {
                url: self.base.to_string(),
                message: "url cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn object_url(&self, kind: ResourceType, id: &Identifier) -> Result<Url, ApiError> {
        let value = id.to_string();
        self.url(&[kind.descriptor().endpoint, id.lookup_key(), value.as_str()])
    }

    fn execute(&self, method: Method, url: &Url, body: Option<&str>) -> Result<String, ApiError> {
        debug!(%method, %url, "sending request");
        let mut request = self
            .http
            .request(method, url.clone())
            .basic_auth(&self.username, Some(&self.password))
            .header(ACCEPT, "application/xml");
        if let Some(body) = body {
            debug!(payload = body, "request body");
            request = request
                .header(CONTENT_TYPE, "text/xml")
                .body(body.to_string());
        }

        let transport = |source| ApiError::Transport {
            url: url.to_string(),
            source,
        };
        let response = request.send().map_err(transport)?;
        let status = response.status();
        let text = response.text().map_err(transport)?;
        if status.is_success() {
            Ok(text)
        } else {
            Err(status_error(status, url.as_str(), text))
        }
    }

    fn affected_id(url: &Url, body: &str) -> Result<Identifier, ApiError> {
        response_id(body)
            .map_err(|source| ApiError::InvalidResponse {
                url: url.to_string(),
                source,
            })?
            .ok_or_else(|| ApiError::MissingId {
                url: url.to_string(),
            })
    }
}

impl ResourceApi for JssClient {
    fn list(&mut self, kind: ResourceType) -> Result<Vec<Identifier>, ApiError> {
        let descriptor = kind.descriptor();
        let url = self.url(&[descriptor.endpoint])?;
        let body = self.execute(Method::GET, &url, None)?;
        parse_id_list(&body, descriptor.list_element).map_err(|source| {
            ApiError::InvalidResponse {
                url: url.to_string(),
                source,
            }
        })
    }

    fn get(&mut self, kind: ResourceType, id: &Identifier) -> Result<String, ApiError> {
        let url = self.object_url(kind, id)?;
        self.execute(Method::GET, &url, None)
    }

    fn create(
        &mut self,
        kind: ResourceType,
        document: &str,
    ) -> Result<Option<Identifier>, ApiError> {
        if self.read_only {
            info!(resource = %kind, "read-only session; create skipped");
            return Ok(None);
        }
        let url = self.url(&[kind.descriptor().endpoint, "id", "0"])?;
        let body = self.execute(Method::POST, &url, Some(document))?;
        Self::affected_id(&url, &body).map(Some)
    }

    fn delete(
        &mut self,
        kind: ResourceType,
        id: &Identifier,
    ) -> Result<Option<Identifier>, ApiError> {
        if self.read_only {
            info!(resource = %kind, identifier = %id, "read-only session; delete skipped");
            return Ok(None);
        }
        let url = self.object_url(kind, id)?;
        let body = self.execute(Method::DELETE, &url, None)?;
        Self::affected_id(&url, &body).map(Some)
    }
}

/// Ids of every `<list_element>` member of a collection listing, sorted.
fn parse_id_list(body: &str, list_element: &str) -> Result<Vec<Identifier>, ParseError> {
    let root = parse(body)?;
    let mut ids = Vec::new();
    for member in root.get_children(list_element) {
        match member
            .get_text(&["id"])
            .and_then(|text| text.trim().parse::<u64>().ok())
        {
            Some(id) => ids.push(id),
            None => warn!(element = list_element, "collection member without numeric id skipped"),
        }
    }
    ids.sort_unstable();
    Ok(ids.into_iter().map(Identifier::Id).collect())
}

/// The `<id>` a create or delete response reports.
fn response_id(body: &str) -> Result<Option<Identifier>, ParseError> {
    let root = parse(body)?;
    Ok(root
        .get_text(&["id"])
        .and_then(|text| Identifier::parse(text).ok()))
}

fn status_error(status: StatusCode, url: &str, body: String) -> ApiError {
    let message = body.trim().to_string();
    match status {
        StatusCode::CONFLICT => ApiError::Conflict {
            status: status.as_u16(),
            message,
        },
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized {
            url: url.to_string(),
        },
        _ => ApiError::Status {
            status: status.as_u16(),
            url: url.to_string(),
            message,
        },
    }
}
