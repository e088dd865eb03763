//! # CouchDB Backend
//!
//! Blocking HTTP client for a CouchDB-compatible server. Namespaces are
//! databases; documents are addressed as `/<namespace>/<key>` with both
//! parts percent-encoded as single path segments. Revision tokens are
//! CouchDB `_rev` values, so a stale save comes back as HTTP 409.

use std::fmt;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use url::Url;

use crate::document::{DocumentKey, VersionedDocument};

use super::backend::DocumentStore;
use super::errors::{StoreError, StoreResult};

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Username and password for basic authentication
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    fn basic_auth_header(&self) -> String {
        let raw = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(raw))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct WriteResponse {
    rev: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    reason: String,
}

/// CouchDB document store
pub struct CouchStore {
    agent: ureq::Agent,
    base: Url,
    auth_header: String,
}

impl fmt::Debug for CouchStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CouchStore")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

impl CouchStore {
    /// Build a client without contacting the server
    pub fn new(url: &str, credentials: &Credentials, timeout: Duration) -> StoreResult<Self> {
        let base = Url::parse(url)
            .map_err(|e| StoreError::Unreachable(format!("invalid store URL '{}': {}", url, e)))?;
        if base.cannot_be_a_base() {
            return Err(StoreError::Unreachable(format!(
                "store URL '{}' cannot hold paths",
                url
            )));
        }

        let agent = ureq::AgentBuilder::new().timeout(timeout).build();

        Ok(Self {
            agent,
            base,
            auth_header: credentials.basic_auth_header(),
        })
    }

    /// Build a client and prove the server is reachable and accepts the
    /// credentials by listing its databases.
    pub fn connect(url: &str, credentials: &Credentials) -> StoreResult<Self> {
        let store = Self::new(url, credentials, DEFAULT_TIMEOUT)?;
        store.list_namespaces()?;
        Ok(store)
    }

    /// The server base URL
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url_for(&self, segments: &[&str]) -> StoreResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Protocol("store URL cannot hold paths".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: &str, url: &Url) -> ureq::Request {
        self.agent
            .request(method, url.as_str())
            .set("Authorization", &self.auth_header)
            .set("Accept", "application/json")
    }

    fn write(
        &self,
        namespace: &str,
        doc: &VersionedDocument,
    ) -> StoreResult<VersionedDocument> {
        let url = self.url_for(&[namespace, &doc.id])?;
        let result = self.request("PUT", &url).send_json(doc);

        match result {
            Ok(resp) => {
                let body: WriteResponse = resp
                    .into_json()
                    .map_err(|e| StoreError::Protocol(format!("invalid write response: {}", e)))?;
                let mut stored = doc.clone();
                stored.revision = Some(body.rev);
                Ok(stored)
            }
            Err(ureq::Error::Status(409, _)) => Err(StoreError::Conflict {
                namespace: namespace.to_string(),
                key: doc.id.clone(),
            }),
            Err(ureq::Error::Status(404, _)) => {
                Err(StoreError::NamespaceNotFound(namespace.to_string()))
            }
            Err(e) => Err(map_error(e)),
        }
    }
}

fn map_error(e: ureq::Error) -> StoreError {
    match e {
        ureq::Error::Status(401, _) | ureq::Error::Status(403, _) => StoreError::Unauthorized,
        ureq::Error::Status(code, resp) => {
            let url = resp.get_url().to_string();
            let body: ErrorBody = resp.into_json().unwrap_or_default();
            StoreError::Protocol(format!(
                "HTTP {} from {}: {} {}",
                code, url, body.error, body.reason
            ))
        }
        ureq::Error::Transport(t) => StoreError::Unreachable(t.to_string()),
    }
}

impl DocumentStore for CouchStore {
    fn list_namespaces(&self) -> StoreResult<Vec<String>> {
        let url = self.url_for(&["_all_dbs"])?;
        let resp = self.request("GET", &url).call().map_err(map_error)?;
        resp.into_json::<Vec<String>>()
            .map_err(|e| StoreError::Protocol(format!("invalid database list: {}", e)))
    }

    fn fetch(&self, namespace: &str, key: &DocumentKey) -> StoreResult<Option<VersionedDocument>> {
        let url = self.url_for(&[namespace, key.as_str()])?;

        match self.request("GET", &url).call() {
            Ok(resp) => {
                let doc = resp
                    .into_json::<VersionedDocument>()
                    .map_err(|e| StoreError::Serialization(e.to_string()))?;
                Ok(Some(doc))
            }
            Err(ureq::Error::Status(404, resp)) => {
                // Missing database and missing document share the status code
                let body: ErrorBody = resp.into_json().unwrap_or_default();
                if body.reason.contains("Database does not exist") {
                    Err(StoreError::NamespaceNotFound(namespace.to_string()))
                } else {
                    Ok(None)
                }
            }
            Err(e) => Err(map_error(e)),
        }
    }

    fn create(&self, namespace: &str, doc: &VersionedDocument) -> StoreResult<VersionedDocument> {
        let mut fresh = doc.clone();
        fresh.revision = None;
        self.write(namespace, &fresh)
    }

    fn save(&self, namespace: &str, doc: &VersionedDocument) -> StoreResult<VersionedDocument> {
        self.write(namespace, doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials::new("admin", "s3cret")
    }

    #[test]
    fn test_basic_auth_header() {
        // base64("admin:s3cret")
        assert_eq!(creds().basic_auth_header(), "Basic YWRtaW46czNjcmV0");
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let debug = format!("{:?}", creds());
        assert!(debug.contains("admin"));
        assert!(!debug.contains("s3cret"));
    }

    #[test]
    fn test_store_debug_hides_auth_header() {
        let store = CouchStore::new("http://localhost:5984", &creds(), DEFAULT_TIMEOUT).unwrap();
        let debug = format!("{:?}", store);
        assert!(debug.contains("localhost:5984"));
        assert!(!debug.contains("YWRtaW46czNjcmV0"));
    }

    #[test]
    fn test_document_url() {
        let store = CouchStore::new("http://localhost:5984", &creds(), DEFAULT_TIMEOUT).unwrap();
        let url = store.url_for(&["pyc_pkg", "code:pkg.util"]).unwrap();
        assert!(url.path().starts_with("/pyc_pkg/code"));
        assert!(url.path().ends_with("pkg.util"));
    }

    #[test]
    fn test_key_is_a_single_segment() {
        let store = CouchStore::new("http://localhost:5984/", &creds(), DEFAULT_TIMEOUT).unwrap();
        let url = store.url_for(&["pyc_pkg", "code:a/b"]).unwrap();
        assert!(url.path().contains("%2F"));
        assert!(!url.path().starts_with("//"));
    }

    #[test]
    fn test_base_path_is_kept() {
        let store = CouchStore::new("http://proxy:8080/couch", &creds(), DEFAULT_TIMEOUT).unwrap();
        let url = store.url_for(&["_all_dbs"]).unwrap();
        assert_eq!(url.path(), "/couch/_all_dbs");
    }

    #[test]
    fn test_invalid_url() {
        let result = CouchStore::new("not a url", &creds(), DEFAULT_TIMEOUT);
        assert!(matches!(result, Err(StoreError::Unreachable(_))));

        let result = CouchStore::new("mailto:admin@example.com", &creds(), DEFAULT_TIMEOUT);
        assert!(matches!(result, Err(StoreError::Unreachable(_))));
    }

    #[test]
    fn test_connect_refused_is_unreachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let result = CouchStore::connect(&format!("http://127.0.0.1:{}", port), &creds());
        assert!(matches!(result, Err(StoreError::Unreachable(_))));
    }
}
