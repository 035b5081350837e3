//! A minimal GitHub organisation client.
//!
//! The client never talks to the network itself. It reads JSON documents
//! through a [`FetchJson`] source, which callers implement over whatever HTTP
//! stack they use (or over a fixed route table in tests). Both the
//! organisation document and the repository listing are fetched at most once
//! per client.

use std::{rc::Rc, sync::Arc};

use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    memo::Memo,
    nested::access_nested_map,
};

/// Organisation metadata endpoint; `{org}` is replaced by the organisation name.
pub const ORG_URL: &str = "https://api.github.com/orgs/{org}";

/// A source of decoded JSON documents, addressed by URL.
pub trait FetchJson {
    /// Fetches `url` and returns its decoded body.
    ///
    /// # Errors
    ///
    /// Implementations return [`Error::Http`] when the URL cannot be served.
    fn get_json(&self, url: &str) -> Result<Value>;
}

impl<T: FetchJson + ?Sized> FetchJson for &T {
    fn get_json(&self, url: &str) -> Result<Value> {
        (**self).get_json(url)
    }
}

impl<T: FetchJson + ?Sized> FetchJson for Box<T> {
    fn get_json(&self, url: &str) -> Result<Value> {
        (**self).get_json(url)
    }
}

impl<T: FetchJson + ?Sized> FetchJson for Rc<T> {
    fn get_json(&self, url: &str) -> Result<Value> {
        (**self).get_json(url)
    }
}

impl<T: FetchJson + ?Sized> FetchJson for Arc<T> {
    fn get_json(&self, url: &str) -> Result<Value> {
        (**self).get_json(url)
    }
}

/// Fetches `url` from `source`, logging the request and any failure.
pub fn get_json<S: FetchJson + ?Sized>(source: &S, url: &str) -> Result<Value> {
    debug!(url, "fetching JSON");
    source.get_json(url).inspect_err(|error| {
        warn!(url, %error, "fetch failed");
    })
}

/// Client for one GitHub organisation.
#[derive(Debug)]
pub struct GithubOrgClient<S> {
    org_name: String,
    source: S,
    org: Memo<Value>,
    repos_payload: Memo<Value>,
}

impl<S: FetchJson> GithubOrgClient<S> {
    pub fn new(org_name: impl Into<String>, source: S) -> Self {
        Self {
            org_name: org_name.into(),
            source,
            org: Memo::new(),
            repos_payload: Memo::new(),
        }
    }

    pub fn org_name(&self) -> &str {
        &self.org_name
    }

    /// The organisation metadata URL, built from [`ORG_URL`].
    pub fn org_url(&self) -> String {
        ORG_URL.replace("{org}", &self.org_name)
    }

    /// The organisation document. Fetched on first access only.
    pub fn org(&self) -> Result<&Value> {
        self.org
            .get_or_try_init(|| get_json(&self.source, &self.org_url()))
    }

    /// The `repos_url` advertised by the organisation document.
    pub fn public_repos_url(&self) -> Result<String> {
        access_nested_map(self.org()?, &["repos_url"])?
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| Error::UnexpectedPayload {
                url: self.org_url(),
                what: "repos_url".to_owned(),
                expected: "a string",
            })
    }

    /// The repository listing. Fetched on first access only.
    pub fn repos_payload(&self) -> Result<&Value> {
        self.repos_payload.get_or_try_init(|| {
            let url = self.public_repos_url()?;
            get_json(&self.source, &url)
        })
    }

    /// Names of the organisation's public repositories, in listing order.
    ///
    /// With `license` set, only repositories whose `license.key` equals it are
    /// returned.
    ///
    /// # Errors
    ///
    /// Propagates fetch failures, and fails with [`Error::UnexpectedPayload`]
    /// when the listing is not an array or a repository has no string `name`.
    pub fn public_repos(&self, license: Option<&str>) -> Result<Vec<String>> {
        let repos = self.repos_payload()?;
        // The organisation document is already cached once the listing is.
        let url = self.public_repos_url()?;
        let repos = repos
            .as_array()
            .ok_or_else(|| Error::UnexpectedPayload {
                url: url.clone(),
                what: "repository listing".to_owned(),
                expected: "an array",
            })?;

        repos
            .iter()
            .filter(|repo| license.is_none_or(|key| has_license(repo, key)))
            .map(|repo| {
                access_nested_map(repo, &["name"])?
                    .as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| Error::UnexpectedPayload {
                        url: url.clone(),
                        what: "repository name".to_owned(),
                        expected: "a string",
                    })
            })
            .collect()
    }
}

/// Returns `true` if `repo.license.key` equals `license_key`.
///
/// Repositories without license data never match.
pub fn has_license(repo: &Value, license_key: &str) -> bool {
    access_nested_map(repo, &["license", "key"])
        .ok()
        .and_then(Value::as_str)
        == Some(license_key)
}
