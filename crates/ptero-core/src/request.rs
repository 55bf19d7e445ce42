//! Authenticated request construction.

use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::transport::PanelRequest;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::Method;
use url::Url;

const APPLICATION_JSON: &str = "application/json";

/// Percent-encode a caller-supplied identifier as a single path segment.
///
/// Every character outside the unreserved set is escaped, so `/`, `?` and `#`
/// stay inside the segment.
///
/// # Errors
///
/// Returns [`Error::InvalidRequest`] for an empty identifier or for `.` and
/// `..`, which would address a different path once the URL is normalized.
pub fn path_segment(identifier: &str) -> Result<String> {
    if identifier.is_empty() || identifier == "." || identifier == ".." {
        return Err(Error::InvalidRequest(format!(
            "`{identifier}` is not a valid resource identifier"
        )));
    }
    Ok(urlencoding::encode(identifier).into_owned())
}

impl Credentials {
    /// Build a request for `path` under this scope's API root.
    ///
    /// `path` is appended verbatim to `{panel_url}/api/{scope}`; it is not
    /// otherwise checked. Query pairs are appended when present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the resulting URL does not parse.
    pub fn build_request(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<Vec<u8>>,
    ) -> Result<PanelRequest> {
        let raw = format!("{}{path}", self.api_root());
        let mut url = Url::parse(&raw)
            .map_err(|err| Error::InvalidEndpoint(format!("Invalid panel path `{path}`: {err}")))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        let mut headers = HeaderMap::new();
        let user_agent = HeaderValue::from_str(self.user_agent())
            .map_err(|err| Error::ConfigError(format!("Invalid User-Agent: {err}")))?;
        headers.insert(USER_AGENT, user_agent);
        headers.insert(AUTHORIZATION, self.authorization()?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));

        Ok(PanelRequest {
            method,
            url,
            headers,
            body,
        })
    }
}
