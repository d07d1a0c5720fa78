//! SPARQL endpoint access.
//!
//! [`QueryExecutor`] is the seam between the dataset and whatever answers
//! queries. [`SparqlEndpoint`] answers them over HTTP with `ureq`; tests and
//! offline tools plug in closures or canned responses.

use std::io::Read;
use std::time::Duration;

use serde::Deserialize;

use crate::binding::RawTriplet;
use crate::error::EndpointError;

/// Public Wikidata query service.
pub const WIKIDATA_ENDPOINT: &str = "https://query.wikidata.org/bigdata/namespace/wdq/sparql";

const ACCEPT: &str = "application/sparql-results+json";

/// What an executor got back for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResponse {
    /// HTTP status (or an equivalent code for non-HTTP executors).
    pub status: u16,
    /// Result rows. Empty when the status is not a success.
    pub bindings: Vec<RawTriplet>,
    /// Response body of a failed request, for diagnostics.
    pub body: String,
}

impl QueryResponse {
    pub fn ok(bindings: Vec<RawTriplet>) -> Self {
        Self {
            status: 200,
            bindings,
            body: String::new(),
        }
    }

    pub fn failed(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            bindings: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes query text and returns result rows.
pub trait QueryExecutor {
    fn execute(&self, query: &str) -> Result<QueryResponse, EndpointError>;
}

impl<F> QueryExecutor for F
where
    F: Fn(&str) -> Result<QueryResponse, EndpointError>,
{
    fn execute(&self, query: &str) -> Result<QueryResponse, EndpointError> {
        self(query)
    }
}

#[derive(Deserialize)]
struct SparqlResults {
    results: ResultRows,
}

#[derive(Deserialize)]
struct ResultRows {
    bindings: Vec<RawTriplet>,
}

/// Decode a SPARQL JSON results document into triplet rows.
///
/// Every row must bind `subject`, `predicate` and `object`.
pub fn decode_results(body: &str) -> Result<Vec<RawTriplet>, EndpointError> {
    let parsed: SparqlResults =
        serde_json::from_str(body).map_err(|e| EndpointError::Decode {
            message: e.to_string(),
        })?;
    Ok(parsed.results.bindings)
}

/// Blocking HTTP client for a SPARQL endpoint.
pub struct SparqlEndpoint {
    url: String,
    agent: ureq::Agent,
}

impl SparqlEndpoint {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            url: url.into(),
            agent,
        }
    }

    /// The public Wikidata endpoint with a one-minute timeout.
    pub fn wikidata() -> Self {
        Self::new(WIKIDATA_ENDPOINT, Duration::from_secs(60))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl QueryExecutor for SparqlEndpoint {
    fn execute(&self, query: &str) -> Result<QueryResponse, EndpointError> {
        tracing::debug!(url = %self.url, bytes = query.len(), "sending SPARQL query");

        match self
            .agent
            .get(&self.url)
            .query("query", query)
            .set("Accept", ACCEPT)
            .call()
        {
            Ok(response) => {
                let status = response.status();
                // `into_string` caps bodies at 10 MB; result sets can be larger.
                let mut body = String::new();
                response
                    .into_reader()
                    .read_to_string(&mut body)
                    .map_err(|e| EndpointError::Decode {
                        message: format!("failed to read body: {e}"),
                    })?;
                let bindings = decode_results(&body)?;
                tracing::debug!(status, rows = bindings.len(), "SPARQL response");
                Ok(QueryResponse {
                    status,
                    bindings,
                    body: String::new(),
                })
            }
            Err(ureq::Error::Status(code, response)) => {
                let body = error_body(response.into_string());
                tracing::warn!(status = code, "SPARQL endpoint returned an error status");
                Ok(QueryResponse::failed(code, body))
            }
            Err(ureq::Error::Transport(transport)) => Err(EndpointError::Transport {
                url: self.url.clone(),
                message: transport.to_string(),
            }),
        }
    }
}

/// Body of an error response, or a marker naming why it could not be read.
fn error_body(read: std::io::Result<String>) -> String {
    read.unwrap_or_else(|e| format!("<unreadable body: {e}>"))
}

impl std::fmt::Debug for SparqlEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SparqlEndpoint")
            .field("url", &self.url)
            .finish()
    }
}
