//! Diagnostic error types for the dataset pipeline.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text. Filtering rejections are not errors and
//! never show up here; they are silent per-record skips in the loader.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the dataset pipeline.
#[derive(Debug, Error, Diagnostic)]
pub enum DatasetError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Persist(#[from] PersistError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Endpoint(#[from] EndpointError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Split(#[from] SplitError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Ingest(#[from] IngestError),
}

// ---------------------------------------------------------------------------
// Persistence errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum PersistError {
    #[error("cannot open {path} for writing: {source}")]
    #[diagnostic(
        code(kge::persist::create),
        help(
            "The path you provided is not valid. Check that the parent directory \
             exists and is writable."
        )
    )]
    Create {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot open {path} for reading: {source}")]
    #[diagnostic(
        code(kge::persist::open),
        help("The path you provided is not valid. Check that the file exists and is readable.")
    )]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error for {path}: {message}")]
    #[diagnostic(
        code(kge::persist::serde),
        help(
            "Failed to encode or decode the dataset container. The file may be \
             truncated or was not written by this tool."
        )
    )]
    Serialization { path: String, message: String },

    #[error("incompatible container in {path}: expected {expected}, found {found}")]
    #[diagnostic(
        code(kge::persist::format),
        help("The file was written by an incompatible version. Re-export the dataset.")
    )]
    IncompatibleFormat {
        path: String,
        expected: String,
        found: String,
    },

    #[error("triplet {triplet} in {path} refers past the vocabularies ({entities} entities, {relations} relations)")]
    #[diagnostic(
        code(kge::persist::dangling_id),
        help("The container is inconsistent. Rebuild it from the source data.")
    )]
    DanglingId {
        path: String,
        triplet: String,
        entities: usize,
        relations: usize,
    },
}

// ---------------------------------------------------------------------------
// Endpoint errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum EndpointError {
    #[error("endpoint answered with HTTP status {status}")]
    #[diagnostic(
        code(kge::endpoint::status),
        help(
            "The SPARQL endpoint rejected the query. Check the query text (extra \
             fragments are appended verbatim) and the endpoint's rate limits."
        )
    )]
    Status { status: u16, body: String },

    #[error("transport error reaching {url}: {message}")]
    #[diagnostic(
        code(kge::endpoint::transport),
        help("The endpoint could not be reached. Check the URL and your network connection.")
    )]
    Transport { url: String, message: String },

    #[error("cannot decode endpoint response: {message}")]
    #[diagnostic(
        code(kge::endpoint::decode),
        help(
            "The response body is not SPARQL JSON results. Make sure the endpoint \
             honours `Accept: application/sparql-results+json`."
        )
    )]
    Decode { message: String },
}

// ---------------------------------------------------------------------------
// Split errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SplitError {
    #[error("train ratio must lie strictly between 0 and 1, got {ratio}")]
    #[diagnostic(
        code(kge::split::ratio),
        help("Use a fraction such as 0.8 (80% train, 10% valid, 10% test).")
    )]
    InvalidRatio { ratio: f64 },
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    #[diagnostic(code(kge::config::read), help("Check that the config file exists."))]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config {path}: {message}")]
    #[diagnostic(
        code(kge::config::parse),
        help("The config must be TOML. Unknown keys are rejected.")
    )]
    Parse { path: String, message: String },

    #[error("cannot write config {path}: {message}")]
    #[diagnostic(code(kge::config::write))]
    Write { path: String, message: String },
}

// ---------------------------------------------------------------------------
// Ingest errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum IngestError {
    #[error("failed reading line {line}: {source}")]
    #[diagnostic(
        code(kge::ingest::read),
        help("The input stream broke off or is not valid UTF-8.")
    )]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for functions returning pipeline results.
pub type DatasetResult<T> = std::result::Result<T, DatasetError>;
