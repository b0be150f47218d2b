//! Session and transport setup.
//!
//! Resolves the target URL into a `host:port` address plus a transport
//! security variant, and builds the outgoing metadata attached to every
//! Flight call for the lifetime of one query invocation.

use url::Url;

use crate::error::{ClientError, Result};

const DATABASE_HEADER: &str = "database";
/// Fixed flag enabling server-side debug queries.
const DEBUG_HEADER: &str = "x-debug";
const TRACE_ID_HEADER: &str = "x-trace-id";
const TRACE_ID_HEADER_ALT: &str = "uber-trace-id";
/// Span/parent/flags suffix appended to generated trace identifiers.
const TRACE_ID_SUFFIX: &str = "1112223334445:0:1";

/// Transport security for the gRPC channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Plaintext,
    Tls,
}

/// A resolved `host:port` target and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub addr: String,
    pub transport: Transport,
}

/// Parse a `scheme://host[:port]` URL into a connection target.
///
/// `http` defaults to port 80 and a plaintext channel, `https` to port 443
/// and TLS with default trust-store validation. Any other scheme is a
/// configuration error.
pub fn parse_target(url: &str) -> Result<Target> {
    let parsed = Url::parse(url).map_err(|e| ClientError::ParseUrl(url.into(), e.to_string()))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| ClientError::ParseUrl(url.into(), "missing host".into()))?;

    let (transport, default_port) = match parsed.scheme() {
        "http" => (Transport::Plaintext, 80),
        "https" => (Transport::Tls, 443),
        scheme => return Err(ClientError::UnhandledScheme(scheme.into())),
    };
    let port = parsed.port().unwrap_or(default_port);

    Ok(Target {
        addr: format!("{host}:{port}"),
        transport,
    })
}

/// Outgoing metadata for one query invocation.
///
/// Built once before connecting; the builder methods consume `self`, so a
/// constructed session never changes under a live connection.
#[derive(Debug, Clone)]
pub struct Session {
    headers: Vec<(String, String)>,
}

impl Session {
    pub fn new(database: &str, token: &str) -> Session {
        Session {
            headers: vec![
                (DATABASE_HEADER.into(), database.into()),
                // the token goes out in plain `authorization` form rather
                // than through the Flight handshake
                ("authorization".into(), format!("Token {token}")),
                (DEBUG_HEADER.into(), "true".into()),
            ],
        }
    }

    /// Append user-supplied header pairs.
    pub fn with_headers(mut self, pairs: Vec<(String, String)>) -> Session {
        self.headers.extend(pairs);
        self
    }

    /// Attach a trace identifier under both trace header names.
    pub fn with_trace_id(mut self, trace_id: &str) -> Session {
        let value = format!("{trace_id}:{TRACE_ID_SUFFIX}");
        self.headers.push((TRACE_ID_HEADER.into(), value.clone()));
        self.headers.push((TRACE_ID_HEADER_ALT.into(), value));
        self
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}

/// Generate a fresh 8-byte trace identifier, hex-encoded.
pub fn generate_trace_id() -> String {
    let bytes: [u8; 8] = rand::random();
    hex::encode(bytes)
}
