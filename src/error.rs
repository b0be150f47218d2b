use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug, Serialize, Deserialize, PartialEq, Clone)]
pub enum ClientError {
    #[error("Error creating Client: {0}")]
    CreateClient(String),

    #[error("Error executing query: {0}")]
    Execute(String),

    #[error("Error reading query results: {0}")]
    Fetch(String),

    #[error("Interactive authentication is not implemented")]
    InteractiveAuth,

    #[error("Error parsing URL {0}: {1}")]
    ParseUrl(String, String),

    #[error("{0}")]
    Render(String),

    #[error("Getting ticket failed: {0}")]
    Ticket(String),

    #[error("Unhandled scheme {0:?}")]
    UnhandledScheme(String),

    #[error("Unsupported arrow type {0:?}")]
    UnsupportedType(String),

    #[error("Error during warmup request: {0}")]
    Warmup(String),

    #[error("Error writing output: {0}")]
    Write(String),
}
