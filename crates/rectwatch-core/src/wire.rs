use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::{Query, Rectangle};

/// Address the server listens on when none is configured.
pub const DEFAULT_ADDR: &str = "127.0.0.1:8090";

/// Body returned for any method other than GET and POST.
pub const METHOD_NOT_ALLOWED: &str = "Sorry, only GET and POST methods are supported.";

/// A status body sent back to the client when a request fails.
///
/// Successful requests return rectangles directly; this envelope only
/// carries errors and other non-data replies.
#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    /// Whether the request succeeded.
    pub status: ResponseStatus,
    /// Optional human-readable message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Status of a server response.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Error,
}

impl Response {
    /// Creates an error response with a message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: Some(message.into()),
        }
    }
}

impl From<&Error> for Response {
    fn from(e: &Error) -> Self {
        Self::error(e.to_string())
    }
}

/// Decodes a submitted query.
///
/// With `reject_negative` set, a rectangle with a negative width or height
/// anywhere in the query fails with [`Error::InvalidRectangle`].
pub fn decode_query(body: &[u8], reject_negative: bool) -> Result<Query> {
    let query: Query = serde_json::from_slice(body).map_err(|e| Error::malformed(e.to_string()))?;
    if reject_negative {
        check_dimensions(&query)?;
    }
    Ok(query)
}

fn check_dimensions(query: &Query) -> Result<()> {
    match query.rectangles().position(Rectangle::has_negative_dimension) {
        None => Ok(()),
        Some(0) => Err(Error::InvalidRectangle {
            position: "Main".into(),
        }),
        Some(i) => Err(Error::InvalidRectangle {
            position: format!("Input[{}]", i - 1),
        }),
    }
}
