/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use num_enum::TryFromPrimitive;
use std::io;
use thiserror::Error;

/// Error conditions that can be returned
#[derive(Error, Debug)]
pub enum FlickrError {
    #[error("I/O error")]
    Io(#[from] io::Error),

    #[error("Request network error")]
    Request(#[from] reqwest::Error),

    #[error("URL Parse error")]
    UrlParsing(#[from] url::ParseError),

    #[error("Deserialization error")]
    Deserialization(#[from] serde_json::Error),

    #[error("HTTP request failed with status {status}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Server disconnected: {0}")]
    Disconnected(String),

    #[error("Unable to parse response as XML ({body:?}), got error {reason}")]
    InvalidXml { reason: String, body: String },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Unable to find license with ID {0}")]
    LicenseNotFound(String),

    #[error("Expected response missing: {0}")]
    UnexpectedResponse(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Authorization error. {0}")]
    Auth(String),
}

impl FlickrError {
    /// Returns true for transient failures that might succeed if the call is repeated.
    ///
    /// That covers 5xx responses, timeouts, dropped connections, bodies that
    /// aren't XML, and the service's own "temporarily unavailable" code. Anything
    /// else (permissions, missing resources, bad keys) is returned as-is.
    pub fn is_retryable(&self) -> bool {
        match self {
            FlickrError::HttpStatus { status, .. } => (500..600).contains(status),
            FlickrError::Timeout(_) | FlickrError::Disconnected(_) => true,
            FlickrError::InvalidXml { .. } => true,
            FlickrError::Api(api_err) => api_err.is_service_unavailable(),
            _ => false,
        }
    }

    /// Returns the service error inside this error, if there is one
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            FlickrError::Api(api_err) => Some(api_err),
            _ => None,
        }
    }
}

/// Failures reported by the service in a `stat="fail"` envelope.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Flickr API rejected the API key as invalid ({0})")]
    InvalidApiKey(String),

    #[error("{0}")]
    ResourceNotFound(String),

    #[error("Unable to retrieve private photo {0}")]
    PhotoIsPrivate(String),

    #[error("User {0} has been deleted")]
    UserDeleted(String),

    #[error("Insufficient permissions to comment on photo {0}")]
    InsufficientPermissionsToComment(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Unrecognised Flickr API error: code {code}, msg: {message}")]
    Unrecognised { code: String, message: String },
}

impl ApiError {
    fn is_service_unavailable(&self) -> bool {
        match self {
            ApiError::Unrecognised { code, .. } => code
                .parse::<u32>()
                .ok()
                .and_then(|c| KnownErrorCode::try_from(c).ok())
                .is_some_and(|c| matches!(c, KnownErrorCode::ServiceNotAvailable)),
            _ => false,
        }
    }
}

/// Error codes with a fixed meaning regardless of the method called
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u32)]
pub enum KnownErrorCode {
    InvalidApiKey = 100,
    ServiceNotAvailable = 201,
}

/// Per-call mapping from service error codes to the error they mean for that method.
///
/// The same code means different things on different endpoints (`1` is "not
/// found" on lookups and "required parameter missing" elsewhere) so each call
/// supplies its own table.
#[derive(Debug, Clone, Default)]
pub struct ErrorOverrides(Vec<(String, ApiError)>);

impl ErrorOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, code: &str, err: ApiError) -> Self {
        self.0.push((code.to_string(), err));
        self
    }

    fn get(&self, code: &str) -> Option<&ApiError> {
        self.0.iter().find(|(c, _)| c == code).map(|(_, e)| e)
    }
}

/// Picks the error for a failure envelope.
///
/// Code `100` is always an invalid key, then the caller's overrides are
/// consulted, and anything left over is returned unrecognised with the raw
/// code and message.
pub fn classify_failure(code: &str, message: &str, overrides: &ErrorOverrides) -> ApiError {
    let known = code
        .parse::<u32>()
        .ok()
        .and_then(|c| KnownErrorCode::try_from(c).ok());
    if let Some(KnownErrorCode::InvalidApiKey) = known {
        return ApiError::InvalidApiKey(message.to_string());
    }

    match overrides.get(code) {
        Some(err) => err.clone(),
        None => ApiError::Unrecognised {
            code: code.to_string(),
            message: message.to_string(),
        },
    }
}
