// MinIO Rust Library for Amazon S3 Compatible Cloud Storage
// Copyright 2025 MinIO, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error definitions for S3 operations

use std::time::Duration;
use thiserror::Error;

/// Failure raised by a [`Transport`](crate::s3::transport::Transport) before
/// any HTTP status was available.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("TLS setup failed: {0}")]
    Tls(String),

    #[error("request body unavailable: {0}")]
    Body(String),

    #[error("transport failure: {0}")]
    Other(String),
}

impl TransportError {
    /// Local setup problems cannot be fixed by sending the same request again.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, TransportError::Tls(_) | TransportError::Body(_))
    }

    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(timeout)
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else if err.is_body() || err.is_builder() {
            TransportError::Body(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

/// Error definitions
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("need AWS Access Key Id and AWS Secret Key")]
    MissingCredentials,

    #[error("{method} {url}: could not find the location to redirect to, empty location header?")]
    MissingRedirectTarget { method: String, url: String },

    #[error("{method} {url}: gave up after following {hops} redirects")]
    TooManyRedirects {
        method: String,
        url: String,
        hops: u32,
    },

    #[error("{method} {url}: failed response; {reason}")]
    RequestFailed {
        method: String,
        url: String,
        reason: String,
    },

    #[error("invalid bucket listing: {0}")]
    InvalidListing(String),

    #[error("request task aborted: {0}")]
    TaskAborted(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    XmlParse(#[from] xmltree::ParseError),

    #[error(transparent)]
    TimeParse(#[from] chrono::ParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }
}
