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

//! Completion callbacks of a request

use crate::s3::error::{Error, TransportError};
use crate::s3::response::Response;
use http::Method;
use std::fmt;

/// Why a request gave up.
#[derive(Debug)]
pub enum FailureCause {
    /// The server answered with a retryable status and no retries were left
    Response(Response),
    /// No status was received and no retries were left, or the error is not
    /// retryable
    Transport(TransportError),
    /// Redirect status without a usable `Location` header
    MissingRedirectTarget,
    /// The redirect hop limit was reached
    TooManyRedirects(u32),
    /// A successful listing response could not be parsed
    InvalidListing(String),
}

/// Terminal failure of a request, handed to [`CompletionHandler::on_error`].
#[derive(Debug)]
pub struct Failure {
    pub method: Method,
    /// URL of the last attempt
    pub url: String,
    /// Number of attempts made, counting redirects
    pub attempts: u32,
    pub cause: FailureCause,
}

impl Failure {
    /// Status of the last response, if the server answered
    pub fn status(&self) -> Option<u16> {
        match &self.cause {
            FailureCause::Response(resp) => Some(resp.status()),
            _ => None,
        }
    }

    pub fn response(&self) -> Option<&Response> {
        match &self.cause {
            FailureCause::Response(resp) => Some(resp),
            _ => None,
        }
    }

    pub fn into_error(self) -> Error {
        let method = self.method.to_string();
        match self.cause {
            FailureCause::Response(resp) => Error::RequestFailed {
                method,
                url: self.url,
                reason: format!("status {}", resp.status()),
            },
            FailureCause::Transport(err) => Error::Transport(err),
            FailureCause::MissingRedirectTarget => Error::MissingRedirectTarget {
                method,
                url: self.url,
            },
            FailureCause::TooManyRedirects(hops) => Error::TooManyRedirects {
                method,
                url: self.url,
                hops,
            },
            FailureCause::InvalidListing(reason) => Error::InvalidListing(reason),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} failed after {} attempt(s): ", self.method, self.url, self.attempts)?;
        match &self.cause {
            FailureCause::Response(resp) => write!(f, "status {}", resp.status()),
            FailureCause::Transport(err) => write!(f, "{err}"),
            FailureCause::MissingRedirectTarget => f.write_str("redirect without location"),
            FailureCause::TooManyRedirects(hops) => write!(f, "{hops} redirects"),
            FailureCause::InvalidListing(reason) => write!(f, "invalid listing: {reason}"),
        }
    }
}

/// Notice that an attempt failed and another one follows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryEvent {
    pub method: Method,
    pub url: String,
    /// 1-based number of the attempt that failed
    pub attempt: u32,
    /// Status of the failed attempt, 0 when there was none
    pub status: u16,
    /// Retries left after the one about to start
    pub retries_left: u32,
    pub reason: String,
}

/// Receives the outcome of a request. Exactly one of `on_success` and
/// `on_error` is called per request; `on_retry` may be called before that.
pub trait CompletionHandler: Send {
    fn on_success(&mut self, response: Response);

    /// Handles a terminal failure. Returning `Err` escalates it: the
    /// request's [`Execution`](crate::s3::request::Execution) resolves to the
    /// matching [`Error`].
    fn on_error(&mut self, failure: Failure) -> Result<(), Failure> {
        Err(failure)
    }

    fn on_retry(&mut self, _event: &RetryEvent) {}
}

impl<H: CompletionHandler + ?Sized> CompletionHandler for Box<H> {
    fn on_success(&mut self, response: Response) {
        (**self).on_success(response)
    }

    fn on_error(&mut self, failure: Failure) -> Result<(), Failure> {
        (**self).on_error(failure)
    }

    fn on_retry(&mut self, event: &RetryEvent) {
        (**self).on_retry(event)
    }
}

type SuccessFn = Box<dyn FnOnce(Response) + Send>;
type ErrorFn = Box<dyn FnOnce(Failure) + Send>;
type RetryFn = Box<dyn FnMut(&RetryEvent) + Send>;

/// [`CompletionHandler`] made of optional closures. Failures escalate when
/// no error closure is set.
#[derive(Default)]
pub struct Callbacks {
    on_success: Option<SuccessFn>,
    on_error: Option<ErrorFn>,
    on_retry: Option<RetryFn>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success<F: FnOnce(Response) + Send + 'static>(mut self, f: F) -> Self {
        self.on_success = Some(Box::new(f));
        self
    }

    pub fn error<F: FnOnce(Failure) + Send + 'static>(mut self, f: F) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    pub fn retry<F: FnMut(&RetryEvent) + Send + 'static>(mut self, f: F) -> Self {
        self.on_retry = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_retry", &self.on_retry.is_some())
            .finish()
    }
}

impl CompletionHandler for Callbacks {
    fn on_success(&mut self, response: Response) {
        if let Some(f) = self.on_success.take() {
            f(response);
        }
    }

    fn on_error(&mut self, failure: Failure) -> Result<(), Failure> {
        match self.on_error.take() {
            Some(f) => {
                f(failure);
                Ok(())
            }
            None => Err(failure),
        }
    }

    fn on_retry(&mut self, event: &RetryEvent) {
        if let Some(f) = self.on_retry.as_mut() {
            f(event);
        }
    }
}
