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

//! Request engine: one logical operation driven through retries and redirects

use crate::s3::config::{DEFAULT_RETRY_COUNT, DEFAULT_TIMEOUT, SslOptions};
use crate::s3::error::Error;
use crate::s3::handler::{Callbacks, CompletionHandler, Failure, FailureCause, RetryEvent};
use crate::s3::header_constants::LOCATION;
use crate::s3::listing::parse_listing;
use crate::s3::multimap_ext::Multimap;
use crate::s3::response::Response;
use crate::s3::transport::{Call, RequestBody, Transport};
use http::Method;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::task::JoinHandle;
use typed_builder::TypedBuilder;

pub const VALID_METHODS: [Method; 4] = [Method::HEAD, Method::GET, Method::PUT, Method::DELETE];

/// Statuses answered by following the `Location` header
pub const REDIRECT_STATUSES: [u16; 5] = [300, 301, 303, 304, 307];

/// Statuses answered by another attempt while retries are left. 0 stands
/// for "no status received".
pub const RETRYABLE_STATUSES: [u16; 11] = [0, 400, 401, 403, 404, 409, 411, 412, 416, 500, 503];

pub const DEFAULT_MAX_REDIRECTS: u32 = 10;

const UNUSUAL_RETRY_COUNT: u32 = 20;

/// What the engine does with a response status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    Redirect,
    Retry,
    Success,
}

pub fn classify(status: u16) -> Disposition {
    if REDIRECT_STATUSES.contains(&status) {
        Disposition::Redirect
    } else if RETRYABLE_STATUSES.contains(&status) {
        Disposition::Retry
    } else {
        Disposition::Success
    }
}

/// Options shared by every attempt of a request.
#[derive(Clone, Debug, PartialEq, TypedBuilder)]
pub struct RequestOptions {
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,
    /// Remaining retry budget
    #[builder(default = DEFAULT_RETRY_COUNT)]
    pub retry_count: u32,
    #[builder(default)]
    pub headers: Multimap,
    #[builder(default, setter(into))]
    pub body: RequestBody,
    #[builder(default)]
    pub ssl: SslOptions,
    #[builder(default = DEFAULT_MAX_REDIRECTS)]
    pub max_redirects: u32,
    /// Parse XML success bodies as a bucket listing
    #[builder(default = false)]
    pub parse_listing: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// One attempt of a logical operation. Retries and redirects never mutate a
/// request; they derive the next one with [`Request::next_attempt`].
pub struct Request {
    method: Method,
    url: String,
    options: RequestOptions,
    attempt: u32,
    redirects: u32,
    handler: Box<dyn CompletionHandler>,
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("options", &self.options)
            .field("attempt", &self.attempt)
            .field("redirects", &self.redirects)
            .finish_non_exhaustive()
    }
}

enum Step {
    Next(Request),
    Done(Result<(), Error>),
}

impl Request {
    /// Creates the first attempt of a request. Failures escalate until a
    /// handler is set with [`Request::with_handler`].
    pub fn new(method: Method, url: impl Into<String>, options: RequestOptions) -> Result<Self, Error> {
        if !VALID_METHODS.contains(&method) {
            return Err(Error::invalid(format!(
                "method must be one of HEAD, GET, PUT or DELETE; got {method}"
            )));
        }
        let url = url.into();
        let parsed =
            url::Url::parse(&url).map_err(|e| Error::invalid(format!("invalid url {url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::invalid(format!("unsupported url scheme in {url}")));
        }
        if options.retry_count > UNUSUAL_RETRY_COUNT {
            log::warn!("{method} {url}: retry budget {} is unusually large", options.retry_count);
        }

        Ok(Self {
            method,
            url,
            options,
            attempt: 0,
            redirects: 0,
            handler: Box::new(Callbacks::new()),
        })
    }

    pub fn with_handler(mut self, handler: impl CompletionHandler + 'static) -> Self {
        self.handler = Box::new(handler);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    pub fn retries_left(&self) -> u32 {
        self.options.retry_count
    }

    /// Number of attempts made before this one
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn redirects(&self) -> u32 {
        self.redirects
    }

    /// Derives the next attempt: the retry budget shrinks by `budget_delta`
    /// and the target becomes `new_url` when given. Everything else carries
    /// over.
    pub fn next_attempt(self, budget_delta: u32, new_url: Option<String>) -> Request {
        let redirected = new_url.is_some();
        Request {
            url: new_url.unwrap_or(self.url),
            options: RequestOptions {
                retry_count: self.options.retry_count.saturating_sub(budget_delta),
                ..self.options
            },
            attempt: self.attempt + 1,
            redirects: self.redirects + u32::from(redirected),
            method: self.method,
            handler: self.handler,
        }
    }

    /// Spawns the request on the tokio runtime.
    ///
    /// Dropping the returned [`Execution`] does not cancel the request; the
    /// handler still receives the outcome. A failure escalated by the
    /// handler is only reported by awaiting the `Execution`: once it is
    /// dropped, the escalation is lost apart from the error log line.
    pub fn execute(self, transport: Arc<dyn Transport>) -> Execution {
        Execution {
            handle: tokio::spawn(self.run(transport)),
        }
    }

    /// Drives the request until the handler received its outcome.
    ///
    /// Returns `Err` only for a terminal failure the handler escalated.
    pub async fn run(self, transport: Arc<dyn Transport>) -> Result<(), Error> {
        let mut request = self;
        loop {
            match request.attempt_once(transport.as_ref()).await {
                Step::Next(next) => request = next,
                Step::Done(result) => return result,
            }
        }
    }

    async fn attempt_once(self, transport: &dyn Transport) -> Step {
        log::debug!(
            "{} {} (attempt {}, {} retries left)",
            self.method,
            self.url,
            self.attempt + 1,
            self.options.retry_count
        );
        let call = Call {
            method: &self.method,
            url: &self.url,
            headers: &self.options.headers,
            timeout: self.options.timeout,
            ssl: &self.options.ssl,
            body: &self.options.body,
        };
        let outcome = transport.dispatch(call).await;

        match outcome {
            Ok(resp) => {
                let status = resp.status();
                match classify(status) {
                    Disposition::Redirect => self.redirect(resp),
                    Disposition::Retry => {
                        self.retry(status, format!("status {status}"), FailureCause::Response(resp))
                    }
                    Disposition::Success => self.succeed(resp).await,
                }
            }
            Err(err) if err.is_retryable() => {
                self.retry(0, err.to_string(), FailureCause::Transport(err))
            }
            Err(err) => Step::Done(self.fail(FailureCause::Transport(err))),
        }
    }

    fn redirect(self, resp: Response) -> Step {
        let location = resp
            .header(LOCATION)
            .map(str::trim)
            .filter(|l| !l.is_empty());
        let Some(target) = location.and_then(|l| self.resolve(l)) else {
            return Step::Done(self.fail(FailureCause::MissingRedirectTarget));
        };
        if self.redirects >= self.options.max_redirects {
            let hops = self.redirects;
            return Step::Done(self.fail(FailureCause::TooManyRedirects(hops)));
        }

        log::info!(
            "{} {} redirected ({}) to {target}",
            self.method,
            self.url,
            resp.status()
        );
        Step::Next(self.next_attempt(0, Some(target)))
    }

    /// Absolute locations are followed verbatim, relative ones resolve
    /// against the current URL.
    fn resolve(&self, location: &str) -> Option<String> {
        if url::Url::parse(location).is_ok() {
            return Some(location.to_string());
        }
        url::Url::parse(&self.url)
            .and_then(|base| base.join(location))
            .map(|u| u.to_string())
            .ok()
    }

    fn retry(mut self, status: u16, reason: String, cause: FailureCause) -> Step {
        if self.options.retry_count == 0 {
            return Step::Done(self.fail(cause));
        }

        let event = RetryEvent {
            method: self.method.clone(),
            url: self.url.clone(),
            attempt: self.attempt + 1,
            status,
            retries_left: self.options.retry_count - 1,
            reason,
        };
        log::info!(
            "{} {} failed ({}), retrying; {} retries left after this one",
            event.method,
            event.url,
            event.reason,
            event.retries_left
        );
        self.handler.on_retry(&event);
        Step::Next(self.next_attempt(1, None))
    }

    async fn succeed(mut self, mut resp: Response) -> Step {
        if self.options.parse_listing && resp.is_xml() {
            let listing = match resp.buffer().await {
                Ok(body) => parse_listing(&body),
                Err(e) => Err(e),
            };
            match listing {
                Ok(entries) => resp.set_listing(entries),
                Err(e) => {
                    return Step::Done(self.fail(FailureCause::InvalidListing(e.to_string())));
                }
            }
        }

        log::debug!("{} {} succeeded ({})", self.method, self.url, resp.status());
        self.handler.on_success(resp);
        Step::Done(Ok(()))
    }

    fn fail(mut self, cause: FailureCause) -> Result<(), Error> {
        let failure = Failure {
            method: self.method.clone(),
            url: self.url.clone(),
            attempts: self.attempt + 1,
            cause,
        };
        log::error!("{failure}");
        self.handler.on_error(failure).map_err(|failure| {
            let err = failure.into_error();
            log::error!("no error handler, escalating: {err}");
            err
        })
    }
}

/// Handle of a spawned request. Resolves once the handler received the
/// outcome; resolves to `Err` for an escalated failure. Escalations are
/// only observable by awaiting it.
#[must_use = "escalated failures are only reported through the Execution"]
#[derive(Debug)]
pub struct Execution {
    handle: JoinHandle<Result<(), Error>>,
}

impl Future for Execution {
    type Output = Result<(), Error>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle)
            .poll(cx)
            .map(|joined| joined.unwrap_or_else(|e| Err(Error::TaskAborted(e.to_string()))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::s3::multimap_ext::MultimapExt;

    const URL: &str = "https://bucket.s3.amazonaws.com:443/the-key";

    #[test]
    fn test_classify() {
        for status in [300, 301, 303, 304, 307] {
            assert_eq!(classify(status), Disposition::Redirect, "{status}");
        }
        for status in [0, 400, 401, 403, 404, 409, 411, 412, 416, 500, 503] {
            assert_eq!(classify(status), Disposition::Retry, "{status}");
        }
        for status in [200, 201, 204, 206, 302, 308, 402, 405, 410, 501, 502, 504] {
            assert_eq!(classify(status), Disposition::Success, "{status}");
        }
    }

    #[test]
    fn test_new_rejects_unknown_methods() {
        for method in [Method::POST, Method::PATCH, Method::OPTIONS] {
            assert!(matches!(
                Request::new(method, URL, RequestOptions::default()),
                Err(Error::InvalidArgument(_))
            ));
        }
        for method in VALID_METHODS {
            assert!(Request::new(method, URL, RequestOptions::default()).is_ok());
        }
    }

    #[test]
    fn test_new_rejects_bad_urls() {
        assert!(Request::new(Method::GET, "not a url", RequestOptions::default()).is_err());
        assert!(Request::new(Method::GET, "ftp://host/key", RequestOptions::default()).is_err());
    }

    #[test]
    fn test_options_defaults() {
        let options = RequestOptions::default();
        assert_eq!(options.timeout, Duration::from_secs(10));
        assert_eq!(options.retry_count, 4);
        assert_eq!(options.max_redirects, 10);
        assert!(options.body.is_empty());
        assert!(!options.ssl.verify_peer);
        assert!(!options.parse_listing);
    }

    #[test]
    fn test_next_attempt_for_retry() {
        let mut headers = Multimap::new();
        headers.add("x-amz-acl", "public-read");
        let options = RequestOptions::builder()
            .headers(headers.clone())
            .body(RequestBody::Data("data".into()))
            .build();
        let request = Request::new(Method::PUT, URL, options).unwrap();

        let next = request.next_attempt(1, None);
        assert_eq!(next.method(), &Method::PUT);
        assert_eq!(next.url(), URL);
        assert_eq!(next.retries_left(), 3);
        assert_eq!(next.attempt(), 1);
        assert_eq!(next.redirects(), 0);
        assert_eq!(next.options().headers, headers);
        assert_eq!(next.options().body, RequestBody::Data("data".into()));
    }

    #[test]
    fn test_next_attempt_for_redirect() {
        let request = Request::new(Method::GET, URL, RequestOptions::default()).unwrap();
        let next = request.next_attempt(0, Some("https://elsewhere:443/the-key".to_string()));
        assert_eq!(next.url(), "https://elsewhere:443/the-key");
        assert_eq!(next.retries_left(), 4);
        assert_eq!(next.attempt(), 1);
        assert_eq!(next.redirects(), 1);
    }

    #[test]
    fn test_next_attempt_budget_does_not_underflow() {
        let options = RequestOptions::builder().retry_count(0).build();
        let request = Request::new(Method::GET, URL, options).unwrap();
        assert_eq!(request.next_attempt(1, None).retries_left(), 0);
    }

    #[test]
    fn test_resolve_location() {
        let request = Request::new(Method::GET, URL, RequestOptions::default()).unwrap();
        assert_eq!(
            request.resolve("https://other.example.com:8443/x").as_deref(),
            Some("https://other.example.com:8443/x")
        );
        assert_eq!(
            request.resolve("/other-key").as_deref(),
            Some("https://bucket.s3.amazonaws.com/other-key")
        );
    }
}
