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

//! Argument builders for [Bucket](crate::s3::bucket::Bucket) and
//! [Item](crate::s3::item::Item) operations

use crate::s3::config::SslOptions;
use crate::s3::error::Error;
use crate::s3::handler::{Callbacks, CompletionHandler, Failure, RetryEvent};
use crate::s3::locator::Locator;
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::request::{Execution, Request, RequestOptions};
use crate::s3::response::Response;
use crate::s3::transport::RequestBody;
use bytes::Bytes;
use http::Method;
use std::fmt;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::oneshot;

/// Fixed traits of an operation kind.
pub trait OperationKind: Send {
    const METHOD: Method;
    /// Adds `x-amz-acl` for non-private permissions
    const WITH_PERMISSIONS: bool = false;
    /// Exactly one of data or file must be given
    const NEEDS_BODY: bool = false;
    const PARSE_LISTING: bool = false;
}

macro_rules! operation_kind {
    ($(#[$doc:meta])* $name:ident, $kind:ident, $method:expr $(, $flag:ident)*) => {
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $kind;

        impl OperationKind for $kind {
            const METHOD: Method = $method;
            $(const $flag: bool = true;)*
        }

        $(#[$doc])*
        pub type $name = Operation<$kind>;
    };
}

operation_kind!(
    /// Argument builder for [Bucket::get()](crate::s3::bucket::Bucket::get)
    ListBucket, ListBucketKind, Method::GET, PARSE_LISTING
);
operation_kind!(
    /// Argument builder for [Bucket::head()](crate::s3::bucket::Bucket::head)
    HeadBucket, HeadBucketKind, Method::HEAD
);
operation_kind!(
    /// Argument builder for [Bucket::delete()](crate::s3::bucket::Bucket::delete)
    DeleteBucket, DeleteBucketKind, Method::DELETE
);
operation_kind!(
    /// Argument builder for [Item::head()](crate::s3::item::Item::head)
    HeadItem, HeadItemKind, Method::HEAD
);
operation_kind!(
    /// Argument builder for [Item::get()](crate::s3::item::Item::get)
    GetItem, GetItemKind, Method::GET
);
operation_kind!(
    /// Argument builder for [Item::put()](crate::s3::item::Item::put)
    PutItem, PutItemKind, Method::PUT, WITH_PERMISSIONS, NEEDS_BODY
);
operation_kind!(
    /// Argument builder for [Item::delete()](crate::s3::item::Item::delete)
    DeleteItem, DeleteItemKind, Method::DELETE
);

/// Converts an argument builder into a ready to run [`Request`].
pub trait ToRequest: Sized {
    fn to_request(self) -> Result<Request, Error>;
}

/// Parameters of one operation on a bucket or item. Per call settings
/// override the resource configuration.
pub struct Operation<K: OperationKind> {
    locator: Locator,
    extra_headers: Multimap,
    data: Option<Bytes>,
    file: Option<PathBuf>,
    timeout: Option<Duration>,
    retry_count: Option<u32>,
    ssl: Option<SslOptions>,
    max_redirects: Option<u32>,
    callbacks: Callbacks,
    handler: Option<Box<dyn CompletionHandler>>,
    _operation: PhantomData<K>,
}

impl<K: OperationKind> fmt::Debug for Operation<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("method", &K::METHOD)
            .field("locator", &self.locator)
            .field("extra_headers", &self.extra_headers)
            .field("data", &self.data.as_ref().map(Bytes::len))
            .field("file", &self.file)
            .field("callbacks", &self.callbacks)
            .field("handler", &self.handler.is_some())
            .finish_non_exhaustive()
    }
}

impl<K: OperationKind> Operation<K> {
    pub(crate) fn new(locator: Locator) -> Self {
        Self {
            locator,
            extra_headers: Multimap::new(),
            data: None,
            file: None,
            timeout: None,
            retry_count: None,
            ssl: None,
            max_redirects: None,
            callbacks: Callbacks::new(),
            handler: None,
            _operation: PhantomData,
        }
    }

    /// Adds a request header. Only whitelisted names and `x-amz-` headers
    /// are accepted when the request is built.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.add(name, value);
        self
    }

    pub fn headers(mut self, headers: Multimap) -> Self {
        self.extra_headers.add_multimap(headers);
        self
    }

    /// Sends `data` as the request body
    pub fn data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Streams the file at `path` as the request body
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = Some(retry_count);
        self
    }

    pub fn ssl(mut self, ssl: SslOptions) -> Self {
        self.ssl = Some(ssl);
        self
    }

    pub fn max_redirects(mut self, max_redirects: u32) -> Self {
        self.max_redirects = Some(max_redirects);
        self
    }

    pub fn on_success<F: FnOnce(Response) + Send + 'static>(mut self, f: F) -> Self {
        self.callbacks = self.callbacks.success(f);
        self
    }

    pub fn on_error<F: FnOnce(Failure) + Send + 'static>(mut self, f: F) -> Self {
        self.callbacks = self.callbacks.error(f);
        self
    }

    pub fn on_retry<F: FnMut(&RetryEvent) + Send + 'static>(mut self, f: F) -> Self {
        self.callbacks = self.callbacks.retry(f);
        self
    }

    /// Replaces the individual callbacks with `handler`
    pub fn handler(mut self, handler: impl CompletionHandler + 'static) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    fn body(&mut self) -> Result<RequestBody, Error> {
        match (self.data.take(), self.file.take()) {
            (Some(_), Some(_)) => Err(Error::invalid("give either data or a file, not both")),
            (Some(data), None) => Ok(RequestBody::Data(data)),
            (None, Some(file)) => Ok(RequestBody::File(file)),
            (None, None) if K::NEEDS_BODY => Err(Error::invalid("need data or a file to send")),
            (None, None) => Ok(RequestBody::Empty),
        }
    }

    fn build(mut self) -> Result<(Request, Box<dyn CompletionHandler>), Error> {
        let method = K::METHOD;
        let body = self.body()?;
        let headers = self.locator.build_headers(
            &method,
            std::mem::take(&mut self.extra_headers),
            K::WITH_PERMISSIONS,
        )?;

        let config = self.locator.config();
        let options = RequestOptions::builder()
            .timeout(self.timeout.unwrap_or(config.timeout))
            .retry_count(self.retry_count.unwrap_or(config.retry_count))
            .headers(headers)
            .body(body)
            .ssl(self.ssl.unwrap_or_else(|| config.ssl.clone()))
            .parse_listing(K::PARSE_LISTING)
            .build();
        let options = match self.max_redirects {
            Some(max_redirects) => RequestOptions {
                max_redirects,
                ..options
            },
            None => options,
        };

        let request = Request::new(method, self.locator.url().to_string(), options)?;
        let handler = self
            .handler
            .unwrap_or_else(|| Box::new(self.callbacks));
        Ok((request, handler))
    }

    /// Spawns the operation on the tokio runtime.
    ///
    /// Without an error callback a terminal failure escalates through the
    /// returned [`Execution`], so it must be awaited for the failure to
    /// reach the caller. Use [`Operation::send`] to get it as `Err` directly.
    pub fn execute(self) -> Result<Execution, Error> {
        let transport = self.locator.transport();
        Ok(self.to_request()?.execute(transport))
    }

    /// Runs the operation to completion and returns the final response.
    ///
    /// Set callbacks only observe retries here; the response is returned
    /// and failures come back as `Err`.
    pub async fn send(self) -> Result<Response, Error> {
        let transport = self.locator.transport();
        let (request, observer) = self.build()?;
        let (tx, rx) = oneshot::channel();
        request
            .with_handler(Capture {
                tx: Some(tx),
                observer,
            })
            .run(transport)
            .await?;
        rx.await
            .map_err(|_| Error::TaskAborted("request finished without a response".into()))
    }
}

impl<K: OperationKind> ToRequest for Operation<K> {
    fn to_request(self) -> Result<Request, Error> {
        let (request, handler) = self.build()?;
        Ok(request.with_handler(handler))
    }
}

/// Hands the response of [`Operation::send`] back to the caller.
struct Capture {
    tx: Option<oneshot::Sender<Response>>,
    observer: Box<dyn CompletionHandler>,
}

impl CompletionHandler for Capture {
    fn on_success(&mut self, response: Response) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(response);
        }
    }

    fn on_retry(&mut self, event: &RetryEvent) {
        self.observer.on_retry(event)
    }
}
