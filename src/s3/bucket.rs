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

//! Bucket level operations

use crate::s3::builders::{DeleteBucket, HeadBucket, ListBucket, Operation};
use crate::s3::config::Config;
use crate::s3::error::Error;
use crate::s3::http::Url;
use crate::s3::locator::Locator;
use crate::s3::transport::Transport;
use std::sync::Arc;

/// A bucket on an S3 compatible server.
///
/// `prefix` and `delimiter` of the configuration restrict listings made with
/// [`Bucket::get`].
///
/// ```no_run
/// use s3_courier::s3::{Bucket, Config};
///
/// # async fn example() -> Result<(), s3_courier::s3::error::Error> {
/// let config = Config::default().credentials("abc", "123").prefix("photos/");
/// let bucket = Bucket::new("my-bucket", config)?;
/// let response = bucket.get().send().await?;
/// for entry in response.listing().unwrap_or_default() {
///     println!("{:?}", entry.get("key"));
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Bucket {
    locator: Locator,
}

impl Bucket {
    pub fn new(bucket: &str, config: Config) -> Result<Self, Error> {
        Ok(Self {
            locator: Locator::new(bucket, None, config)?,
        })
    }

    /// Sends every request of this bucket through `transport`
    pub fn with_transport(self, transport: Arc<dyn Transport>) -> Self {
        Self {
            locator: self.locator.with_transport(transport),
        }
    }

    pub fn name(&self) -> &str {
        self.locator.bucket()
    }

    pub fn config(&self) -> &Config {
        self.locator.config()
    }

    /// Host the bucket is addressed at
    pub fn server(&self) -> String {
        self.locator.host()
    }

    /// Path of the bucket, with or without the bucket segment
    pub fn path(&self, with_bucket: bool) -> String {
        self.locator.path(with_bucket)
    }

    /// Path including the listing query
    pub fn path_with_query(&self) -> String {
        self.locator.sign_path()
    }

    pub fn url(&self) -> Url {
        self.locator.url()
    }

    /// Lists the bucket. XML responses carry the parsed entries in
    /// [`Response::listing`](crate::s3::response::Response::listing).
    pub fn get(&self) -> ListBucket {
        Operation::new(self.locator.clone())
    }

    pub fn head(&self) -> HeadBucket {
        Operation::new(self.locator.clone())
    }

    pub fn delete(&self) -> DeleteBucket {
        Operation::new(self.locator.clone())
    }
}
