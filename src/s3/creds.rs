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

//! Credentials used to sign requests

use crate::s3::error::Error;
use std::fmt;

#[derive(Clone, PartialEq, Eq)]
/// Credentials contain access key id and secret key. Both are non-empty.
pub struct Credentials {
    access_key: String,
    secret_key: String,
}

impl Credentials {
    /// Returns credentials with given access key and secret key
    ///
    /// # Examples
    ///
    /// ```
    /// use s3_courier::s3::creds::Credentials;
    /// let creds = Credentials::new("minioadmin", "minio123").unwrap();
    /// assert_eq!(creds.access_key(), "minioadmin");
    /// assert!(Credentials::new("", "").is_err());
    /// ```
    pub fn new(access_key: &str, secret_key: &str) -> Result<Self, Error> {
        if access_key.trim().is_empty() || secret_key.trim().is_empty() {
            return Err(Error::MissingCredentials);
        }
        Ok(Self {
            access_key: access_key.to_string(),
            secret_key: secret_key.to_string(),
        })
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    pub(crate) fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}
