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

//! Signature V2 (HMAC-SHA1) for S3 API

use crate::s3::creds::Credentials;
use crate::s3::error::Error;
use crate::s3::header_constants::{
    AUTHORIZATION, CONTENT_MD5, CONTENT_TYPE, DATE, X_AMZ_DATE, X_AMZ_PREFIX,
};
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::utils::{UtcTime, to_http_header_value, utc_now};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use http::Method;
use lazy_static::lazy_static;
use regex::Regex;
use sha1::Sha1;
use std::collections::BTreeMap;

lazy_static! {
    /// Sub-resources that take part in the signature, in the order they are appended.
    static ref SUB_RESOURCES: [(Regex, &'static str); 4] = [
        (Regex::new(r"[&?]acl($|&|=)").unwrap(), "?acl"),
        (Regex::new(r"[&?]torrent($|&|=)").unwrap(), "?torrent"),
        (Regex::new(r"[&?]location($|&|=)").unwrap(), "?location"),
        (Regex::new(r"[&?]logging($|&|=)").unwrap(), "?logging"),
    ];
}

/// Returns HMAC-SHA1 hash for given key and data
pub fn hmac_sha1(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut hasher = Hmac::<Sha1>::new_from_slice(key).expect("HMAC can take key of any size");
    hasher.update(data);
    hasher.finalize().into_bytes().to_vec()
}

/// Returns the base64 signature of a canonical request description
pub fn generate_signature(secret_key: &str, request_description: &str) -> String {
    BASE64
        .encode(hmac_sha1(
            secret_key.as_bytes(),
            request_description.as_bytes(),
        ))
        .trim_end()
        .to_string()
}

fn is_amz_header(name: &str) -> bool {
    name.starts_with(X_AMZ_PREFIX)
}

/// Returns the canonical request description (string-to-sign) for given
/// method, path and headers.
///
/// Header names compare case-insensitively and several values of one header
/// are joined with `,`. `path` may carry a query string; it is dropped from
/// the description except for the `acl`, `torrent`, `location` and `logging`
/// sub-resources.
pub fn canonical_request_description(method: &Method, path: &str, headers: &Multimap) -> String {
    // case variants of a name fold together in byte order of the original names
    let mut names: Vec<&String> = headers.keys().collect();
    names.sort();
    let mut folded: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for name in names {
        let lower = name.to_lowercase();
        if is_amz_header(&lower) || lower == CONTENT_MD5 || lower == CONTENT_TYPE || lower == DATE {
            let values = headers.get_vec(name).into_iter().flatten();
            folded.entry(lower).or_default().extend(values.map(|v| v.trim()));
        }
    }
    let mut attributes: BTreeMap<String, String> = folded
        .into_iter()
        .map(|(name, values)| (name, values.join(",")))
        .collect();
    attributes.entry(CONTENT_TYPE.to_string()).or_default();
    attributes.entry(CONTENT_MD5.to_string()).or_default();
    if attributes.contains_key(X_AMZ_DATE) {
        attributes.insert(DATE.to_string(), String::new());
    }

    let mut description = format!("{method}\n");
    for (name, value) in &attributes {
        if is_amz_header(name) {
            description.push_str(name);
            description.push(':');
        }
        description.push_str(value);
        description.push('\n');
    }

    description.push_str(path.split_once('?').map_or(path, |(p, _)| p));
    for (pattern, sub_resource) in SUB_RESOURCES.iter() {
        if pattern.is_match(path) {
            description.push_str(sub_resource);
        }
    }
    description
}

/// Signs requests with AWS Signature Version 2.
#[derive(Clone, Debug)]
pub struct Signer {
    credentials: Credentials,
}

impl Signer {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Returns a signer for given access key and secret key
    pub fn from_keys(access_key: &str, secret_key: &str) -> Result<Self, Error> {
        Ok(Self::new(Credentials::new(access_key, secret_key)?))
    }

    pub fn access_key(&self) -> &str {
        self.credentials.access_key()
    }

    /// Signs headers for given method and path at the current time.
    ///
    /// The returned map holds every given header plus `Authorization` and
    /// `date`. A caller supplied `date` header is kept as is.
    pub fn sign(&self, method: &Method, path: &str, headers: Multimap) -> Multimap {
        self.sign_at(method, path, headers, utc_now())
    }

    /// Signs headers as [`Signer::sign`] does, using `date` when no `date`
    /// header is present.
    pub fn sign_at(&self, method: &Method, path: &str, headers: Multimap, date: UtcTime) -> Multimap {
        let mut headers = headers;
        if !headers.contains_key_ignore_case(DATE) {
            headers.add(DATE, to_http_header_value(date));
        }

        let request_description = canonical_request_description(method, path, &headers);
        let signature = generate_signature(self.credentials.secret_key(), &request_description);
        log::trace!("signed {request_description:?} for {}", self.access_key());

        headers.remove_ignore_case(AUTHORIZATION);
        headers.add(
            AUTHORIZATION,
            format!("AWS {}:{signature}", self.credentials.access_key()),
        );
        headers
    }
}
