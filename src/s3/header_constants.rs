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

//! Header names used while building, signing and classifying requests

pub const AUTHORIZATION: &str = "Authorization";

pub const DATE: &str = "date";

pub const CONTENT_TYPE: &str = "content-type";

pub const CONTENT_MD5: &str = "content-md5";

pub const CONTENT_LENGTH: &str = "Content-Length";

pub const LOCATION: &str = "location";

pub const X_AMZ_PREFIX: &str = "x-amz-";

pub const X_AMZ_ACL: &str = "x-amz-acl";

pub const X_AMZ_DATE: &str = "x-amz-date";

/// Caller supplied headers must be one of these or carry the `x-amz-` prefix.
pub const VALID_HEADERS: [&str; 8] = [
    "Cache-Control",
    "Content-Disposition",
    "Content-Encoding",
    "Content-Length",
    "Content-MD5",
    "Content-Type",
    "Expect",
    "Expires",
];
