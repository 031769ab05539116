// MinIO Rust Library for Amazon S3 Compatible Cloud Storage
// Copyright 2022 MinIO, Inc.
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

//! Asynchronous Simple Storage Service (aka S3) client core

pub mod bucket;
pub mod builders;
pub mod config;
pub mod creds;
pub mod error;
pub mod handler;
pub mod header_constants;
pub mod http;
pub mod item;
pub mod listing;
mod locator;
pub mod multimap_ext;
pub mod request;
pub mod response;
pub mod signer;
pub mod transport;
pub mod utils;


pub use bucket::Bucket;
pub use config::{Config, Protocol, SslOptions};
pub use handler::{Callbacks, CompletionHandler, Failure, FailureCause, RetryEvent};
pub use item::Item;
pub use locator::is_valid_header;
pub use request::{Execution, Request, RequestOptions};
pub use response::Response;
pub use transport::{ReqwestTransport, Transport};
