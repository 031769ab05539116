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

/// Multimap for string key and string value
pub type Multimap = multimap::MultiMap<String, String>;

pub trait MultimapExt {
    /// Adds a key-value pair to the multimap
    fn add<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V);

    /// Adds a multimap to the current multimap
    fn add_multimap(&mut self, other: Multimap);

    /// Returns the last value stored under `key`, comparing names
    /// case-insensitively. Among case variants the greatest name wins.
    fn get_ignore_case(&self, key: &str) -> Option<&str>;

    fn contains_key_ignore_case(&self, key: &str) -> bool {
        self.get_ignore_case(key).is_some()
    }

    /// Removes every case variant of `key`
    fn remove_ignore_case(&mut self, key: &str);
}

impl MultimapExt for Multimap {
    fn add<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.insert(key.into(), value.into());
    }

    fn add_multimap(&mut self, other: Multimap) {
        for (key, values) in other.into_iter() {
            self.insert_many(key, values);
        }
    }

    fn get_ignore_case(&self, key: &str) -> Option<&str> {
        self.iter_all()
            .filter(|(k, _)| k.eq_ignore_ascii_case(key))
            .max_by(|(a, _), (b, _)| a.cmp(b))
            .and_then(|(_, values)| values.last())
            .map(String::as_str)
    }

    fn remove_ignore_case(&mut self, key: &str) {
        let variants: Vec<String> = self
            .keys()
            .filter(|k| k.eq_ignore_ascii_case(key))
            .cloned()
            .collect();
        for variant in variants {
            self.remove(&variant);
        }
    }
}
