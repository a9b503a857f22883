/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Values of the machine tags on a photo, keyed by `namespace:predicate`.
///
/// See [Machine tags](https://www.flickr.com/groups/51035612836@N01/discuss/72057594082858050/)
pub type MachineTags = BTreeMap<String, Vec<String>>;

/// A tag as entered by a member, from a single photo lookup.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Tag {
    pub author_id: String,
    pub author_name: String,
    pub raw_value: String,
    pub normalized_value: String,
    pub is_machine_tag: bool,
}

/// Splits one tag of the form `namespace:predicate=value`.
///
/// Returns `None` for ordinary keyword tags. Namespace and predicate must both
/// be non-empty and the predicate may not contain another `:`.
pub fn split_machine_tag(tag: &str) -> Option<(&str, &str, &str)> {
    let (namespace_predicate, value) = tag.split_once('=')?;
    let (namespace, predicate) = namespace_predicate.split_once(':')?;
    if namespace.is_empty() || predicate.is_empty() || predicate.contains(':') {
        return None;
    }
    Some((namespace, predicate, value))
}

/// Groups the machine tags in a list of tags, keeping the order values appear in.
pub fn get_machine_tags<S: AsRef<str>>(tags: &[S]) -> MachineTags {
    let mut result = MachineTags::new();
    for tag in tags {
        if let Some((namespace, predicate, value)) = split_machine_tag(tag.as_ref()) {
            result
                .entry(format!("{namespace}:{predicate}"))
                .or_default()
                .push(value.to_string());
        }
    }
    result
}
