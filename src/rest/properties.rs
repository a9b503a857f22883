/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString, IntoStaticStr};

/// Content filter level of a photo.
///
/// See [Content filters](https://www.flickrhelp.com/hc/en-us/articles/4404064206996-Content-filters)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, IntoStaticStr, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SafetyLevel {
    Safe,
    Moderate,
    Restricted,
}

impl SafetyLevel {
    /// Wire value as returned in the `safety_level` attribute
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "0" => Some(SafetyLevel::Safe),
            "1" => Some(SafetyLevel::Moderate),
            "2" => Some(SafetyLevel::Restricted),
            _ => None,
        }
    }
}

/// Precision to which a photo's date taken is known.
///
/// See [Dates](https://www.flickr.com/services/api/misc.dates.html)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, IntoStaticStr, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TakenGranularity {
    Second,
    Month,
    Year,
    Circa,
}

impl TakenGranularity {
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "0" => Some(TakenGranularity::Second),
            "4" => Some(TakenGranularity::Month),
            "6" => Some(TakenGranularity::Year),
            "8" => Some(TakenGranularity::Circa),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, IntoStaticStr, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MediaType {
    Photo,
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, IntoStaticStr)]
pub enum HttpMethod {
    #[strum(serialize = "GET")]
    Get,
    #[strum(serialize = "POST")]
    Post,
}
