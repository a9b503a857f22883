/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::errors::FlickrError;
use crate::rest::xml::XmlElement;
use crate::rest::{DateTaken, Location, MediaType, SafetyLevel, Size, TakenGranularity};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::str::FromStr;

// Sizes advertised on collection items through the `url_*` extras
const COLLECTION_SIZES: [(&str, &str); 7] = [
    ("sq", "Square"),
    ("q", "Large Square"),
    ("t", "Thumbnail"),
    ("s", "Small"),
    ("m", "Medium"),
    ("l", "Large"),
    ("o", "Original"),
];

// Strings that may be "" and sets to None
pub fn from_empty_str_to_none(s: Option<&str>) -> Option<String> {
    s.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Parses a Unix timestamp, which is how posted/updated/created dates are sent.
pub fn parse_timestamp(ts: &str) -> Result<DateTime<Utc>, FlickrError> {
    ts.trim()
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| FlickrError::UnexpectedResponse(format!("Invalid timestamp {ts:?}")))
}

// Parses safety level
pub fn parse_safety_level(value: &str) -> Result<SafetyLevel, FlickrError> {
    SafetyLevel::from_wire(value)
        .ok_or_else(|| FlickrError::UnexpectedResponse(format!("Unrecognised safety level: {value}")))
}

/// Normalizes a "date taken" triple into a known date or `None`.
///
/// Taken dates are shown in the owner's timezone so are kept naive. The wire
/// always has a value even when unknown, and some photos claim a known date
/// whose year is `0000`. Both of those are unknown.
pub fn parse_date_taken(
    value: &str,
    granularity: &str,
    unknown: bool,
) -> Result<Option<DateTaken>, FlickrError> {
    let granularity = TakenGranularity::from_wire(granularity).ok_or_else(|| {
        FlickrError::UnexpectedResponse(format!("Unrecognised date granularity: {granularity}"))
    })?;

    if unknown || value.starts_with("0000-") {
        return Ok(None);
    }

    let value = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").map_err(|_| {
        FlickrError::UnexpectedResponse(format!("Unrecognised date taken: {value:?}"))
    })?;

    Ok(Some(DateTaken { value, granularity }))
}

/// Reads `latitude`/`longitude`/`accuracy` off an element.
///
/// Accuracy `0` means the location was never really set, so the whole
/// location is dropped.
pub fn parse_location(elem: &XmlElement) -> Result<Option<Location>, FlickrError> {
    let accuracy: u8 = elem.parsed_attr("accuracy")?;
    if accuracy == 0 {
        return Ok(None);
    }
    if accuracy > 16 {
        return Err(FlickrError::UnexpectedResponse(format!(
            "Location accuracy out of range: {accuracy}"
        )));
    }

    Ok(Some(Location {
        latitude: elem.parsed_attr("latitude")?,
        longitude: elem.parsed_attr("longitude")?,
        accuracy,
    }))
}

pub fn parse_media(value: &str) -> Result<MediaType, FlickrError> {
    MediaType::from_str(value)
        .map_err(|_| FlickrError::UnexpectedResponse(format!("Unrecognised media type: {value}")))
}

/// Parses one `<size>` from the getSizes response.
///
/// Video sizes sometimes report placeholders instead of numbers, so their
/// dimensions are optional. Photo dimensions must be numeric.
pub fn parse_size(elem: &XmlElement) -> Result<Size, FlickrError> {
    let media = parse_media(elem.required_attr("media")?)?;
    let (width, height) = match media {
        MediaType::Photo => (
            Some(elem.parsed_attr("width")?),
            Some(elem.parsed_attr("height")?),
        ),
        MediaType::Video => (
            elem.attr("width").and_then(|w| w.parse().ok()),
            elem.attr("height").and_then(|h| h.parse().ok()),
        ),
    };

    Ok(Size {
        label: elem.required_attr("label")?.to_string(),
        width,
        height,
        media,
        source: elem.required_attr("source")?.to_string(),
    })
}

/// Collects the sizes advertised on a collection item.
///
/// Only sizes the caller may see are present, e.g. no `url_o` when the
/// owner has disabled downloads.
pub fn parse_collection_sizes(elem: &XmlElement) -> Result<Vec<Size>, FlickrError> {
    let media = match elem.attr("media") {
        Some(m) => parse_media(m)?,
        None => MediaType::Photo,
    };

    let mut sizes = Vec::new();
    for (suffix, label) in COLLECTION_SIZES {
        let Some(source) = elem.attr(&format!("url_{suffix}")) else {
            continue;
        };
        sizes.push(Size {
            label: label.to_string(),
            width: elem.attr(&format!("width_{suffix}")).and_then(|w| w.parse().ok()),
            height: elem.attr(&format!("height_{suffix}")).and_then(|h| h.parse().ok()),
            media,
            source: source.to_string(),
        });
    }
    Ok(sizes)
}
