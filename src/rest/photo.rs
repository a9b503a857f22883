/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::errors::{ApiError, ErrorOverrides, FlickrError};
use crate::rest::parsers::{
    from_empty_str_to_none, parse_date_taken, parse_location, parse_media, parse_safety_level,
    parse_size, parse_timestamp,
};
use crate::rest::tags::{MachineTags, Tag, get_machine_tags};
use crate::rest::user::{User, create_user};
use crate::rest::xml::XmlElement;
use crate::rest::{Client, License, MediaType, SafetyLevel, TakenGranularity};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// When a photo was taken, if it's known at all.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DateTaken {
    /// Local time as set by the camera or the owner, with no timezone
    pub value: NaiveDateTime,
    pub granularity: TakenGranularity,
}

/// Where a photo was taken.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,

    /// World level is 1, street level is 16
    pub accuracy: u8,
}

/// One of the renditions of a photo or video.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Size {
    pub label: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub media: MediaType,
    pub source: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub is_public: bool,
    pub is_friend: bool,
    pub is_family: bool,
}

/// Holds information returned from the `flickr.photos.getInfo` API.
///
/// See [Flickr API Docs](https://www.flickr.com/services/api/flickr.photos.getInfo.html)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SinglePhotoInfo {
    pub id: String,
    pub media: MediaType,
    pub secret: String,
    pub server: String,
    pub farm: String,

    /// Only returned when the owner allows downloads
    pub original_format: Option<String>,

    pub owner: User,
    pub safety_level: SafetyLevel,
    pub license: License,
    pub title: Option<String>,
    pub description: Option<String>,

    /// Normalized tag values, matching what the collection endpoints return
    pub tags: Vec<String>,
    pub raw_tags: Vec<Tag>,
    pub machine_tags: MachineTags,

    pub date_posted: DateTime<Utc>,
    pub date_taken: Option<DateTaken>,
    pub location: Option<Location>,
    pub count_comments: u64,
    pub count_views: u64,
    pub url: String,
    pub visibility: Visibility,
}

/// One EXIF field as reported by `flickr.photos.getExif`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ExifTag {
    /// Block the tag came from, e.g. `IFD0` or `ExifIFD`
    pub tagspace: String,
    pub tagspace_id: String,
    pub tag: String,
    pub label: String,
    pub raw_value: Option<String>,

    /// Human readable form, only sent for some tags
    pub clean_value: Option<String>,
}

/// A photo along with every size it is available in.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SinglePhoto {
    #[serde(flatten)]
    pub info: SinglePhotoInfo,
    pub sizes: Vec<Size>,
}

impl Client {
    /// Returns information for the specified photo id
    pub async fn get_single_photo_info(&self, photo_id: &str) -> Result<SinglePhotoInfo, FlickrError> {
        check_photo_id(photo_id)?;
        let resp = self
            .api_client
            .call(
                "flickr.photos.getInfo",
                &[("photo_id", photo_id)],
                &photo_lookup_errors(photo_id),
            )
            .await?;
        self.parse_single_photo_info(&resp, photo_id).await
    }

    /// Returns every size the photo is available in
    pub async fn get_single_photo_sizes(&self, photo_id: &str) -> Result<Vec<Size>, FlickrError> {
        check_photo_id(photo_id)?;
        let overrides = ErrorOverrides::new().on(
            "1",
            ApiError::ResourceNotFound(format!("Could not find photo with ID: {photo_id:?}")),
        );
        let resp = self
            .api_client
            .call("flickr.photos.getSizes", &[("photo_id", photo_id)], &overrides)
            .await?;

        resp.descendants_named("size")
            .into_iter()
            .map(parse_size)
            .collect()
    }

    /// Returns the information and sizes for the specified photo id
    pub async fn get_single_photo(&self, photo_id: &str) -> Result<SinglePhoto, FlickrError> {
        let info = self.get_single_photo_info(photo_id).await?;
        let sizes = self.get_single_photo_sizes(photo_id).await?;
        Ok(SinglePhoto { info, sizes })
    }

    /// Returns the EXIF fields the owner shares for this photo.
    ///
    /// Owners can hide EXIF data, which fails with [`ApiError::PermissionDenied`].
    pub async fn get_exif_tags_for_photo(&self, photo_id: &str) -> Result<Vec<ExifTag>, FlickrError> {
        check_photo_id(photo_id)?;
        let overrides = ErrorOverrides::new()
            .on(
                "1",
                ApiError::ResourceNotFound(format!("Could not find photo with ID: {photo_id:?}")),
            )
            .on(
                "2",
                ApiError::PermissionDenied(format!("EXIF data is hidden for photo {photo_id}")),
            );
        let resp = self
            .api_client
            .call("flickr.photos.getExif", &[("photo_id", photo_id)], &overrides)
            .await?;

        // <exif tagspace="IFD0" tagspaceid="0" tag="XResolution" label="X-Resolution">
        //   <raw>72</raw><clean>72 dpi</clean></exif>
        resp.required_descendant("photo")?
            .children_named("exif")
            .map(|e| -> Result<ExifTag, FlickrError> {
                Ok(ExifTag {
                    tagspace: e.required_attr("tagspace")?.to_string(),
                    tagspace_id: e.required_attr("tagspaceid")?.to_string(),
                    tag: e.required_attr("tag")?.to_string(),
                    label: e.required_attr("label")?.to_string(),
                    raw_value: e.optional_child_text("raw").map(str::to_string),
                    clean_value: e.optional_child_text("clean").map(str::to_string),
                })
            })
            .collect()
    }

    /// Returns true if there's no photo with this id.
    ///
    /// A private photo still exists, so isn't deleted. This can't tell a
    /// deleted photo apart from an id that was never used.
    pub async fn is_photo_deleted(&self, photo_id: &str) -> Result<bool, FlickrError> {
        check_photo_id(photo_id)?;
        let result = self
            .api_client
            .call(
                "flickr.photos.getInfo",
                &[("photo_id", photo_id)],
                &photo_lookup_errors(photo_id),
            )
            .await;
        match result {
            Ok(_) => Ok(false),
            Err(FlickrError::Api(ApiError::ResourceNotFound(_))) => Ok(true),
            Err(FlickrError::Api(ApiError::PhotoIsPrivate(_))) => Ok(false),
            Err(err) => Err(err),
        }
    }

    async fn parse_single_photo_info(
        &self,
        resp: &XmlElement,
        photo_id: &str,
    ) -> Result<SinglePhotoInfo, FlickrError> {
        let photo = resp.required_descendant("photo")?;

        let license = self.lookup_license_by_id(photo.required_attr("license")?).await?;

        let owner_elem = photo.required_child("owner")?;
        let owner = create_user(
            owner_elem.required_attr("nsid")?,
            owner_elem.required_attr("username")?,
            owner_elem.attr("realname"),
            owner_elem.attr("path_alias"),
        );

        let dates = photo.required_child("dates")?;
        let date_posted = parse_timestamp(dates.required_attr("posted")?)?;
        let date_taken = parse_date_taken(
            dates.required_attr("taken")?,
            dates.required_attr("takengranularity")?,
            dates.attr("takenunknown") == Some("1"),
        )?;

        let url = photo
            .descendants_named("url")
            .into_iter()
            .find(|u| u.attr("type") == Some("photopage"))
            .and_then(|u| u.text_or_none())
            .ok_or_else(|| FlickrError::UnexpectedResponse("Missing photopage URL".to_string()))?
            .to_string();

        // Some tags really do have an empty normalized value
        let mut tags = Vec::new();
        let mut raw_tags = Vec::new();
        for t in photo.required_child("tags")?.children_named("tag") {
            let normalized_value = t.text.clone().unwrap_or_default();
            raw_tags.push(Tag {
                author_id: t.required_attr("author")?.to_string(),
                author_name: t.required_attr("authorname")?.to_string(),
                raw_value: t.required_attr("raw")?.to_string(),
                normalized_value: normalized_value.clone(),
                is_machine_tag: t.attr("machine_tag") == Some("1"),
            });
            tags.push(normalized_value);
        }

        // <location> is missing unless the owner shares it publicly
        let location = match photo.child("location") {
            Some(elem) => parse_location(elem)?,
            None => None,
        };

        let visibility_elem = photo.required_child("visibility")?;
        let visibility = Visibility {
            is_public: visibility_elem.attr("ispublic") == Some("1"),
            is_friend: visibility_elem.attr("isfriend") == Some("1"),
            is_family: visibility_elem.attr("isfamily") == Some("1"),
        };

        Ok(SinglePhotoInfo {
            id: photo_id.to_string(),
            media: parse_media(photo.required_attr("media")?)?,
            secret: photo.required_attr("secret")?.to_string(),
            server: photo.required_attr("server")?.to_string(),
            farm: photo.required_attr("farm")?.to_string(),
            original_format: photo.attr("originalformat").map(str::to_string),
            owner,
            safety_level: parse_safety_level(photo.required_attr("safety_level")?)?,
            license,
            title: from_empty_str_to_none(photo.optional_child_text("title")),
            description: from_empty_str_to_none(photo.optional_child_text("description")),
            machine_tags: get_machine_tags(&tags),
            tags,
            raw_tags,
            date_posted,
            date_taken,
            location,
            count_comments: photo.required_child_text("comments")?.trim().parse().map_err(|_| {
                FlickrError::UnexpectedResponse("Comment count is not a number".to_string())
            })?,
            count_views: photo.parsed_attr("views")?,
            url,
            visibility,
        })
    }
}

fn photo_lookup_errors(photo_id: &str) -> ErrorOverrides {
    ErrorOverrides::new()
        .on(
            "1",
            ApiError::ResourceNotFound(format!("Could not find photo with ID: {photo_id:?}")),
        )
        .on("2", ApiError::PhotoIsPrivate(photo_id.to_string()))
}

/// Photo ids are numeric. Anything else is rejected before a call is made.
pub(crate) fn check_photo_id(photo_id: &str) -> Result<(), FlickrError> {
    if photo_id.is_empty() || !photo_id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FlickrError::InvalidArgument(format!(
            "Not a Flickr photo ID: {photo_id:?}"
        )));
    }
    Ok(())
}
