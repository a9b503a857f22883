/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::api::{ApiParams, LicenseTable, MAX_PER_PAGE};
use crate::rest::errors::{ApiError, ErrorOverrides, FlickrError};
use crate::rest::parsers::{
    from_empty_str_to_none, parse_collection_sizes, parse_date_taken, parse_location, parse_media,
    parse_safety_level, parse_timestamp,
};
use crate::rest::tags::{MachineTags, get_machine_tags};
use crate::rest::user::{User, create_user};
use crate::rest::xml::XmlElement;
use crate::rest::{Client, DateTaken, License, Location, MediaType, SafetyLevel, Size};
use async_stream::try_stream;
use chrono::{DateTime, Utc};
use futures::Stream;
use serde::{Deserialize, Serialize};

/// Extras requested on every collection call so item fields are always present.
///
/// See [Flickr API Docs](https://www.flickr.com/services/api/flickr.photos.search.html)
pub const REQUIRED_EXTRAS: [&str; 21] = [
    "license",
    "date_upload",
    "date_taken",
    "media",
    "original_format",
    "owner_name",
    "url_sq",
    "url_t",
    "url_s",
    "url_m",
    "url_o",
    "tags",
    "geo",
    // Undocumented but honoured
    "url_q",
    "url_l",
    "description",
    "safety_level",
    "realname",
    "path_alias",
    "count_comments",
    "count_views",
];

// Tag names of the element holding the page attributes, by endpoint family
const COLLECTION_WRAPPERS: [&str; 2] = ["photoset", "photos"];

/// A photo as returned in a list of photos.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CollectionPhoto {
    pub id: String,
    pub media: MediaType,
    pub secret: String,
    pub server: String,
    pub farm: String,
    pub original_format: Option<String>,
    pub owner: User,
    pub safety_level: SafetyLevel,
    pub license: License,
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub machine_tags: MachineTags,
    pub date_posted: DateTime<Utc>,
    pub date_taken: Option<DateTaken>,
    pub location: Option<Location>,
    pub count_comments: u64,
    pub count_views: u64,
    pub photo_page_url: String,

    /// Only the sizes visible to the caller
    pub sizes: Vec<Size>,
}

/// One page of a list of photos.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CollectionOfPhotos {
    pub page_count: u32,
    pub total_photos: u64,
    pub photos: Vec<CollectionPhoto>,
}

/// Where the owner of each item comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OwnerSource {
    /// Multi-owner lists carry the owner on every item
    Items,

    /// Albums have one owner, described on the `<photoset>`
    AlbumWrapper,
}

impl Client {
    /// Returns one page of any photo list method, e.g. `flickr.photos.search`.
    ///
    /// Items must carry their own owner. `page` starts at 1 and `per_page`
    /// is at most 500.
    pub async fn get_collection_page(
        &self,
        method: &str,
        params: &ApiParams<'_>,
        page: u32,
        per_page: u32,
    ) -> Result<CollectionOfPhotos, FlickrError> {
        self.collection_page(method, params, &ErrorOverrides::new(), OwnerSource::Items, page, per_page)
            .await
            .map(|(collection, _)| collection)
    }

    /// Returns every photo of any photo list method, a page at a time.
    ///
    /// Fails immediately if `params` sets `page` or `per_page`.
    pub fn stream_collection(
        &self,
        method: &str,
        params: &ApiParams<'_>,
    ) -> Result<impl Stream<Item = Result<CollectionPhoto, FlickrError>> + use<>, FlickrError> {
        self.photo_stream(method, params, ErrorOverrides::new(), OwnerSource::Items)
    }

    /// Returns a page of the photos with this tag
    pub async fn get_photos_with_tag(
        &self,
        tag: &str,
        page: u32,
        per_page: u32,
    ) -> Result<CollectionOfPhotos, FlickrError> {
        self.get_collection_page("flickr.photos.search", &[("tags", tag)], page, per_page)
            .await
    }

    pub fn stream_photos_with_tag(
        &self,
        tag: &str,
    ) -> Result<impl Stream<Item = Result<CollectionPhoto, FlickrError>> + use<>, FlickrError> {
        self.stream_collection("flickr.photos.search", &[("tags", tag)])
    }

    /// Returns a page of the public photos a member has posted.
    ///
    /// A member with no public photos gets a single empty page.
    pub async fn get_photos_in_user_photostream(
        &self,
        user_id: &str,
        page: u32,
        per_page: u32,
    ) -> Result<CollectionOfPhotos, FlickrError> {
        let (mut collection, _) = self
            .collection_page(
                "flickr.people.getPublicPhotos",
                &[("user_id", user_id)],
                &photostream_errors(user_id),
                OwnerSource::Items,
                page,
                per_page,
            )
            .await?;

        if collection.total_photos == 0 {
            collection = CollectionOfPhotos {
                page_count: 1,
                total_photos: 0,
                photos: vec![],
            };
        }
        Ok(collection)
    }

    pub fn stream_photos_in_user_photostream(
        &self,
        user_id: &str,
    ) -> Result<impl Stream<Item = Result<CollectionPhoto, FlickrError>> + use<>, FlickrError> {
        self.photo_stream(
            "flickr.people.getPublicPhotos",
            &[("user_id", user_id)],
            photostream_errors(user_id),
            OwnerSource::Items,
        )
    }

    /// Fetches one page and assembles it. Also returns the wrapper element
    /// for callers that decorate the collection.
    pub(crate) async fn collection_page(
        &self,
        method: &str,
        params: &ApiParams<'_>,
        overrides: &ErrorOverrides,
        owner_source: OwnerSource,
        page: u32,
        per_page: u32,
    ) -> Result<(CollectionOfPhotos, XmlElement), FlickrError> {
        check_paging(page, per_page)?;
        let mut owned = owned_params(params);
        add_required_extras(&mut owned);
        owned.push(("page".to_string(), page.to_string()));
        owned.push(("per_page".to_string(), per_page.to_string()));

        log::debug!("Fetching page {page} of {method} ({per_page} per page)");
        let borrowed: Vec<(&str, &str)> = owned
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let resp = self.api_client.call(method, &borrowed, overrides).await?;

        let licenses = self.license_table().await?;
        let wrapper = collection_wrapper(&resp)?;
        let owner = match owner_source {
            OwnerSource::Items => None,
            OwnerSource::AlbumWrapper => Some(album_owner(wrapper)?),
        };
        let collection = build_collection(wrapper, owner.as_ref(), &licenses)?;
        Ok((collection, wrapper.clone()))
    }

    pub(crate) fn photo_stream(
        &self,
        method: &str,
        params: &ApiParams<'_>,
        overrides: ErrorOverrides,
        owner_source: OwnerSource,
    ) -> Result<impl Stream<Item = Result<CollectionPhoto, FlickrError>> + use<>, FlickrError> {
        if let Some((name, _)) = params.iter().find(|(k, _)| *k == "page" || *k == "per_page") {
            return Err(FlickrError::InvalidArgument(format!(
                "Streams choose their own pages; remove the {name:?} parameter"
            )));
        }

        let client = self.clone();
        let method = method.to_string();
        let params = owned_params(params);

        // Walk the pages until one comes back empty
        Ok(try_stream! {
            let borrowed: Vec<(&str, &str)> = params
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            let mut page = 1;
            loop {
                let (collection, _) = client
                    .collection_page(&method, &borrowed, &overrides, owner_source, page, MAX_PER_PAGE)
                    .await?;
                if collection.photos.is_empty() {
                    break;
                }
                for photo in collection.photos {
                    yield photo;
                }
                page += 1;
            }
        })
    }
}

fn photostream_errors(user_id: &str) -> ErrorOverrides {
    ErrorOverrides::new()
        .on(
            "1",
            ApiError::ResourceNotFound(format!("Could not find user with ID: {user_id:?}")),
        )
        .on("5", ApiError::UserDeleted(user_id.to_string()))
}

fn owned_params(params: &ApiParams<'_>) -> Vec<(String, String)> {
    params
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub(crate) fn check_paging(page: u32, per_page: u32) -> Result<(), FlickrError> {
    if page == 0 {
        return Err(FlickrError::InvalidArgument(
            "Pages are numbered from 1".to_string(),
        ));
    }
    if per_page == 0 || per_page > MAX_PER_PAGE {
        return Err(FlickrError::InvalidArgument(format!(
            "per_page must be between 1 and {MAX_PER_PAGE}, got {per_page}"
        )));
    }
    Ok(())
}

/// Merges the required extras into any `extras` the caller passed, without duplicates.
pub(crate) fn add_required_extras(params: &mut Vec<(String, String)>) {
    let mut extras: Vec<String> = REQUIRED_EXTRAS.iter().map(|e| e.to_string()).collect();
    params.retain(|(k, v)| {
        if k != "extras" {
            return true;
        }
        for extra in v.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            if !extras.iter().any(|e| e == extra) {
                extras.push(extra.to_string());
            }
        }
        false
    });
    params.push(("extras".to_string(), extras.join(",")));
}

fn collection_wrapper(resp: &XmlElement) -> Result<&XmlElement, FlickrError> {
    COLLECTION_WRAPPERS
        .iter()
        .find_map(|name| resp.child(name))
        .ok_or_else(|| {
            FlickrError::UnexpectedResponse("Response has no list of photos".to_string())
        })
}

/// The album owner, from the `<photoset>` plus the first photo's name fields.
pub(crate) fn album_owner(photoset: &XmlElement) -> Result<User, FlickrError> {
    let first = photoset.child("photo");
    Ok(create_user(
        photoset.required_attr("owner")?,
        photoset.required_attr("ownername")?,
        first.and_then(|p| p.attr("realname")),
        first.and_then(|p| p.attr("pathalias")),
    ))
}

pub(crate) fn build_collection(
    wrapper: &XmlElement,
    owner: Option<&User>,
    licenses: &LicenseTable,
) -> Result<CollectionOfPhotos, FlickrError> {
    let photos = wrapper
        .children_named("photo")
        .map(|elem| from_collection_photo(elem, owner, licenses))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CollectionOfPhotos {
        page_count: wrapper.parsed_attr("pages")?,
        total_photos: wrapper.parsed_attr("total")?,
        photos,
    })
}

fn from_collection_photo(
    elem: &XmlElement,
    owner: Option<&User>,
    licenses: &LicenseTable,
) -> Result<CollectionPhoto, FlickrError> {
    let id = elem.required_attr("id")?.to_string();

    let owner = match owner {
        Some(owner) => owner.clone(),
        None => create_user(
            elem.required_attr("owner")?,
            elem.required_attr("ownername")?,
            elem.attr("realname"),
            elem.attr("pathalias"),
        ),
    };

    let license_id = elem.required_attr("license")?;
    let license = licenses
        .get(license_id)
        .cloned()
        .ok_or_else(|| FlickrError::LicenseNotFound(license_id.to_string()))?;

    let tags: Vec<String> = elem
        .attr("tags")
        .unwrap_or_default()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    // Coordinates are zero-filled when there's no location, so only trust
    // them when the photo's geo permissions are public
    let location = if elem.attr("geo_is_public") == Some("1") {
        parse_location(elem)?
    } else {
        None
    };

    let photo_page_url = format!("{}{}/", owner.photos_url, id);

    Ok(CollectionPhoto {
        media: match elem.attr("media") {
            Some(m) => parse_media(m)?,
            None => MediaType::Photo,
        },
        secret: elem.required_attr("secret")?.to_string(),
        server: elem.required_attr("server")?.to_string(),
        farm: elem.required_attr("farm")?.to_string(),
        original_format: elem.attr("originalformat").map(str::to_string),
        owner,
        safety_level: parse_safety_level(elem.required_attr("safety_level")?)?,
        license,
        title: from_empty_str_to_none(elem.attr("title")),
        description: from_empty_str_to_none(elem.optional_child_text("description")),
        machine_tags: get_machine_tags(&tags),
        tags,
        date_posted: parse_timestamp(elem.required_attr("dateupload")?)?,
        date_taken: parse_date_taken(
            elem.required_attr("datetaken")?,
            elem.required_attr("datetakengranularity")?,
            elem.attr("datetakenunknown") == Some("1"),
        )?,
        location,
        count_comments: elem.parsed_attr("count_comments")?,
        count_views: elem.parsed_attr("count_views")?,
        photo_page_url,
        sizes: parse_collection_sizes(elem)?,
        id,
    })
}
