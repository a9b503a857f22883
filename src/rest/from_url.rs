/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::collection::check_paging;
use crate::rest::errors::FlickrError;
use crate::rest::{
    Client, CollectionOfPhotos, PhotosInAlbum, PhotosInGallery, PhotosInGroup, SinglePhoto,
};
use serde::{Deserialize, Serialize};

// Page size used when following a link
const PER_PAGE_FROM_URL: u32 = 100;

fn first_page() -> u32 {
    1
}

/// What a flickr.com URL points to.
///
/// This is the output of an external URL parser. The `type` tag and field
/// names match its JSON form, so it can be deserialized directly.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParsedUrl {
    SinglePhoto {
        photo_id: String,
    },
    Album {
        user_url: String,
        #[serde(default)]
        user_id: Option<String>,
        album_id: String,
        #[serde(default = "first_page")]
        page: u32,
    },
    User {
        user_url: String,
        #[serde(default)]
        user_id: Option<String>,
        #[serde(default = "first_page")]
        page: u32,
    },
    Gallery {
        gallery_id: String,
        #[serde(default = "first_page")]
        page: u32,
    },
    Group {
        group_url: String,
        #[serde(default = "first_page")]
        page: u32,
    },
    Tag {
        tag: String,
        #[serde(default = "first_page")]
        page: u32,
    },
}

impl ParsedUrl {
    pub fn from_json(json: &str) -> Result<Self, FlickrError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Turns a web URL into a [`ParsedUrl`].
pub trait UrlParser {
    fn parse(&self, url: &str) -> Result<ParsedUrl, FlickrError>;
}

/// The photos found behind a URL
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum PhotosFromUrl {
    SinglePhoto(Box<SinglePhoto>),
    Album(PhotosInAlbum),
    Gallery(PhotosInGallery),
    Group(PhotosInGroup),

    /// A member's photostream or a tag search
    Collection(CollectionOfPhotos),
}

impl Client {
    /// Returns the photos at a flickr.com URL, using `parser` to understand it
    pub async fn get_photos_from_flickr_url(
        &self,
        parser: &dyn UrlParser,
        url: &str,
    ) -> Result<PhotosFromUrl, FlickrError> {
        let parsed = parser.parse(url)?;
        self.get_photos_from_parsed_flickr_url(&parsed).await
    }

    /// Returns the photos described by an already parsed URL.
    ///
    /// Collections come back 100 photos at a time.
    pub async fn get_photos_from_parsed_flickr_url(
        &self,
        parsed: &ParsedUrl,
    ) -> Result<PhotosFromUrl, FlickrError> {
        log::debug!("Getting photos for {parsed:?}");
        match parsed {
            ParsedUrl::SinglePhoto { photo_id } => self
                .get_single_photo(photo_id)
                .await
                .map(|photo| PhotosFromUrl::SinglePhoto(Box::new(photo))),
            ParsedUrl::Album {
                user_url,
                user_id,
                album_id,
                page,
            } => {
                check_paging(*page, PER_PAGE_FROM_URL)?;
                let user_id = self.resolve_user_id(user_url, user_id.as_deref()).await?;
                self.get_photos_in_album(&user_id, album_id, *page, PER_PAGE_FROM_URL)
                    .await
                    .map(PhotosFromUrl::Album)
            }
            ParsedUrl::User {
                user_url,
                user_id,
                page,
            } => {
                check_paging(*page, PER_PAGE_FROM_URL)?;
                let user_id = self.resolve_user_id(user_url, user_id.as_deref()).await?;
                self.get_photos_in_user_photostream(&user_id, *page, PER_PAGE_FROM_URL)
                    .await
                    .map(PhotosFromUrl::Collection)
            }
            ParsedUrl::Gallery { gallery_id, page } => self
                .get_photos_in_gallery(gallery_id, *page, PER_PAGE_FROM_URL)
                .await
                .map(PhotosFromUrl::Gallery),
            ParsedUrl::Group { group_url, page } => self
                .get_photos_in_group_pool(group_url, *page, PER_PAGE_FROM_URL)
                .await
                .map(PhotosFromUrl::Group),
            ParsedUrl::Tag { tag, page } => self
                .get_photos_with_tag(tag, *page, PER_PAGE_FROM_URL)
                .await
                .map(PhotosFromUrl::Collection),
        }
    }

    async fn resolve_user_id(
        &self,
        user_url: &str,
        user_id: Option<&str>,
    ) -> Result<String, FlickrError> {
        match user_id {
            Some(id) if !id.is_empty() => Ok(id.to_string()),
            _ => self.lookup_user_id_for_url(user_url).await,
        }
    }
}
