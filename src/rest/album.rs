/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::collection::{OwnerSource, album_owner};
use crate::rest::errors::{ApiError, ErrorOverrides, FlickrError};
use crate::rest::parsers::from_empty_str_to_none;
use crate::rest::user::User;
use crate::rest::{Client, CollectionOfPhotos, CollectionPhoto};
use futures::Stream;
use serde::{Deserialize, Serialize};

/// The album a page of photos came from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AlbumInfo {
    pub owner: User,
    pub title: Option<String>,
}

/// Holds a page of photos returned from the `flickr.photosets.getPhotos` API.
///
/// Every photo in an album belongs to the album's owner.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PhotosInAlbum {
    #[serde(flatten)]
    pub collection: CollectionOfPhotos,
    pub album: AlbumInfo,
}

impl Client {
    /// Returns a page of photos from an album
    pub async fn get_photos_in_album(
        &self,
        user_id: &str,
        album_id: &str,
        page: u32,
        per_page: u32,
    ) -> Result<PhotosInAlbum, FlickrError> {
        let (collection, photoset) = self
            .collection_page(
                "flickr.photosets.getPhotos",
                &[("user_id", user_id), ("photoset_id", album_id)],
                &album_errors(user_id, album_id),
                OwnerSource::AlbumWrapper,
                page,
                per_page,
            )
            .await?;

        let album = AlbumInfo {
            owner: album_owner(&photoset)?,
            title: from_empty_str_to_none(photoset.attr("title")),
        };
        Ok(PhotosInAlbum { collection, album })
    }

    /// Returns every photo in an album
    pub fn stream_photos_in_album(
        &self,
        user_id: &str,
        album_id: &str,
    ) -> Result<impl Stream<Item = Result<CollectionPhoto, FlickrError>> + use<>, FlickrError> {
        self.photo_stream(
            "flickr.photosets.getPhotos",
            &[("user_id", user_id), ("photoset_id", album_id)],
            album_errors(user_id, album_id),
            OwnerSource::AlbumWrapper,
        )
    }
}

fn album_errors(user_id: &str, album_id: &str) -> ErrorOverrides {
    ErrorOverrides::new()
        .on(
            "1",
            ApiError::ResourceNotFound(format!("Could not find album with ID: {album_id:?}")),
        )
        .on(
            "2",
            ApiError::ResourceNotFound(format!("Could not find user with ID: {user_id:?}")),
        )
}
