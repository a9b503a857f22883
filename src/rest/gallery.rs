/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::collection::{OwnerSource, check_paging};
use crate::rest::errors::{ApiError, ErrorOverrides, FlickrError};
use crate::rest::{Client, CollectionOfPhotos, CollectionPhoto};
use futures::Stream;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GalleryInfo {
    pub owner_name: String,
    pub title: String,
}

/// Holds a page of photos returned from the `flickr.galleries.getPhotos` API.
///
/// Galleries are curated from other members' photos, so each photo has its own owner.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PhotosInGallery {
    #[serde(flatten)]
    pub collection: CollectionOfPhotos,
    pub gallery: GalleryInfo,
}

impl Client {
    /// Returns a page of photos from a gallery
    pub async fn get_photos_in_gallery(
        &self,
        gallery_id: &str,
        page: u32,
        per_page: u32,
    ) -> Result<PhotosInGallery, FlickrError> {
        check_paging(page, per_page)?;
        let gallery = self.get_gallery_info(gallery_id).await?;
        let (collection, _) = self
            .collection_page(
                "flickr.galleries.getPhotos",
                &[("gallery_id", gallery_id)],
                &gallery_errors(gallery_id),
                OwnerSource::Items,
                page,
                per_page,
            )
            .await?;
        Ok(PhotosInGallery { collection, gallery })
    }

    pub fn stream_photos_in_gallery(
        &self,
        gallery_id: &str,
    ) -> Result<impl Stream<Item = Result<CollectionPhoto, FlickrError>> + use<>, FlickrError> {
        self.photo_stream(
            "flickr.galleries.getPhotos",
            &[("gallery_id", gallery_id)],
            gallery_errors(gallery_id),
            OwnerSource::Items,
        )
    }

    /// Returns the title and owner of a gallery
    pub async fn get_gallery_info(&self, gallery_id: &str) -> Result<GalleryInfo, FlickrError> {
        let resp = self
            .api_client
            .call(
                "flickr.galleries.getInfo",
                &[("gallery_id", gallery_id)],
                &gallery_errors(gallery_id),
            )
            .await?;

        // <gallery id="..." username="Flickr Commons" ...><title>...</title></gallery>
        let gallery = resp.required_descendant("gallery")?;
        Ok(GalleryInfo {
            owner_name: gallery.required_attr("username")?.to_string(),
            title: gallery.optional_child_text("title").unwrap_or_default().to_string(),
        })
    }
}

fn gallery_errors(gallery_id: &str) -> ErrorOverrides {
    ErrorOverrides::new().on(
        "1",
        ApiError::ResourceNotFound(format!("Could not find gallery with ID: {gallery_id:?}")),
    )
}
