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
use async_stream::try_stream;
use futures::{Stream, StreamExt, pin_mut};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GroupInfo {
    pub id: String,
    pub name: String,
}

/// Holds a page of photos returned from the `flickr.groups.pools.getPhotos` API.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PhotosInGroup {
    #[serde(flatten)]
    pub collection: CollectionOfPhotos,
    pub group: GroupInfo,
}

impl Client {
    /// Returns a page of photos from the pool of the group at `group_url`
    pub async fn get_photos_in_group_pool(
        &self,
        group_url: &str,
        page: u32,
        per_page: u32,
    ) -> Result<PhotosInGroup, FlickrError> {
        check_paging(page, per_page)?;
        let group = self.lookup_group_from_url(group_url).await?;
        let (collection, _) = self
            .collection_page(
                "flickr.groups.pools.getPhotos",
                &[("group_id", group.id.as_str())],
                &ErrorOverrides::new(),
                OwnerSource::Items,
                page,
                per_page,
            )
            .await?;
        Ok(PhotosInGroup { collection, group })
    }

    /// Returns every photo in the pool of the group at `group_url`.
    ///
    /// The group is looked up when the stream is first polled.
    pub fn stream_photos_in_group_pool(
        &self,
        group_url: &str,
    ) -> Result<impl Stream<Item = Result<CollectionPhoto, FlickrError>> + use<>, FlickrError> {
        let client = self.clone();
        let group_url = group_url.to_string();

        Ok(try_stream! {
            let group = client.lookup_group_from_url(&group_url).await?;
            let photos = client.photo_stream(
                "flickr.groups.pools.getPhotos",
                &[("group_id", group.id.as_str())],
                ErrorOverrides::new(),
                OwnerSource::Items,
            )?;
            pin_mut!(photos);
            while let Some(photo) = photos.next().await {
                yield photo?;
            }
        })
    }

    /// Returns the id and name of the group at `url`
    pub async fn lookup_group_from_url(&self, url: &str) -> Result<GroupInfo, FlickrError> {
        let overrides = ErrorOverrides::new().on(
            "1",
            ApiError::ResourceNotFound(format!("Could not find group with URL: {url:?}")),
        );
        let resp = self
            .api_client
            .call("flickr.urls.lookupGroup", &[("url", url)], &overrides)
            .await?;

        // <group id="34427469792@N01"><groupname>FlickrCentral</groupname></group>
        let group = resp.required_descendant("group")?;
        Ok(GroupInfo {
            id: group.required_attr("id")?.to_string(),
            name: group.required_child_text("groupname")?.to_string(),
        })
    }
}
