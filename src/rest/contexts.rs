/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::Client;
use crate::rest::errors::{ApiError, ErrorOverrides, FlickrError};
use crate::rest::parsers::parse_timestamp;
use crate::rest::photo::check_photo_id;
use crate::rest::user::{User, create_user};
use crate::rest::xml::XmlElement;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AlbumContext {
    pub id: String,
    pub title: String,
    pub count_photos: u64,
    pub count_videos: u64,
    pub count_views: u64,
    pub count_comments: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GalleryContext {
    pub id: String,
    pub url: String,

    /// The gallery entry never includes a real name
    pub owner: User,
    pub title: String,
    pub description: Option<String>,
    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
    pub count_photos: u64,
    pub count_videos: u64,
    pub count_views: u64,
    pub count_comments: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GroupContext {
    pub id: String,
    pub url: String,
    pub title: String,
    pub count_items: u64,
    pub count_members: u64,
}

/// Everywhere a photo has been added to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PhotoContext {
    pub albums: Vec<AlbumContext>,
    pub galleries: Vec<GalleryContext>,
    pub groups: Vec<GroupContext>,
}

impl Client {
    /// Returns the albums, galleries and group pools a photo appears in
    pub async fn get_photo_contexts(&self, photo_id: &str) -> Result<PhotoContext, FlickrError> {
        check_photo_id(photo_id)?;

        let overrides = ErrorOverrides::new().on(
            "1",
            ApiError::ResourceNotFound(format!("Could not find photo with ID: {photo_id:?}")),
        );
        let contexts = self
            .api_client
            .call("flickr.photos.getAllContexts", &[("photo_id", photo_id)], &overrides)
            .await?;

        let albums = contexts
            .descendants_named("set")
            .into_iter()
            .map(parse_album_context)
            .collect::<Result<Vec<_>, _>>()?;
        let groups = contexts
            .descendants_named("pool")
            .into_iter()
            .map(parse_group_context)
            .collect::<Result<Vec<_>, _>>()?;

        let galleries_resp = self
            .api_client
            .call(
                "flickr.galleries.getListForPhoto",
                &[("photo_id", photo_id), ("per_page", "500")],
                &ErrorOverrides::new(),
            )
            .await?;
        let galleries = parse_gallery_contexts(&galleries_resp)?;

        Ok(PhotoContext {
            albums,
            galleries,
            groups,
        })
    }
}

// <set title="Landscape / Nature" id="72157650910758151" view_count="2312"
//      comment_count="0" count_photo="269" count_video="0" />
fn parse_album_context(elem: &XmlElement) -> Result<AlbumContext, FlickrError> {
    Ok(AlbumContext {
        id: elem.required_attr("id")?.to_string(),
        title: elem.required_attr("title")?.to_string(),
        count_photos: elem.parsed_attr("count_photo")?,
        count_videos: elem.parsed_attr("count_video")?,
        count_views: elem.parsed_attr("view_count")?,
        count_comments: elem.parsed_attr("comment_count")?,
    })
}

// <pool title="A Picture, A Story" url="/groups/14776652@N22/pool/" id="14776652@N22"
//       members="3444" pool_count="59875" />
fn parse_group_context(elem: &XmlElement) -> Result<GroupContext, FlickrError> {
    Ok(GroupContext {
        id: elem.required_attr("id")?.to_string(),
        url: format!("https://www.flickr.com{}", elem.required_attr("url")?),
        title: elem.required_attr("title")?.to_string(),
        count_items: elem.parsed_attr("pool_count")?,
        count_members: elem.parsed_attr("members")?,
    })
}

fn parse_gallery_contexts(resp: &XmlElement) -> Result<Vec<GalleryContext>, FlickrError> {
    let galleries = resp.required_descendant("galleries")?;

    // TODO: page through galleries.getListForPhoto once a photo in more than 500 galleries turns up
    let pages: u32 = galleries.parsed_attr("pages")?;
    if pages > 1 {
        return Err(FlickrError::Unsupported(
            "Fetching more than one page of galleries".to_string(),
        ));
    }

    galleries
        .children_named("gallery")
        .map(parse_gallery_context)
        .collect()
}

fn parse_gallery_context(elem: &XmlElement) -> Result<GalleryContext, FlickrError> {
    let url = elem.required_attr("url")?;
    let owner_id = elem.required_attr("owner")?;

    // https://www.flickr.com/photos/{alias or id}/galleries/{gallery id}
    let path_alias = url.split('/').nth(4).filter(|part| *part != owner_id);

    Ok(GalleryContext {
        id: elem.required_attr("gallery_id")?.to_string(),
        url: url.to_string(),
        owner: create_user(owner_id, elem.required_attr("username")?, None, path_alias),
        title: elem.required_child_text("title")?.to_string(),
        description: elem.optional_child_text("description").map(str::to_string),
        date_created: parse_timestamp(elem.required_attr("date_create")?)?,
        date_updated: parse_timestamp(elem.required_attr("date_update")?)?,
        count_photos: elem.parsed_attr("count_photos")?,
        count_videos: elem.parsed_attr("count_videos")?,
        count_views: elem.parsed_attr("count_views")?,
        count_comments: elem.parsed_attr("count_comments")?,
    })
}
