/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::errors::{ApiError, ErrorOverrides, FlickrError};
use crate::rest::parsers::parse_timestamp;
use crate::rest::photo::check_photo_id;
use crate::rest::user::{User, create_user};
use crate::rest::{Client, HttpMethod};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment left on a photo.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: String,
    pub photo_id: String,
    pub author: User,
    pub author_is_deleted: bool,
    pub text: String,
    pub permalink: String,
    pub date: DateTime<Utc>,
}

impl Client {
    /// Returns every comment on a photo, oldest first
    pub async fn list_all_comments(&self, photo_id: &str) -> Result<Vec<Comment>, FlickrError> {
        check_photo_id(photo_id)?;
        let overrides = ErrorOverrides::new().on(
            "1",
            ApiError::ResourceNotFound(format!("Could not find photo with ID: {photo_id:?}")),
        );
        let resp = self
            .api_client
            .call("flickr.photos.comments.getList", &[("photo_id", photo_id)], &overrides)
            .await?;

        let mut comments = Vec::new();
        for elem in resp.descendants_named("comment") {
            let author = create_user(
                elem.required_attr("author")?,
                elem.required_attr("authorname")?,
                elem.attr("realname"),
                elem.attr("path_alias"),
            );
            comments.push(Comment {
                id: elem.required_attr("id")?.to_string(),
                photo_id: photo_id.to_string(),
                author,
                author_is_deleted: elem.attr("author_is_deleted") == Some("1"),
                text: elem.text.clone().unwrap_or_default(),
                permalink: elem.required_attr("permalink")?.to_string(),
                date: parse_timestamp(elem.required_attr("datecreate")?)?,
            });
        }
        Ok(comments)
    }

    /// Posts a comment and returns its id.
    ///
    /// Needs a client created with an access token. Posting the same text
    /// twice returns the id of the first comment.
    pub async fn post_comment(&self, photo_id: &str, comment_text: &str) -> Result<String, FlickrError> {
        check_photo_id(photo_id)?;
        let overrides = ErrorOverrides::new().on(
            "99",
            ApiError::InsufficientPermissionsToComment(photo_id.to_string()),
        );
        let resp = self
            .api_client
            .call_with(
                HttpMethod::Post,
                "flickr.photos.comments.addComment",
                &[("photo_id", photo_id), ("comment_text", comment_text)],
                &overrides,
            )
            .await?;
        Ok(resp.required_descendant("comment")?.required_attr("id")?.to_string())
    }
}
