/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::Client;
use crate::rest::errors::{ApiError, ErrorOverrides, FlickrError};
use crate::rest::parsers::{from_empty_str_to_none, parse_timestamp};
use crate::rest::xml::XmlElement;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A Flickr member.
///
/// `photos_url` and `profile_url` always use the path alias when the member
/// has one, else their id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub realname: Option<String>,
    pub path_alias: Option<String>,
    pub photos_url: String,
    pub profile_url: String,
}

/// Holds information returned from the `flickr.people.getInfo` API.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserInfo {
    #[serde(flatten)]
    pub user: User,
    pub description: Option<String>,

    /// `None` when the member hasn't set one or keeps it private
    pub location: Option<String>,
    pub buddy_icon_url: String,
    pub count_photos: u64,
    pub has_pro_account: bool,
    pub pro_account_expires: Option<DateTime<Utc>>,
}

/// Ways of identifying a member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRef<'a> {
    Id(&'a str),

    /// Link to their photos or profile, e.g. `https://www.flickr.com/photos/britishlibrary/`
    Url(&'a str),
}

/// A manual correction to a member's real name.
///
/// Applies only when the id matches and the current values match exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RealnameFix {
    pub user_id: &'static str,
    pub username: Option<&'static str>,
    pub realname: Option<&'static str>,
    pub corrected: &'static str,
}

/// Real names the API returns wrongly for specific accounts.
pub const REALNAME_FIXES: &[RealnameFix] = &[
    // The museum dropped the leading 'S' to line up with their buddy icon
    // (found 2024-07-23)
    RealnameFix {
        user_id: "62173425@N02",
        username: None,
        realname: Some("tockholm Transport Museum"),
        corrected: "Stockholm Transport Museum",
    },
    // Shown on the profile page but not returned by the API (found 2024-08-07)
    RealnameFix {
        user_id: "32162360@N00",
        username: Some("ɹǝqɯoɔɥɔɐǝq"),
        realname: None,
        corrected: "beachcomber australia",
    },
];

/// Applies the first matching entry of `fixes` to a real name.
///
/// An empty real name is treated as absent.
pub fn fix_realname_with(
    fixes: &[RealnameFix],
    user_id: &str,
    username: &str,
    realname: Option<&str>,
) -> Option<String> {
    let realname = realname.filter(|r| !r.is_empty());
    let fix = fixes.iter().find(|f| {
        f.user_id == user_id
            && f.username.is_none_or(|u| u == username)
            && f.realname == realname
    });
    match fix {
        Some(f) => Some(f.corrected.to_string()),
        None => realname.map(str::to_string),
    }
}

pub fn fix_realname(user_id: &str, username: &str, realname: Option<&str>) -> Option<String> {
    fix_realname_with(REALNAME_FIXES, user_id, username, realname)
}

/// Builds a user from the core attributes, applying [`REALNAME_FIXES`].
pub fn create_user(
    user_id: &str,
    username: &str,
    realname: Option<&str>,
    path_alias: Option<&str>,
) -> User {
    create_user_with(REALNAME_FIXES, user_id, username, realname, path_alias)
}

pub fn create_user_with(
    fixes: &[RealnameFix],
    user_id: &str,
    username: &str,
    realname: Option<&str>,
    path_alias: Option<&str>,
) -> User {
    let path_alias = from_empty_str_to_none(path_alias);
    let url_part = path_alias.as_deref().unwrap_or(user_id);
    User {
        id: user_id.to_string(),
        username: username.to_string(),
        realname: fix_realname_with(fixes, user_id, username, realname),
        photos_url: format!("https://www.flickr.com/photos/{url_part}/"),
        profile_url: format!("https://www.flickr.com/people/{url_part}/"),
        path_alias,
    }
}

impl Client {
    /// Returns information for the specified member
    pub async fn get_user(&self, user: UserRef<'_>) -> Result<UserInfo, FlickrError> {
        let user_id = match user {
            UserRef::Id(id) => id.to_string(),
            UserRef::Url(url) => self.lookup_user_id_for_url(url).await?,
        };

        let overrides = ErrorOverrides::new()
            .on(
                "1",
                ApiError::ResourceNotFound(format!("Could not find user with ID: {user_id:?}")),
            )
            .on("5", ApiError::UserDeleted(user_id.clone()));
        let resp = self
            .api_client
            .call("flickr.people.getInfo", &[("user_id", user_id.as_str())], &overrides)
            .await?;

        parse_user_info(&user_id, &resp)
    }

    /// Returns the id of the member whose photos or profile are at `url`
    pub async fn lookup_user_id_for_url(&self, url: &str) -> Result<String, FlickrError> {
        let overrides = ErrorOverrides::new().on(
            "1",
            ApiError::ResourceNotFound(format!("Could not find user with URL: {url:?}")),
        );
        let resp = self
            .api_client
            .call("flickr.urls.lookupUser", &[("url", url)], &overrides)
            .await?;
        Ok(resp.required_descendant("user")?.required_attr("id")?.to_string())
    }

    /// Returns the member whose photos or profile are at `url`
    pub async fn lookup_user_by_url(&self, url: &str) -> Result<User, FlickrError> {
        let user_id = self.lookup_user_id_for_url(url).await?;
        self.get_user(UserRef::Id(&user_id)).await.map(|info| info.user)
    }
}

pub(crate) fn parse_user_info(user_id: &str, resp: &XmlElement) -> Result<UserInfo, FlickrError> {
    let person = resp.required_descendant("person")?;

    let username = person.required_child_text("username")?;
    let realname = person.child("realname").and_then(|r| r.text_or_none());
    let user = create_user(user_id, username, realname, person.attr("path_alias"));

    let count_photos = person
        .required_child("photos")?
        .required_child_text("count")?
        .trim()
        .parse()
        .map_err(|_| FlickrError::UnexpectedResponse("Photo count is not a number".to_string()))?;

    let has_pro_account = person.attr("ispro") == Some("1");
    let pro_account_expires = match (has_pro_account, person.attr("expire")) {
        (true, Some(expire)) if expire != "0" => Some(parse_timestamp(expire)?),
        _ => None,
    };

    // See https://www.flickr.com/services/api/misc.buddyicons.html
    let icon_server: u64 = person.attr("iconserver").and_then(|s| s.parse().ok()).unwrap_or(0);
    let buddy_icon_url = if icon_server > 0 {
        format!(
            "https://farm{}.staticflickr.com/{}/buddyicons/{}.jpg",
            person.attr("iconfarm").unwrap_or("0"),
            icon_server,
            user_id
        )
    } else {
        "https://www.flickr.com/images/buddyicon.gif".to_string()
    };

    Ok(UserInfo {
        user,
        description: from_empty_str_to_none(person.optional_child_text("description")),
        location: from_empty_str_to_none(person.optional_child_text("location")),
        buddy_icon_url,
        count_photos,
        has_pro_account,
        pro_account_expires,
    })
}
