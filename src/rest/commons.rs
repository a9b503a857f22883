/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::Client;
use crate::rest::errors::{ErrorOverrides, FlickrError};
use crate::rest::parsers::parse_timestamp;
use crate::rest::xml::XmlElement;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A member of [The Commons](https://www.flickr.com/commons).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CommonsInstitution {
    pub user_id: String,
    pub date_launch: DateTime<Utc>,
    pub name: String,
    pub site_url: String,
    pub license_url: String,
}

impl Client {
    pub async fn list_commons_institutions(&self) -> Result<Vec<CommonsInstitution>, FlickrError> {
        let resp = self
            .api_client
            .call("flickr.commons.getInstitutions", &[], &ErrorOverrides::new())
            .await?;

        resp.descendants_named("institution")
            .into_iter()
            .map(parse_institution)
            .collect()
    }
}

// <institution nsid="8623220@N02" date_launch="1200470400">
//   <name>The Library of Congress</name>
//   <urls>
//     <url type="site">http://www.loc.gov/</url>
//     <url type="license">http://www.loc.gov/rr/print/195_copr.html#noknown</url>
//   </urls>
// </institution>
fn parse_institution(elem: &XmlElement) -> Result<CommonsInstitution, FlickrError> {
    let url_of = |kind: &str| {
        elem.descendants_named("url")
            .into_iter()
            .find(|u| u.attr("type") == Some(kind))
            .and_then(|u| u.text_or_none())
            .map(str::to_string)
            .ok_or_else(|| {
                FlickrError::UnexpectedResponse(format!("Institution has no {kind} URL"))
            })
    };

    Ok(CommonsInstitution {
        user_id: elem.required_attr("nsid")?.to_string(),
        date_launch: parse_timestamp(elem.required_attr("date_launch")?)?,
        name: elem.required_child_text("name")?.to_string(),
        site_url: url_of("site")?,
        license_url: url_of("license")?,
    })
}
