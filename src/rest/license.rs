/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::Client;
use crate::rest::api::LicenseTable;
use crate::rest::errors::{ErrorOverrides, FlickrError};
use crate::rest::parsers::from_empty_str_to_none;
use crate::rest::xml::XmlElement;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A license a photo can be published under.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct License {
    /// Short id such as `cc-by-2.0` or `in-copyright`
    pub id: String,
    pub label: String,
    pub url: Option<String>,
}

// Wire name -> (short id, label)
const KNOWN_LICENSES: [(&str, &str, &str); 11] = [
    ("All Rights Reserved", "in-copyright", "All Rights Reserved"),
    (
        "Attribution-NonCommercial-ShareAlike License",
        "cc-by-nc-sa-2.0",
        "CC BY-NC-SA 2.0",
    ),
    ("Attribution-NonCommercial License", "cc-by-nc-2.0", "CC BY-NC 2.0"),
    (
        "Attribution-NonCommercial-NoDerivs License",
        "cc-by-nc-nd-2.0",
        "CC BY-NC-ND 2.0",
    ),
    ("Attribution License", "cc-by-2.0", "CC BY 2.0"),
    ("Attribution-ShareAlike License", "cc-by-sa-2.0", "CC BY-SA 2.0"),
    ("Attribution-NoDerivs License", "cc-by-nd-2.0", "CC BY-ND 2.0"),
    (
        "No known copyright restrictions",
        "nkcr",
        "No known copyright restrictions",
    ),
    (
        "United States Government Work",
        "usgov",
        "United States Government Work",
    ),
    ("Public Domain Dedication (CC0)", "cc0-1.0", "CC0 1.0"),
    ("Public Domain Mark", "pdm", "Public Domain Mark"),
];

impl Client {
    /// Returns every license, keyed by the numeric code photos carry.
    ///
    /// The table is fetched once per client and served from memory afterwards.
    pub async fn get_licenses(&self) -> Result<BTreeMap<String, License>, FlickrError> {
        Ok(self.license_table().await?.as_ref().clone())
    }

    /// Returns the license for a numeric code like the one in `<photo license="4">`
    pub async fn lookup_license_by_id(&self, id: &str) -> Result<License, FlickrError> {
        self.license_table()
            .await?
            .get(id)
            .cloned()
            .ok_or_else(|| FlickrError::LicenseNotFound(id.to_string()))
    }

    pub(crate) async fn license_table(&self) -> Result<LicenseTable, FlickrError> {
        if let Some(licenses) = self.api_client.cached_licenses() {
            return Ok(licenses);
        }

        let resp = self
            .api_client
            .call("flickr.photos.licenses.getInfo", &[], &ErrorOverrides::new())
            .await?;
        let licenses = Arc::new(parse_licenses(&resp)?);
        self.api_client.store_licenses(licenses.clone());
        Ok(licenses)
    }
}

fn parse_licenses(resp: &XmlElement) -> Result<BTreeMap<String, License>, FlickrError> {
    let mut result = BTreeMap::new();
    for lic in resp.descendants_named("license") {
        let name = lic.required_attr("name")?;
        let (id, label) = match KNOWN_LICENSES.iter().find(|(n, _, _)| *n == name) {
            Some((_, id, label)) => (id.to_string(), label.to_string()),
            None => {
                log::warn!("Unrecognised license name {name:?}");
                (slugify(name), name.to_string())
            }
        };
        result.insert(
            lic.required_attr("id")?.to_string(),
            License {
                id,
                label,
                url: from_empty_str_to_none(lic.attr("url")),
            },
        );
    }
    Ok(result)
}

// Lowercase alphanumeric runs joined by '-'
fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_license_table() {
        let resp = XmlElement::parse(
            r#"<rsp stat="ok">
<licenses>
  <license id="0" name="All Rights Reserved" url="" />
  <license id="4" name="Attribution License" url="https://creativecommons.org/licenses/by/2.0/" />
  <license id="10" name="Public Domain Mark" url="https://creativecommons.org/publicdomain/mark/1.0/" />
  <license id="11" name="Attribution 4.0 International" url="https://creativecommons.org/licenses/by/4.0/" />
</licenses>
</rsp>"#,
        )
        .unwrap();
        let licenses = parse_licenses(&resp).unwrap();
        assert_eq!(
            licenses["0"],
            License {
                id: "in-copyright".to_string(),
                label: "All Rights Reserved".to_string(),
                url: None
            }
        );
        assert_eq!(licenses["4"].id, "cc-by-2.0");
        assert_eq!(licenses["4"].label, "CC BY 2.0");
        assert_eq!(licenses["10"].id, "pdm");
        assert_eq!(licenses["11"].id, "attribution-4-0-international");
        assert_eq!(licenses["11"].label, "Attribution 4.0 International");
    }
}
