/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

pub mod album;
pub mod api;
pub mod client;
pub mod collection;
pub mod comment;
pub mod commons;
pub mod contexts;
pub mod creds;
pub mod errors;
pub mod from_url;
pub mod gallery;
pub mod group;
pub mod license;
mod parsers;
pub mod photo;
pub mod properties;
pub mod retry;
pub mod tags;
pub mod transport;
pub mod user;
pub mod xml;

pub use album::*;
pub use api::{API_ENDPOINT, ApiClient, ApiParams, MAX_PER_PAGE};
pub use client::*;
pub use collection::*;
pub use comment::*;
pub use commons::*;
pub use contexts::*;
pub use creds::*;
pub use errors::*;
pub use from_url::*;
pub use gallery::*;
pub use group::*;
pub use license::*;
pub use photo::*;
pub use properties::*;
pub use retry::*;
pub use tags::*;
pub use transport::*;
pub use user::*;
pub use xml::XmlElement;
