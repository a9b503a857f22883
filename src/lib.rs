/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

//! # Flickr Photos
//!
//! This library was created for reading photos and their metadata from the Flickr REST API.
//!
//! For further details on the Rest API refer to the [Flickr API Docs](https://www.flickr.com/services/api/)
//!
//! ## Features
//!
//! - Single photos, including every size they are available in
//! - Pages of photos from albums, galleries, group pools, photostreams and tag searches
//!     - Can stream every photo in any of those, a page at a time
//! - Members, licenses, comments and the photo's albums/galleries/groups
//! - Photos behind a flickr.com URL (given an external URL parser)
//! - Downloading photo and video files to disk
//! - Typed errors for the service's failure codes, with transient failures retried
//!
//! *Reads only need an API key. Posting comments needs OAuth1 tokens. This library
//! handles the request signing. Getting the Access Token/Secret is left up to
//! the consumer of this library*
//!
//! ## Installation
//!
//! ```toml
//! [dependencies]
//! flickr-photos = "0.1.0"
//! ```
//!
//! ## Usage
//!
//! **You will need to acquire an API key from Flickr prior to using the API**
//!
//! ```rust,no_run
//! use flickr_photos::rest::{Client, Creds};
//! use futures::{pin_mut, StreamExt};
//!
//!async fn count_album_tags(api_key: &str, user_id: &str, album_id: &str) -> anyhow::Result<usize> {
//!    let client = Client::new(Creds::from_api_key(api_key), "album-tagger/1.0")?;
//!
//!    // First page with the album's details
//!    let album = client.get_photos_in_album(user_id, album_id, 1, 10).await?;
//!    println!("{:?} has {} photos", album.album.title, album.collection.total_photos);
//!
//!    // Every photo in the album
//!    let photos = client.stream_photos_in_album(user_id, album_id)?;
//!    pin_mut!(photos);
//!    let mut tags = 0;
//!    while let Some(photo) = photos.next().await {
//!        tags += photo?.tags.len();
//!    }
//!    Ok(tags)
//!}
//! ```
//!
pub mod downloader;
pub mod rest;
