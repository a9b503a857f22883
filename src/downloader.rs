/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

//! Saves photo and video files to disk.
use crate::rest::transport::map_reqwest_error;
use crate::rest::{Backoff, FlickrError, RetryPolicy};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;

/// A file written by [`Downloader::download_file`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub path: PathBuf,
    pub content_type: Option<String>,
}

/// Streams media files to disk.
///
/// The static file servers throttle with 403 and 429 as well as dropping
/// slow connections, so those are retried with a slower back-off than API calls.
#[derive(Debug, Clone)]
pub struct Downloader {
    https_client: reqwest::Client,
    retry: RetryPolicy,
}

impl Downloader {
    pub fn new(user_agent: &str) -> Result<Self, FlickrError> {
        Self::with_retry(
            user_agent,
            RetryPolicy::new(
                5,
                Backoff {
                    initial: Duration::from_secs(4),
                    max: Duration::from_secs(60),
                    jitter: false,
                },
            ),
        )
    }

    pub fn with_retry(user_agent: &str, retry: RetryPolicy) -> Result<Self, FlickrError> {
        let https_client = reqwest::Client::builder()
            .user_agent(user_agent)
            .connect_timeout(Duration::from_secs(15))
            .read_timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self { https_client, retry })
    }

    /// Downloads `url` into `dir`, naming the file `base_name` plus an
    /// extension picked from the response's content type.
    ///
    /// The body goes to a temporary file first, so a failed download never
    /// leaves a partial file under the final name.
    pub async fn download_file(
        &self,
        url: &str,
        dir: &Path,
        base_name: &str,
    ) -> Result<DownloadedFile, FlickrError> {
        tokio::fs::create_dir_all(dir).await?;
        self.retry
            .run(is_retryable_download, |attempt| async move {
                log::debug!("Downloading {url} (attempt {attempt})");
                self.download_once(url, dir, base_name).await
            })
            .await
    }

    async fn download_once(
        &self,
        url: &str,
        dir: &Path,
        base_name: &str,
    ) -> Result<DownloadedFile, FlickrError> {
        let mut resp = self
            .https_client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = resp.status().as_u16();
        if status >= 400 {
            return Err(FlickrError::HttpStatus {
                status,
                body: String::new(),
            });
        }

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let tmp_path = dir.join(format!("{base_name}.{:016x}.tmp", rand::random::<u64>()));
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
            .await?;

        let written: Result<(), FlickrError> = async {
            while let Some(chunk) = resp.chunk().await.map_err(map_reqwest_error)? {
                let chunk: Bytes = chunk;
                file.write_all(&chunk).await?;
            }
            file.flush().await?;
            Ok(())
        }
        .await;
        drop(file);

        if let Err(err) = written {
            remove_tmp_file(&tmp_path).await;
            return Err(err);
        }

        let file_name = match extension_for(content_type.as_deref()) {
            Some(ext) => format!("{base_name}.{ext}"),
            None => base_name.to_string(),
        };
        let path = dir.join(file_name);
        if let Err(err) = tokio::fs::rename(&tmp_path, &path).await {
            remove_tmp_file(&tmp_path).await;
            return Err(err.into());
        }

        Ok(DownloadedFile { path, content_type })
    }
}

async fn remove_tmp_file(tmp_path: &Path) {
    if let Err(err) = tokio::fs::remove_file(tmp_path).await {
        log::warn!("Unable to remove {}: {}", tmp_path.display(), err);
    }
}

/// Throttling and dropped connections are worth another go
pub fn is_retryable_download(err: &FlickrError) -> bool {
    match err {
        FlickrError::HttpStatus { status, .. } => *status == 403 || *status == 429,
        FlickrError::Timeout(_) | FlickrError::Disconnected(_) => true,
        _ => false,
    }
}

/// File extension for a media content type, ignoring any parameters
pub fn extension_for(content_type: Option<&str>) -> Option<&'static str> {
    let mime = content_type?.split(';').next()?.trim();
    match mime.to_ascii_lowercase().as_str() {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "video/mp4" => Some("mp4"),
        _ => None,
    }
}
