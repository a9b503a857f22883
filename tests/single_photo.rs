/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
mod helpers;

#[cfg(test)]
mod test {
    use crate::helpers::{FakeTransport, failure_response, fake_client, fixture, xml_response};
    use flickr_photos::rest::{
        ApiError, ExifTag, FlickrError, MediaType, SafetyLevel, TakenGranularity,
    };

    fn coast_guard_photo() -> FakeTransport {
        FakeTransport::new()
            .with_licenses()
            .fixture("flickr.photos.getInfo", "photo_info.xml")
            .fixture("flickr.photos.getSizes", "photo_sizes.xml")
    }

    #[tokio::test]
    async fn get_single_photo() {
        let (client, transport) = fake_client(coast_guard_photo());
        let photo = client.get_single_photo("32812033543").await.unwrap();

        let info = &photo.info;
        assert_eq!(info.id, "32812033543");
        assert_eq!(info.media, MediaType::Photo);
        assert_eq!(info.original_format.as_deref(), Some("jpg"));
        assert_eq!(info.title.as_deref(), Some("Puppy Kisses"));
        assert_eq!(info.safety_level, SafetyLevel::Safe);
        assert_eq!(info.license.id, "usgov");
        assert_eq!(info.owner.username, "U.S. Coast Guard");
        assert_eq!(info.owner.path_alias.as_deref(), Some("coast_guard"));
        assert_eq!(info.owner.photos_url, "https://www.flickr.com/photos/coast_guard/");
        assert_eq!(info.url, "https://www.flickr.com/photos/coast_guard/32812033543/");
        assert_eq!(info.count_comments, 2);
        assert_eq!(info.count_views, 6690);
        assert!(info.visibility.is_public);
        assert!(!info.visibility.is_family);

        let taken = info.date_taken.as_ref().unwrap();
        assert_eq!(taken.granularity, TakenGranularity::Second);
        assert_eq!(taken.value.to_string(), "2017-02-17 00:00:00");
        assert_eq!(info.date_posted.timestamp(), 1490376472);

        let location = info.location.as_ref().unwrap();
        assert_eq!(location.accuracy, 16);
        assert_eq!(location.latitude, 9.135158);

        assert_eq!(photo.sizes.len(), 5);
        assert_eq!(photo.sizes[4].label, "Original");
        assert_eq!(photo.sizes[4].width, Some(3000));

        assert_eq!(transport.calls_to("flickr.photos.getInfo"), 1);
        assert_eq!(transport.calls_to("flickr.photos.getSizes"), 1);
    }

    #[tokio::test]
    async fn tags_keep_normalized_and_raw_values() {
        let (client, _) = fake_client(coast_guard_photo());
        let info = client.get_single_photo_info("32812033543").await.unwrap();

        assert_eq!(info.tags, vec!["indianocean", "puppy", "uscg:ship=tampa", ""]);
        assert_eq!(info.raw_tags[0].raw_value, "indian ocean");
        assert_eq!(info.raw_tags[0].normalized_value, "indianocean");
        assert_eq!(info.raw_tags[0].author_name, "U.S. Coast Guard");
        assert!(!info.raw_tags[0].is_machine_tag);
        assert!(info.raw_tags[2].is_machine_tag);
        assert_eq!(info.raw_tags[3].normalized_value, "");
        assert_eq!(info.machine_tags["uscg:ship"], vec!["tampa"]);
    }

    #[tokio::test]
    async fn photo_without_downloads_has_no_original() {
        let (client, _) = fake_client(
            FakeTransport::new()
                .with_licenses()
                .fixture("flickr.photos.getInfo", "photo_info_no_downloads.xml")
                .fixture("flickr.photos.getSizes", "photo_sizes_no_downloads.xml"),
        );
        let photo = client.get_single_photo("53248015596").await.unwrap();

        assert_eq!(photo.info.original_format, None);
        assert!(photo.sizes.iter().all(|s| s.label != "Original"));

        // Empty fields all come back as None
        assert_eq!(photo.info.title, None);
        assert_eq!(photo.info.description, None);
        assert_eq!(photo.info.owner.realname, None);
        assert_eq!(photo.info.owner.path_alias, None);
        assert!(photo.info.tags.is_empty());
        assert!(photo.info.machine_tags.is_empty());
        assert_eq!(photo.info.license.id, "in-copyright");
        assert_eq!(photo.info.license.url, None);
    }

    #[tokio::test]
    async fn zero_date_taken_is_unknown() {
        let (client, _) = fake_client(
            FakeTransport::new()
                .with_licenses()
                .fixture("flickr.photos.getInfo", "photo_info_no_downloads.xml"),
        );
        let info = client.get_single_photo_info("53248015596").await.unwrap();
        assert_eq!(info.date_taken, None);
    }

    #[tokio::test]
    async fn zero_accuracy_location_is_discarded() {
        let (client, _) = fake_client(
            FakeTransport::new()
                .with_licenses()
                .fixture("flickr.photos.getInfo", "photo_info_no_downloads.xml"),
        );
        let info = client.get_single_photo_info("53248015596").await.unwrap();
        assert_eq!(info.location, None);
    }

    #[tokio::test]
    async fn every_location_accuracy_is_kept() {
        for accuracy in 1..=16u8 {
            let body = fixture("photo_info.xml").replace(
                r#"accuracy="16""#,
                &format!(r#"accuracy="{accuracy}""#),
            );
            let (client, _) = fake_client(
                FakeTransport::new()
                    .with_licenses()
                    .xml("flickr.photos.getInfo", &body),
            );
            let info = client.get_single_photo_info("32812033543").await.unwrap();
            assert_eq!(info.location.unwrap().accuracy, accuracy);
        }
    }

    #[tokio::test]
    async fn unknown_flag_hides_date_taken() {
        let body = fixture("photo_info.xml").replace(r#"takenunknown="0""#, r#"takenunknown="1""#);
        let (client, _) = fake_client(
            FakeTransport::new()
                .with_licenses()
                .xml("flickr.photos.getInfo", &body),
        );
        let info = client.get_single_photo_info("32812033543").await.unwrap();
        assert_eq!(info.date_taken, None);
    }

    #[tokio::test]
    async fn missing_photo_is_not_found() {
        let (client, _) = fake_client(FakeTransport::new().route("flickr.photos.getInfo", |_| {
            Ok(failure_response("1", "Photo not found"))
        }));
        let err = client.get_single_photo("12345678901234567890").await.unwrap_err();
        assert!(matches!(
            err,
            FlickrError::Api(ApiError::ResourceNotFound(_))
        ));
    }

    #[tokio::test]
    async fn private_photo_is_distinct_from_missing() {
        let (client, _) = fake_client(FakeTransport::new().route("flickr.photos.getInfo", |_| {
            Ok(failure_response("2", "Permission denied"))
        }));
        let err = client.get_single_photo_info("53506958196").await.unwrap_err();
        assert_eq!(
            err.api_error(),
            Some(&ApiError::PhotoIsPrivate("53506958196".to_string()))
        );
    }

    #[tokio::test]
    async fn invalid_photo_ids_make_no_calls() {
        let (client, transport) = fake_client(coast_guard_photo());
        for photo_id in ["", "-1", "https://www.flickr.com/photos/coast_guard/32812033543/"] {
            let err = client.get_single_photo(photo_id).await.unwrap_err();
            assert!(matches!(err, FlickrError::InvalidArgument(_)));
        }
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn is_photo_deleted() {
        let (client, _) = fake_client(
            FakeTransport::new()
                .script(
                    "flickr.photos.getInfo",
                    vec![
                        Ok(failure_response("1", "Photo not found")),
                        Ok(failure_response("2", "Permission denied")),
                    ],
                )
                .fixture("flickr.photos.getInfo", "photo_info.xml"),
        );
        assert!(client.is_photo_deleted("1").await.unwrap());
        assert!(!client.is_photo_deleted("2").await.unwrap());
        assert!(!client.is_photo_deleted("32812033543").await.unwrap());
    }

    #[tokio::test]
    async fn video_sizes_may_lack_dimensions() {
        let (client, _) = fake_client(FakeTransport::new().route("flickr.photos.getSizes", |_| {
            Ok(xml_response(
                r#"<rsp stat="ok"><sizes canblog="0" canprint="0" candownload="1">
<size label="Square" width="75" height="75" source="https://live.staticflickr.com/31337/4_5_s.jpg" url="https://www.flickr.com/photos/x/4/sizes/sq/" media="photo" />
<size label="Site MP4" width="" height="" source="https://www.flickr.com/photos/x/4/play/site/5/" url="https://www.flickr.com/photos/x/4/" media="video" />
</sizes></rsp>"#,
            ))
        }));
        let sizes = client.get_single_photo_sizes("4").await.unwrap();
        assert_eq!(sizes[1].media, MediaType::Video);
        assert_eq!(sizes[1].width, None);
        assert_eq!(sizes[1].height, None);
    }

    #[tokio::test]
    async fn exif_tags() {
        let (client, _) = fake_client(
            FakeTransport::new().fixture("flickr.photos.getExif", "photo_exif.xml"),
        );
        let exif = client.get_exif_tags_for_photo("54159643533").await.unwrap();

        assert_eq!(exif.len(), 3);
        assert_eq!(exif[0].tag, "Make");
        assert_eq!(exif[0].raw_value.as_deref(), Some("Canon"));
        assert_eq!(exif[0].clean_value, None);
        assert_eq!(
            exif[1],
            ExifTag {
                tagspace: "IFD0".to_string(),
                tagspace_id: "0".to_string(),
                tag: "XResolution".to_string(),
                label: "X-Resolution".to_string(),
                raw_value: Some("72".to_string()),
                clean_value: Some("72 dpi".to_string()),
            }
        );
        assert_eq!(exif[2].raw_value, None);
        assert_eq!(exif[2].clean_value.as_deref(), Some(".\n\t\t\t\t\t"));
    }

    #[tokio::test]
    async fn hidden_exif_is_permission_denied() {
        let (client, _) = fake_client(FakeTransport::new().route("flickr.photos.getExif", |_| {
            Ok(failure_response("2", "Permission denied"))
        }));
        let err = client.get_exif_tags_for_photo("54208962452").await.unwrap_err();
        assert!(matches!(
            err.api_error(),
            Some(ApiError::PermissionDenied(_))
        ));
    }

    #[tokio::test]
    async fn exif_for_missing_photo_is_not_found() {
        let (client, _) = fake_client(FakeTransport::new().route("flickr.photos.getExif", |_| {
            Ok(failure_response("1", "Photo not found"))
        }));
        let err = client.get_exif_tags_for_photo("12345678901234567890").await.unwrap_err();
        assert!(matches!(
            err.api_error(),
            Some(ApiError::ResourceNotFound(_))
        ));
    }
}
