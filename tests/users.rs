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
    use crate::helpers::{FakeTransport, failure_response, fake_client};
    use flickr_photos::rest::{ApiError, FlickrError, UserRef};

    fn british_library() -> FakeTransport {
        FakeTransport::new()
            .fixture("flickr.urls.lookupUser", "user_lookup.xml")
            .fixture("flickr.people.getInfo", "person.xml")
    }

    #[tokio::test]
    async fn get_user_by_id() {
        let (client, transport) = fake_client(british_library());
        let info = client.get_user(UserRef::Id("12403504@N02")).await.unwrap();

        assert_eq!(info.user.id, "12403504@N02");
        assert_eq!(info.user.username, "The British Library");
        assert_eq!(info.user.realname.as_deref(), Some("British Library"));
        assert_eq!(info.user.path_alias.as_deref(), Some("britishlibrary"));
        assert_eq!(info.user.photos_url, "https://www.flickr.com/photos/britishlibrary/");
        assert_eq!(info.user.profile_url, "https://www.flickr.com/people/britishlibrary/");
        assert_eq!(info.location.as_deref(), Some("London, UK"));
        assert_eq!(info.count_photos, 1067362);
        assert!(!info.has_pro_account);
        assert_eq!(info.pro_account_expires, None);
        assert_eq!(
            info.buddy_icon_url,
            "https://farm8.staticflickr.com/7472/buddyicons/12403504@N02.jpg"
        );

        assert_eq!(transport.calls_to("flickr.urls.lookupUser"), 0);
        let request = &transport.requests_to("flickr.people.getInfo")[0];
        assert_eq!(request.param("user_id"), Some("12403504@N02"));
    }

    #[tokio::test]
    async fn get_user_by_url() {
        let (client, transport) = fake_client(british_library());
        let info = client
            .get_user(UserRef::Url("https://www.flickr.com/photos/britishlibrary/"))
            .await
            .unwrap();
        assert_eq!(info.user.id, "12403504@N02");

        let lookup = &transport.requests_to("flickr.urls.lookupUser")[0];
        assert_eq!(lookup.param("url"), Some("https://www.flickr.com/photos/britishlibrary/"));
        let get_info = &transport.requests_to("flickr.people.getInfo")[0];
        assert_eq!(get_info.param("user_id"), Some("12403504@N02"));
    }

    #[tokio::test]
    async fn lookup_user_by_url() {
        let (client, _) = fake_client(british_library());
        let user = client
            .lookup_user_by_url("https://www.flickr.com/people/britishlibrary/")
            .await
            .unwrap();
        assert_eq!(user.username, "The British Library");
        assert_eq!(user.path_alias.as_deref(), Some("britishlibrary"));
    }

    #[tokio::test]
    async fn deleted_user() {
        let (client, _) = fake_client(FakeTransport::new().route("flickr.people.getInfo", |_| {
            Ok(failure_response("5", "User not found"))
        }));
        let err = client.get_user(UserRef::Id("1@N01")).await.unwrap_err();
        assert_eq!(
            err.api_error(),
            Some(&ApiError::UserDeleted("1@N01".to_string()))
        );
    }

    #[tokio::test]
    async fn unknown_user() {
        let (client, _) = fake_client(FakeTransport::new().route("flickr.people.getInfo", |_| {
            Ok(failure_response("1", "User not found"))
        }));
        let err = client.get_user(UserRef::Id("1@N01")).await.unwrap_err();
        assert!(matches!(err, FlickrError::Api(ApiError::ResourceNotFound(_))));
    }

    #[tokio::test]
    async fn unknown_user_url() {
        let (client, transport) = fake_client(FakeTransport::new().route("flickr.urls.lookupUser", |_| {
            Ok(failure_response("1", "User not found"))
        }));
        let err = client
            .get_user(UserRef::Url("https://www.flickr.com/photos/nobody-here/"))
            .await
            .unwrap_err();
        assert!(matches!(err, FlickrError::Api(ApiError::ResourceNotFound(_))));
        assert_eq!(transport.calls_to("flickr.people.getInfo"), 0);
    }
}
