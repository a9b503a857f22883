/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use flickr_photos::rest::{
    ApiRequest, Client, Creds, FlickrError, HttpResponse, RetryPolicy, Transport,
};
use futures::future::BoxFuture;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

type Responder = Box<dyn Fn(&ApiRequest) -> Result<HttpResponse, FlickrError> + Send + Sync>;

/// Transport that answers from canned responses, keyed by API method name.
///
/// Scripted replies for a method are used up first, then its route. Calls to
/// a method with neither get a "method not found" failure envelope.
#[derive(Default)]
pub(crate) struct FakeTransport {
    routes: HashMap<String, Responder>,
    scripted: Mutex<HashMap<String, VecDeque<Result<HttpResponse, FlickrError>>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

#[allow(dead_code)]
impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Answers every call to `method` with `f`
    pub(crate) fn route<F>(mut self, method: &str, f: F) -> Self
    where
        F: Fn(&ApiRequest) -> Result<HttpResponse, FlickrError> + Send + Sync + 'static,
    {
        self.routes.insert(method.to_string(), Box::new(f));
        self
    }

    /// Answers every call to `method` with the same body
    pub(crate) fn xml(self, method: &str, body: &str) -> Self {
        let body = body.to_string();
        self.route(method, move |_| Ok(xml_response(&body)))
    }

    /// Answers every call to `method` with a fixture file
    pub(crate) fn fixture(self, method: &str, name: &str) -> Self {
        let body = fixture(name);
        self.xml(method, &body)
    }

    /// Queues one-off replies for `method`, used before its route
    pub(crate) fn script(
        self,
        method: &str,
        replies: Vec<Result<HttpResponse, FlickrError>>,
    ) -> Self {
        self.scripted
            .lock()
            .unwrap()
            .entry(method.to_string())
            .or_default()
            .extend(replies);
        self
    }

    pub(crate) fn with_licenses(self) -> Self {
        self.fixture("flickr.photos.licenses.getInfo", "licenses.xml")
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn requests_to(&self, method: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method() == Some(method))
            .collect()
    }

    pub(crate) fn calls_to(&self, method: &str) -> usize {
        self.requests_to(method).len()
    }
}

impl Transport for FakeTransport {
    fn send<'a>(
        &'a self,
        request: &'a ApiRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, FlickrError>> {
        self.requests.lock().unwrap().push(request.clone());
        let method = request.method().unwrap_or_default().to_string();

        let scripted = self
            .scripted
            .lock()
            .unwrap()
            .get_mut(&method)
            .and_then(|queue| queue.pop_front());

        let result = match scripted {
            Some(reply) => reply,
            None => match self.routes.get(&method) {
                Some(f) => f(request),
                None => Ok(xml_response(&format!(
                    r#"<rsp stat="fail"><err code="112" msg="Method &quot;{method}&quot; not found" /></rsp>"#
                ))),
            },
        };
        Box::pin(async move { result })
    }
}

#[allow(dead_code)]
pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Client on top of a fake transport, retrying without delays
#[allow(dead_code)]
pub(crate) fn fake_client(transport: FakeTransport) -> (Client, Arc<FakeTransport>) {
    init_logging();
    let transport = Arc::new(transport);
    let client = Client::with_transport(transport.clone(), RetryPolicy::no_delay(5));
    (client, transport)
}

pub(crate) fn xml_response(body: &str) -> HttpResponse {
    HttpResponse {
        status: 200,
        content_type: Some("text/xml; charset=utf-8".to_string()),
        body: body.to_string(),
    }
}

#[allow(dead_code)]
pub(crate) fn status_response(status: u16) -> HttpResponse {
    HttpResponse {
        status,
        content_type: Some("text/html".to_string()),
        body: format!("<html><body>Error {status}</body></html>"),
    }
}

#[allow(dead_code)]
pub(crate) fn failure_response(code: &str, msg: &str) -> HttpResponse {
    xml_response(&format!(
        r#"<?xml version="1.0" encoding="utf-8" ?>
<rsp stat="fail">
	<err code="{code}" msg="{msg}" />
</rsp>"#
    ))
}

pub(crate) fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("Unable to read fixture {}: {err}", path.display()))
}

/// Serves a search-style list of `total` photos, paginated like the real API.
///
/// Photo `i` (0-based) has id `1000 + i` and owner `owner{i % 3}@N01`.
/// Pages past the end are empty but keep the same `pages`/`total`.
#[allow(dead_code)]
pub(crate) fn synthetic_collection(
    total: u64,
) -> impl Fn(&ApiRequest) -> Result<HttpResponse, FlickrError> + Send + Sync + 'static {
    move |request| {
        let page: u64 = request.param("page").unwrap_or("1").parse().unwrap();
        let per_page: u64 = request.param("per_page").unwrap_or("100").parse().unwrap();
        let pages = total.div_ceil(per_page);

        let start = (page - 1) * per_page;
        let end = (start + per_page).min(total);
        let photos: String = (start..end.max(start)).map(synthetic_photo).collect();

        Ok(xml_response(&format!(
            r#"<?xml version="1.0" encoding="utf-8" ?>
<rsp stat="ok">
<photos page="{page}" pages="{pages}" perpage="{per_page}" total="{total}">
{photos}</photos>
</rsp>"#
        )))
    }
}

fn synthetic_photo(i: u64) -> String {
    let id = 1000 + i;
    let owner = i % 3;
    format!(
        r#"<photo id="{id}" owner="owner{owner}@N01" secret="abc{i}" server="65535" farm="66" title="Photo {i}" ispublic="1" isfriend="0" isfamily="0" license="4" dateupload="{upload}" datetaken="2020-01-01 00:00:{sec:02}" datetakengranularity="0" datetakenunknown="0" ownername="Owner {owner}" realname="" pathalias="" tags="synthetic photo{i}" media="photo" media_status="ready" safety_level="0" count_comments="0" count_views="{i}" latitude="0" longitude="0" accuracy="0" context="0" url_sq="https://live.staticflickr.com/65535/{id}_abc{i}_s.jpg" height_sq="75" width_sq="75"><description /></photo>
"#,
        upload = 1_600_000_000 + i,
        sec = i % 60,
    )
}

#[allow(dead_code)]
pub(crate) fn get_read_only_auth_tokens() -> anyhow::Result<Creds> {
    let api_key = std::env::var("FLICKR_API_KEY")?;
    Ok(Creds::from_api_key(&api_key))
}

#[allow(dead_code)]
pub(crate) fn get_full_auth_tokens() -> anyhow::Result<Creds> {
    Ok(Creds::from_env()?)
}

/// One canned answer from the [`serve`] stub, per connection
#[allow(dead_code)]
pub(crate) enum Reply {
    Http {
        status: &'static str,
        content_type: &'static str,
        body: &'static [u8],
    },
    /// Advertises more bytes than it sends, then closes
    Truncated {
        content_type: &'static str,
        body: &'static [u8],
    },
    /// Closes the connection without answering
    HangUp,
}

/// Serves one reply per connection, repeating the last one forever.
/// Returns the base URL and a counter of connections served.
#[allow(dead_code)]
pub(crate) async fn serve(replies: Vec<Reply>) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let served = Arc::new(AtomicUsize::new(0));
    let counter = served.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let n = counter.fetch_add(1, Ordering::SeqCst);
            let reply = &replies[n.min(replies.len() - 1)];

            // Read up to the end of the request headers
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(len) => request.extend_from_slice(&buf[..len]),
                }
            }

            let (status, content_type, body, advertised) = match reply {
                Reply::Http {
                    status,
                    content_type,
                    body,
                } => (*status, *content_type, *body, body.len()),
                Reply::Truncated { content_type, body } => {
                    ("200 OK", *content_type, *body, body.len() + 1024)
                }
                Reply::HangUp => {
                    drop(socket);
                    continue;
                }
            };
            let head = format!(
                "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {advertised}\r\nConnection: close\r\n\r\n"
            );
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.write_all(body).await;
            let _ = socket.shutdown().await;
        }
    });

    (format!("http://{addr}"), served)
}
