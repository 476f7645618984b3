// The reqwest-backed Doer against a tiny local HTTP server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::Method;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use url::Url;

use dirhound::client::{build_doer, ClientConfig, Doer, HttpDoer, ProbeRequest};
use dirhound::error::DoerError;
use dirhound::scan::{
    DictionaryProducer, HttpStatusResultFilter, Producer, ReProducer, ResultFilter, ScanResult,
    Scanner, Target,
};

// Serves canned responses by path, one request per connection, and keeps
// the (lowercased) request heads it received
struct TestServer {
    url: Url,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    async fn start(respond: fn(&str) -> String) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = Url::parse(&format!("http://{}/", listener.local_addr().unwrap())).unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let seen = Arc::clone(&requests);
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let seen = Arc::clone(&seen);

                tokio::spawn(async move {
                    let head = read_head(&mut socket).await;
                    let path = head
                        .split_whitespace()
                        .nth(1)
                        .unwrap_or("/")
                        .to_string();
                    seen.lock().unwrap().push(head.to_lowercase());

                    let _ = socket.write_all(respond(&path).as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self { url, requests }
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];

    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }

    String::from_utf8_lossy(&head).to_string()
}

fn response(status: &str, extra_headers: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        extra_headers,
        body.len(),
        body
    )
}

fn site(path: &str) -> String {
    match path {
        "/home" => response("200 OK", "", "hello"),
        "/old" => response("301 Moved Permanently", "Location: /home\r\n", ""),
        // only ever requested with HEAD: the length is announced, no body follows
        "/archive.zip" => {
            "HTTP/1.1 200 OK\r\nContent-Length: 1234\r\nConnection: close\r\n\r\n".to_string()
        }
        _ => response("404 Not Found", "", ""),
    }
}

fn get(url: &Url, path: &str, read_body: bool) -> ProbeRequest {
    ProbeRequest {
        method: Method::GET,
        url: url.join(path).unwrap(),
        read_body,
    }
}

#[tokio::test]
async fn test_reports_response_without_following_redirects() {
    let server = TestServer::start(site).await;
    let doer = HttpDoer::new(&ClientConfig::default(), &server.url).unwrap();

    let response = doer.perform(get(&server.url, "/old", false)).await.unwrap();

    assert_eq!(response.status, 301);
    assert_eq!(response.location.as_deref(), Some("/home"));
    assert_eq!(response.url.path(), "/old");
    assert_eq!(response.content_length, Some(0));
    assert!(response.body.is_none());
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_head_keeps_announced_content_length() {
    let server = TestServer::start(site).await;
    let doer = HttpDoer::new(&ClientConfig::default(), &server.url).unwrap();

    let request = ProbeRequest {
        method: Method::HEAD,
        url: server.url.join("/archive.zip").unwrap(),
        read_body: false,
    };
    let response = doer.perform(request).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.content_length, Some(1234));
    assert!(server.requests()[0].starts_with("head /archive.zip"));

    // a HEAD hit is not an "empty body" page
    let result = ScanResult::new(Target::new("/archive.zip", "HEAD", 0), &response);
    assert_eq!(result.content_length, 1234);

    let filter = HttpStatusResultFilter::new([404], true, Vec::new(), false);
    assert!(!filter.should_ignore(&result));
}

#[tokio::test]
async fn test_reads_body_only_when_asked() {
    let server = TestServer::start(site).await;
    let doer = HttpDoer::new(&ClientConfig::default(), &server.url).unwrap();

    let response = doer.perform(get(&server.url, "/home", true)).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.content_length, Some(5));
    assert_eq!(response.body.as_deref(), Some(&b"hello"[..]));
}

#[tokio::test]
async fn test_sends_configured_identity() {
    let server = TestServer::start(site).await;
    let config = ClientConfig {
        user_agent: Some("dirhound-test".to_string()),
        headers: vec![("X-Scan".to_string(), "1".to_string())],
        cookies: vec![("session".to_string(), "abc".to_string())],
        ..ClientConfig::default()
    };
    let doer = HttpDoer::new(&config, &server.url).unwrap();

    doer.perform(get(&server.url, "/home", false)).await.unwrap();

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].contains("user-agent: dirhound-test"));
    assert!(requests[0].contains("x-scan: 1"));
    assert!(requests[0].contains("cookie: session=abc"));
}

#[tokio::test]
async fn test_cookie_jar_carries_fixed_cookies() {
    let server = TestServer::start(site).await;
    let config = ClientConfig {
        use_cookie_jar: true,
        cookies: vec![("session".to_string(), "abc".to_string())],
        ..ClientConfig::default()
    };
    let doer = HttpDoer::new(&config, &server.url).unwrap();

    doer.perform(get(&server.url, "/home", false)).await.unwrap();

    assert!(server.requests()[0].contains("cookie: session=abc"));
}

#[tokio::test]
async fn test_cached_doer_refuses_repeats() {
    let server = TestServer::start(site).await;
    let config = ClientConfig {
        cache_requests: true,
        ..ClientConfig::default()
    };
    let doer = build_doer(&config, &server.url).unwrap();

    doer.perform(get(&server.url, "/home", false)).await.unwrap();
    let repeated = doer.perform(get(&server.url, "/home", false)).await;

    assert!(matches!(repeated, Err(DoerError::RedundantRequest)));
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_unreachable_host_is_a_transport_error() {
    let config = ClientConfig {
        timeout: Duration::from_millis(500),
        ..ClientConfig::default()
    };
    // port 9 (discard) on localhost is not expected to be listening
    let target = Url::parse("http://127.0.0.1:9/").unwrap();
    let doer = HttpDoer::new(&config, &target).unwrap();

    let outcome = doer.perform(get(&target, "/home", false)).await;

    assert!(matches!(outcome, Err(DoerError::Transport(_))));
}

#[tokio::test]
async fn test_full_scan_over_http() {
    let server = TestServer::start(site).await;
    let doer = build_doer(&ClientConfig::default(), &server.url).unwrap();

    let producer: Arc<dyn Producer> = Arc::new(DictionaryProducer::new(
        vec!["GET".to_string()],
        vec!["/old".to_string(), "/missing".to_string()],
        1,
    ));
    let reproducer = Arc::new(ReProducer::new(Arc::clone(&producer)));
    let filter = HttpStatusResultFilter::new([404], false, Vec::new(), false);
    let sut = Scanner::new(doer, producer, reproducer, Arc::new(filter));

    let mut results = sut.scan(CancellationToken::new(), &server.url, 2);
    let mut found = Vec::new();
    while let Some(result) = results.recv().await {
        found.push((result.target.path, result.status_code));
    }
    found.sort();

    assert_eq!(
        found,
        vec![("/home".to_string(), 200), ("/old".to_string(), 301)]
    );
}
