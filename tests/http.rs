mod mock;

use mock::MockNetwork;
use qsense::network::application::http::client::{BODY_LEN, LINE_LEN};
use qsense::network::application::http::request::MAX_HEADERS;
use qsense::network::application::http::{Client, Headers, Method, Request};
use qsense::network::error::Error;

fn header<'a>(headers: &'a Headers, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.as_str() == name)
        .map(|(_, value)| value.as_str())
}

#[test]
fn test_get_writes_request_line_and_headers() {
    let network = MockNetwork::new(&[b"HTTP/1.1 200 OK\r\n\r\n"]);
    let log = network.log.clone();
    let mut client = Client::new(network);

    assert!(client.connect("example.com", 8080));
    let mut request = Request::new("/time");
    request.set_parameter("tz", "UTC+1").unwrap();
    request.set_header("Accept", "text/plain").unwrap();
    assert_eq!(client.get(&request), Ok(200));

    let log = log.borrow();
    assert_eq!(log.remotes, ["example.com:8080"]);
    assert_eq!(
        log.request(0),
        "GET /time?tz=UTC%2B1 HTTP/1.1\r\n\
         Host: example.com\r\n\
         Accept: text/plain\r\n\
         Connection: close\r\n\
         \r\n"
    );
}

#[test]
fn test_post_sends_body_with_length() {
    let network = MockNetwork::new(&[b"HTTP/1.1 201 Created\r\n\r\n"]);
    let log = network.log.clone();
    let mut client = Client::new(network);

    assert!(client.connect_default("example.com"));
    let mut request = Request::new("/items");
    request.set_body(r#"{"a":1}"#);
    request
        .set_header("Content-Type", "application/json")
        .unwrap()
        .set_header("Content-Length", "999")
        .unwrap();
    assert_eq!(client.post(&request), Ok(201));

    let log = log.borrow();
    assert_eq!(log.remotes, ["example.com:80"]);
    assert_eq!(
        log.request(0),
        "POST /items HTTP/1.1\r\n\
         Host: example.com\r\n\
         Content-Type: application/json\r\n\
         Content-Length: 7\r\n\
         Connection: close\r\n\
         \r\n\
         {\"a\":1}"
    );
}

#[test]
fn test_remove_uses_delete() {
    let network = MockNetwork::new(&[b"HTTP/1.1 204 No Content\r\n\r\n"]);
    let log = network.log.clone();
    let mut client = Client::new(network);

    assert!(client.connect("example.com", 80));
    assert_eq!(client.remove(&Request::new("/items/1")), Ok(204));
    assert!(log.borrow().request(0).starts_with("DELETE /items/1 HTTP/1.1\r\n"));
}

#[test]
fn test_status_line_then_end_of_stream() {
    let network = MockNetwork::new(&[b"HTTP/1.1 202 Accepted\r\n"]);
    let log = network.log.clone();
    let mut client = Client::new(network);

    assert!(client.connect("example.com", 80));
    assert_eq!(client.post(&Request::new("/rest/v1/event")), Ok(202));
    assert!(client.connected());

    assert_eq!(client.read_line().as_str(), "");
    assert!(!client.connected());
    assert_eq!(log.borrow().closes, 1);
}

#[test]
fn test_read_line_across_partial_reads() {
    let mut network = MockNetwork::new(&[b"HTTP/1.1 200 OK\r\nfirst line\r\nsecond\n"]);
    network.chunk = 3;
    let mut client = Client::new(network);

    assert!(client.connect("example.com", 80));
    assert_eq!(client.get(&Request::new("/")), Ok(200));
    assert_eq!(client.read_line().as_str(), "first line");
    assert_eq!(client.read_line().as_str(), "second");
    assert_eq!(client.read_line().as_str(), "");
}

#[test]
fn test_read_line_truncates_long_lines() {
    static RESPONSE: std::sync::LazyLock<Vec<u8>> = std::sync::LazyLock::new(|| {
        let mut response = b"HTTP/1.1 200 OK\r\n\r\n".to_vec();
        response.extend(std::iter::repeat_n(b'x', LINE_LEN + 100));
        response.extend_from_slice(b"\r\ntail\r\n");
        response
    });
    let network = MockNetwork::new(&[RESPONSE.as_slice()]);
    let mut client = Client::new(network);

    assert!(client.connect("example.com", 80));
    assert_eq!(client.get(&Request::new("/")), Ok(200));
    assert!(client.read_headers().is_empty());
    assert_eq!(client.read_line().len(), LINE_LEN);
    assert_eq!(client.read_line().as_str(), "tail");
}

#[test]
fn test_invalid_utf8_is_cut_at_valid_prefix() {
    let network = MockNetwork::new(&[b"HTTP/1.1 200 \xffOK\r\n\r\nab\xffcd\r\n"]);
    let mut client = Client::new(network);

    assert!(client.connect("example.com", 80));
    assert_eq!(client.get(&Request::new("/")), Ok(200));
    assert_eq!(client.read_body().as_str(), "ab");
}

#[test]
fn test_headers_beyond_capacity_are_dropped() {
    static RESPONSE: std::sync::LazyLock<Vec<u8>> = std::sync::LazyLock::new(|| {
        let mut response = b"HTTP/1.1 200 OK\r\n".to_vec();
        for i in 0..=MAX_HEADERS {
            response.extend(format!("X-Header-{}: {}\r\n", i, i).bytes());
        }
        response.extend_from_slice(b"\r\nbody\r\n");
        response
    });
    let network = MockNetwork::new(&[RESPONSE.as_slice()]);
    let mut client = Client::new(network);

    assert!(client.connect("example.com", 80));
    assert_eq!(client.get(&Request::new("/")), Ok(200));

    let headers = client.read_headers();
    assert_eq!(headers.len(), MAX_HEADERS);
    assert_eq!(header(&headers, "X-Header-0"), Some("0"));
    assert_eq!(header(&headers, &format!("X-Header-{}", MAX_HEADERS)), None);
    assert_eq!(client.read_body().as_str(), "body");
}

#[test]
fn test_oversized_body_is_cut_and_drained() {
    const LINE: usize = 100;
    static RESPONSE: std::sync::LazyLock<Vec<u8>> = std::sync::LazyLock::new(|| {
        let mut response = b"HTTP/1.1 200 OK\r\n\r\n".to_vec();
        for _ in 0..BODY_LEN / LINE + 1 {
            response.extend(std::iter::repeat_n(b'y', LINE));
            response.extend_from_slice(b"\r\n");
        }
        response.extend_from_slice(b"tail\r\n");
        response
    });
    let network = MockNetwork::new(&[RESPONSE.as_slice()]);
    let log = network.log.clone();
    let mut client = Client::new(network);

    assert!(client.connect("example.com", 80));
    assert_eq!(client.get(&Request::new("/")), Ok(200));

    let body = client.read_body();
    assert_eq!(body.len(), BODY_LEN / LINE * LINE);
    assert!(body.bytes().all(|byte| byte == b'y'));
    assert!(!client.connected());
    assert_eq!(log.borrow().closes, 1);
}

#[test]
fn test_headers_and_body() {
    let network = MockNetwork::new(&[b"HTTP/1.1 200 OK\r\n\
        Content-Type: application/json\r\n\
        X-Request-Id:abc\r\n\
        X-Request-Id: def\r\n\
        \r\n\
        {\"keyId\":\"k\",\r\n\
        \"secret\":\"s\"}\r\n"]);
    let mut client = Client::new(network);

    assert!(client.connect("example.com", 80));
    assert_eq!(client.post(&Request::new("/auth")), Ok(200));

    let headers = client.read_headers();
    assert_eq!(headers.len(), 2);
    assert_eq!(header(&headers, "Content-Type").unwrap(), "application/json");
    assert_eq!(header(&headers, "X-Request-Id").unwrap(), "def");

    assert_eq!(
        client.read_body().as_str(),
        r#"{"keyId":"k","secret":"s"}"#
    );
    assert!(!client.connected());
}

#[test]
fn test_read_body_skips_unread_headers() {
    let network = MockNetwork::new(&[b"HTTP/1.1 200 OK\r\nServer: mock\r\n\r\n2024-01-01T00:00:00Z\r\n"]);
    let mut client = Client::new(network);

    assert!(client.connect("example.com", 80));
    assert_eq!(client.get(&Request::new("/utc/now")), Ok(200));
    assert_eq!(client.read_body().as_str(), "2024-01-01T00:00:00Z");
}

#[test]
fn test_request_reads_whole_response() {
    let network = MockNetwork::new(&[b"HTTP/1.0 404 Not Found\r\nContent-Length: 9\r\n\r\nnot found"]);
    let mut client = Client::new(network);

    assert!(client.connect("example.com", 80));
    let response = client.request(Method::Get, &Request::new("/missing")).unwrap();
    assert_eq!(response.status_code, 404);
    assert_eq!(header(&response.headers, "Content-Length").unwrap(), "9");
    assert_eq!(response.body.as_str(), "not found");
}

#[test]
fn test_malformed_status_degrades_to_zero() {
    let network = MockNetwork::new(&[b"<html>oops</html>\r\n", b""]);
    let mut client = Client::new(network);

    assert!(client.connect("example.com", 80));
    assert_eq!(client.get(&Request::new("/")), Ok(0));

    assert!(client.connect("example.com", 80));
    assert_eq!(client.get(&Request::new("/")), Ok(0));
}

#[test]
fn test_refused_connection() {
    let network = MockNetwork::refusing();
    let log = network.log.clone();
    let mut client = Client::new(network);

    assert!(!client.connect("example.com", 80));
    assert!(!client.connected());
    assert_eq!(client.get(&Request::new("/")), Err(Error::NotOpen));
    assert_eq!(log.borrow().remotes, ["example.com:80"]);
}

#[test]
fn test_close_and_drop_release_connection() {
    let network = MockNetwork::new(&[b"HTTP/1.1 200 OK\r\n\r\n", b"HTTP/1.1 200 OK\r\n\r\n"]);
    let log = network.log.clone();
    let mut client = Client::new(network);

    assert!(client.connect("example.com", 80));
    client.close();
    assert!(!client.connected());
    assert_eq!(log.borrow().closes, 1);

    assert!(client.connect("example.com", 80));
    drop(client);
    assert_eq!(log.borrow().closes, 2);
}

#[test]
fn test_reconnect_closes_previous_connection() {
    let network = MockNetwork::new(&[b"", b""]);
    let log = network.log.clone();
    let mut client = Client::new(network);

    assert!(client.connect("one.example", 80));
    assert!(client.connect("two.example", 80));
    assert_eq!(log.borrow().closes, 1);
    assert_eq!(log.borrow().remotes, ["one.example:80", "two.example:80"]);
}
