use super::*;
use crate::network::error::Error;

#[test]
fn encode_passes_unreserved_bytes() {
    assert_eq!(encode::<32>("AZaz09-_.~").unwrap().as_str(), "AZaz09-_.~");
}

#[test]
fn encode_escapes_everything_else() {
    assert_eq!(encode::<16>("a b").unwrap().as_str(), "a%20b");
    assert_eq!(encode::<16>("a&b=c").unwrap().as_str(), "a%26b%3Dc");
    assert_eq!(encode::<32>("%<>{}").unwrap().as_str(), "%25%3C%3E%7B%7D");
    assert_eq!(encode::<16>("é").unwrap().as_str(), "%C3%A9");
    assert_eq!(encode::<16>("\x01\x7f").unwrap().as_str(), "%01%7F");
    assert_eq!(encode::<16>("").unwrap().as_str(), "");
}

#[test]
fn encode_reports_overflow() {
    assert_eq!(encode::<4>("a b"), Err(Error::BufferOverflow));
}

#[test]
fn status_code_reads_fixed_offset() {
    assert_eq!(status_code("HTTP/1.1 200 OK"), 200);
    assert_eq!(status_code("HTTP/1.0 404 Not Found"), 404);
    assert_eq!(status_code("HTTP/1.1 204"), 204);
}

#[test]
fn status_code_rejects_unusable_lines() {
    assert_eq!(status_code(""), 0);
    assert_eq!(status_code("HTTP/1.1 20"), 0);
    assert_eq!(status_code("HTTP/1.1 abc OK"), 0);
    assert_eq!(status_code("SIP/2.0  200 OK"), 0);
}

#[test]
fn request_parameters_join_and_encode() {
    let mut request = Request::new("/rest/v1/provision/application/user");
    request
        .set_parameter("username", "a@b.c")
        .unwrap()
        .set_parameter("password", "p w")
        .unwrap();
    assert!(request.has_parameters());
    assert_eq!(
        request.parameters::<64>().unwrap().as_str(),
        "username=a%40b.c&password=p%20w"
    );
}

#[test]
fn request_last_write_wins() {
    let mut request = Request::new("/");
    request
        .set_header("Date", "one")
        .unwrap()
        .set_header("Accept", "*/*")
        .unwrap()
        .set_header("Date", "two")
        .unwrap();

    let headers: heapless::Vec<(&str, &str), 4> = request
        .headers()
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    assert_eq!(headers.as_slice(), [("Date", "two"), ("Accept", "*/*")]);
}

#[test]
fn request_rejects_oversized_values() {
    let mut request = Request::new("/");
    let long = [b'v'; super::request::VALUE_LEN + 1];
    let long = core::str::from_utf8(&long).unwrap();
    assert!(matches!(
        request.set_header("X", long),
        Err(Error::BufferOverflow)
    ));
    assert!(request.headers().is_empty());
}

#[test]
fn request_body_defaults_empty() {
    let mut request = Request::new("/rest/v1/event");
    assert_eq!(request.body(), "");
    request.set_body("{}");
    assert_eq!(request.body(), "{}");
    assert_eq!(request.uri(), "/rest/v1/event");
    assert!(!request.has_parameters());
}
