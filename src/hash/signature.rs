use super::hmac::Hmac;
use super::sha1::DIGEST_LEN;
use base64ct::{Base64, Encoding};
use heapless::String;

/// Value of the `Signature-Version` header and last signed field.
pub const SIGNATURE_VERSION: &str = "1";

/// Length of a Base64-encoded HMAC-SHA1 signature.
pub const SIGNATURE_LEN: usize = (DIGEST_LEN + 2) / 3 * 4;

/// A Base64 request signature, as placed after `SIDECAR <keyId>:`.
pub type Signature = String<SIGNATURE_LEN>;

/// Signs a Sidecar request.
///
/// The string to sign is the method, URI path, date, content hash and
/// signature version joined by `\n`. It is MACed with `secret` and the
/// digest is Base64 encoded with padding. The server recomputes the same
/// value, so every field must match the bytes sent on the wire.
pub fn sign(
    secret: &str,
    method: &str,
    uri_path: &str,
    date: &str,
    content_md5: &str,
    signature_version: &str,
) -> Signature {
    let mut mac = Hmac::new(secret.as_bytes());
    let fields = [method, uri_path, date, content_md5, signature_version];
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            mac.update(b"\n");
        }
        mac.update(field.as_bytes());
    }
    let digest = mac.finalize();

    let mut buf = [0u8; SIGNATURE_LEN];
    Base64::encode(&digest, &mut buf)
        .ok()
        .and_then(|encoded| Signature::try_from(encoded).ok())
        .unwrap_or_default()
}
