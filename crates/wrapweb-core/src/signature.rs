//! `X-Hub-Signature` computation and verification (HMAC-SHA1 over the raw body).

use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

pub const SIGNATURE_PREFIX: &str = "sha1=";

fn mac_for(secret: &[u8], body: &[u8]) -> HmacSha1 {
    let mut mac = HmacSha1::new_from_slice(secret).expect("HMAC accepts keys of any length");
    mac.update(body);
    mac
}

/// Signature header value GitHub would send for `body` under `secret`.
pub fn sign(secret: &[u8], body: &[u8]) -> String {
    let digest = mac_for(secret, body).finalize().into_bytes();
    format!("{SIGNATURE_PREFIX}{}", hex::encode(digest))
}

/// Check a sender-supplied `sha1=<hex>` header against `body`.
///
/// The digest comparison is constant time. A missing header, a wrong prefix
/// or malformed hex all count as a mismatch.
pub fn verify(secret: &[u8], body: &[u8], header: Option<&str>) -> bool {
    let Some(sig_hex) = header.and_then(|h| h.strip_prefix(SIGNATURE_PREFIX)) else {
        return false;
    };
    let Ok(sig_bytes) = hex::decode(sig_hex) else {
        return false;
    };
    mac_for(secret, body).verify_slice(&sig_bytes).is_ok()
}
