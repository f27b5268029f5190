//! AWS Signature Version 4 request signing
//!
//! The Product Advertising API authenticates every call with a SigV4
//! `Authorization` header computed over the method, path, the signed headers
//! and a hash of the payload.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use super::CatalogError;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const TERMINATOR: &str = "aws4_request";

/// Signs requests for one service in one region
#[derive(Clone)]
pub struct RequestSigner {
    access_key: String,
    secret_key: String,
    region: String,
    service: String,
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("access_key", &self.access_key)
            .field("region", &self.region)
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

impl RequestSigner {
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        region: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            region: region.into(),
            service: service.into(),
        }
    }

    /// Computes the `Authorization` header value
    ///
    /// `headers` must already be lowercase and sorted by name; all of them are
    /// signed.
    pub fn authorization(
        &self,
        method: &str,
        path: &str,
        headers: &[(&str, &str)],
        payload: &[u8],
        now: DateTime<Utc>,
    ) -> Result<String, CatalogError> {
        let amz_date = amz_date(now);
        let date = now.format("%Y%m%d").to_string();
        let scope = format!("{}/{}/{}/{}", date, self.region, self.service, TERMINATOR);

        let signed_headers = signed_headers(headers);
        let canonical = canonical_request(method, path, headers, &sha256_hex(payload));
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            amz_date,
            scope,
            sha256_hex(canonical.as_bytes())
        );

        let key = self.signing_key(&date)?;
        let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes())?);

        Ok(format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM, self.access_key, scope, signed_headers, signature
        ))
    }

    fn signing_key(&self, date: &str) -> Result<Vec<u8>, CatalogError> {
        let k_date = hmac_sha256(
            format!("AWS4{}", self.secret_key).as_bytes(),
            date.as_bytes(),
        )?;
        let k_region = hmac_sha256(&k_date, self.region.as_bytes())?;
        let k_service = hmac_sha256(&k_region, self.service.as_bytes())?;
        hmac_sha256(&k_service, TERMINATOR.as_bytes())
    }
}

/// Formats a timestamp the way `x-amz-date` expects
pub fn amz_date(now: DateTime<Utc>) -> String {
    now.format("%Y%m%dT%H%M%SZ").to_string()
}

fn signed_headers(headers: &[(&str, &str)]) -> String {
    headers
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(";")
}

fn canonical_request(
    method: &str,
    path: &str,
    headers: &[(&str, &str)],
    payload_hash: &str,
) -> String {
    let canonical_headers: String = headers
        .iter()
        .map(|(name, value)| format!("{}:{}\n", name, value.trim()))
        .collect();

    // The query string is always empty for these calls
    format!(
        "{}\n{}\n\n{}\n{}\n{}",
        method,
        path,
        canonical_headers,
        signed_headers(headers),
        payload_hash
    )
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, CatalogError> {
    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|e| CatalogError::Signing(e.to_string()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 15, 9, 30, 5).unwrap()
    }

    const HEADERS: [(&str, &str); 3] = [
        ("content-type", "application/json; charset=utf-8"),
        ("host", "webservices.amazon.co.jp"),
        ("x-amz-date", "20240715T093005Z"),
    ];

    #[test]
    fn test_sha256_of_empty_payload() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_hmac_sha256_rfc4231_case_2() {
        let mac = hmac_sha256(b"Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(
            hex::encode(mac),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_signing_key_derivation() {
        // Published AWS example for deriving a signing key
        let signer = RequestSigner::new(
            "AKIDEXAMPLE",
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            "us-east-1",
            "iam",
        );

        let key = signer.signing_key("20120215").unwrap();

        assert_eq!(
            hex::encode(key),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
    }

    #[test]
    fn test_amz_date_format() {
        assert_eq!(amz_date(fixed_time()), "20240715T093005Z");
    }

    #[test]
    fn test_canonical_request_layout() {
        let canonical = canonical_request("POST", "/paapi5/getitems", &HEADERS, "abc123");

        assert_eq!(
            canonical,
            "POST\n\
             /paapi5/getitems\n\
             \n\
             content-type:application/json; charset=utf-8\n\
             host:webservices.amazon.co.jp\n\
             x-amz-date:20240715T093005Z\n\
             \n\
             content-type;host;x-amz-date\n\
             abc123"
        );
    }

    #[test]
    fn test_authorization_header_shape() {
        let signer = RequestSigner::new(
            "AKIDEXAMPLE",
            "secret",
            "us-west-2",
            "ProductAdvertisingAPI",
        );

        let header = signer
            .authorization("POST", "/paapi5/getitems", &HEADERS, b"{}", fixed_time())
            .unwrap();

        assert!(header.starts_with(
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240715/us-west-2/ProductAdvertisingAPI/aws4_request, "
        ));
        assert!(header.contains("SignedHeaders=content-type;host;x-amz-date, "));

        let signature = header.rsplit("Signature=").next().unwrap();
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_signature_depends_on_secret_and_payload() {
        let a = RequestSigner::new("AK", "secret-a", "us-west-2", "ProductAdvertisingAPI");
        let b = RequestSigner::new("AK", "secret-b", "us-west-2", "ProductAdvertisingAPI");

        fn sign(s: &RequestSigner, body: &[u8]) -> String {
            s.authorization("POST", "/paapi5/getitems", &HEADERS, body, fixed_time())
                .unwrap()
        }

        assert_eq!(sign(&a, b"{}"), sign(&a, b"{}"));
        assert_ne!(sign(&a, b"{}"), sign(&b, b"{}"));
        assert_ne!(sign(&a, b"{}"), sign(&a, b"{\"ItemIds\":[]}"));
    }

    #[test]
    fn test_debug_hides_secret() {
        let signer = RequestSigner::new("AK", "top-secret", "us-east-1", "ProductAdvertisingAPI");
        assert!(!format!("{:?}", signer).contains("top-secret"));
    }
}
