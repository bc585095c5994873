use super::*;

const SECRET: &[u8] = b"secret";
const KNOWN_SIGNATURE: &str = "sha1=38e005ef7dd3faee13204505532011257023654e";

#[test]
fn test_known_vector() {
    assert_eq!(
        compute_sha1_signature(SECRET, b"somepayload").unwrap(),
        KNOWN_SIGNATURE
    );
    assert_eq!(
        verify_hmac_sha1(b"somepayload", Some(KNOWN_SIGNATURE), SECRET),
        Ok(())
    );
}

#[test]
fn test_matches_independent_hmac() {
    let body = br#"{"ref":"refs/heads/master"}"#;
    let mut mac = HmacSha1::new_from_slice(b"another-secret").unwrap();
    mac.update(body);
    let header = format!("sha1={}", hex::encode(mac.finalize().into_bytes()));

    assert_eq!(
        compute_sha1_signature(b"another-secret", body).unwrap(),
        header
    );
    assert!(verify_hmac_sha1(body, Some(&header), b"another-secret").is_ok());
}

#[test]
fn test_wrong_secret_is_a_mismatch() {
    let err = verify_hmac_sha1(b"somepayload", Some(KNOWN_SIGNATURE), b"wrong").unwrap_err();

    assert_eq!(err, SignatureError::Mismatch);
    assert!(!err.is_malformed());
}

#[test]
fn test_modified_body_is_a_mismatch() {
    assert_eq!(
        verify_hmac_sha1(b"somepayload ", Some(KNOWN_SIGNATURE), SECRET),
        Err(SignatureError::Mismatch)
    );
}

#[test]
fn test_truncated_digest_is_a_mismatch() {
    let truncated = &KNOWN_SIGNATURE[..KNOWN_SIGNATURE.len() - 2];

    assert_eq!(
        verify_hmac_sha1(b"somepayload", Some(truncated), SECRET),
        Err(SignatureError::Mismatch)
    );
}

#[test]
fn test_malformed_headers() {
    let cases = [
        (None, SignatureError::Missing),
        (Some("foo"), SignatureError::MissingPrefix),
        (Some(""), SignatureError::MissingPrefix),
        (
            Some("sha256=38e005ef7dd3faee13204505532011257023654e"),
            SignatureError::MissingPrefix,
        ),
    ];

    for (header, expected) in cases {
        let err = verify_hmac_sha1(b"somepayload", header, SECRET).unwrap_err();
        assert_eq!(err, expected, "header {:?}", header);
        assert!(err.is_malformed());
    }
}

#[test]
fn test_non_hex_digest_is_malformed() {
    let err = verify_hmac_sha1(b"somepayload", Some("sha1=zzzz"), SECRET).unwrap_err();

    assert!(matches!(err, SignatureError::InvalidHex { .. }));
    assert!(err.is_malformed());
}

#[test]
fn test_verification_from_result() {
    assert_eq!(Verification::from(Ok(())), Verification::Verified);
    assert_eq!(
        Verification::from(Err(SignatureError::Mismatch)),
        Verification::Rejected(SignatureError::Mismatch)
    );
    assert_eq!(Verification::NotRequired.to_string(), "not_required");
}
