//! AWS Signature Version 4

use std::fmt::Write;

use crate::providers::common::{hmac_sha256, sha256_hex};
use crate::utils::log_sanitizer::truncate_for_log;

use super::AwsCredentials;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Region/service pair a signature is scoped to.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SigningScope<'a> {
    pub region: &'a str,
    pub service: &'a str,
}

impl AwsCredentials {
    /// Build the `Authorization` header value for a request.
    /// Reference: <https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html>
    ///
    /// `headers` must contain every header that is sent and signed
    /// (at least `host` and `x-amz-date`); `amz_date` is `YYYYMMDD'T'HHMMSS'Z'`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn sign(
        &self,
        scope: SigningScope<'_>,
        method: &str,
        path: &str,
        query: &[(&str, &str)],
        headers: &[(String, String)],
        payload: &str,
        amz_date: &str,
    ) -> String {
        // 1. Canonical query: encoded pairs sorted by key, then value
        let canonical_query = canonical_query_string(query);

        // 2. Canonical headers: lowercase names, trimmed values, sorted
        let mut sorted_headers: Vec<(String, &str)> = headers
            .iter()
            .map(|(k, v)| (k.to_lowercase(), v.trim()))
            .collect();
        sorted_headers.sort_by(|a, b| a.0.cmp(&b.0));

        let canonical_headers = sorted_headers
            .iter()
            .fold(String::new(), |mut acc, (k, v)| {
                let _ = writeln!(acc, "{k}:{v}");
                acc
            });

        let signed_headers = sorted_headers
            .iter()
            .map(|(k, _)| k.as_str())
            .collect::<Vec<_>>()
            .join(";");

        // 3. Canonical request
        let canonical_path = if path.is_empty() { "/" } else { path };
        let hashed_payload = sha256_hex(payload.as_bytes());
        let canonical_request = format!(
            "{method}\n{canonical_path}\n{canonical_query}\n{canonical_headers}\n{signed_headers}\n{hashed_payload}"
        );

        log::debug!("CanonicalRequest:\n{}", truncate_for_log(&canonical_request));

        // 4. String to sign
        let date = amz_date.get(..8).unwrap_or(amz_date);
        let credential_scope = format!(
            "{date}/{}/{}/aws4_request",
            scope.region, scope.service
        );
        let string_to_sign = format!(
            "{ALGORITHM}\n{amz_date}\n{credential_scope}\n{}",
            sha256_hex(canonical_request.as_bytes())
        );

        log::debug!("StringToSign:\n{string_to_sign}");

        // 5. Derived signing key and signature
        let signing_key = signing_key(&self.secret_access_key, date, scope);
        let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes()));

        format!(
            "{ALGORITHM} Credential={}/{credential_scope}, SignedHeaders={signed_headers}, Signature={signature}",
            self.access_key_id
        )
    }
}

/// `kSigning = HMAC(HMAC(HMAC(HMAC("AWS4" + secret, date), region), service), "aws4_request")`
fn signing_key(secret: &str, date: &str, scope: SigningScope<'_>) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{secret}").as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, scope.region.as_bytes());
    let k_service = hmac_sha256(&k_region, scope.service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

/// RFC 3986 encoded, sorted `key=value` pairs joined by `&`.
pub(crate) fn canonical_query_string(query: &[(&str, &str)]) -> String {
    let mut pairs: Vec<(String, String)> = query
        .iter()
        .map(|(k, v)| {
            (
                urlencoding::encode(k).into_owned(),
                urlencoding::encode(v).into_owned(),
            )
        })
        .collect();
    pairs.sort();
    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_SECRET: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";

    fn credentials() -> AwsCredentials {
        AwsCredentials {
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: EXAMPLE_SECRET.to_string(),
            session_token: None,
        }
    }

    fn vanilla_headers() -> Vec<(String, String)> {
        vec![
            ("Host".to_string(), "example.amazonaws.com".to_string()),
            ("X-Amz-Date".to_string(), "20150830T123600Z".to_string()),
        ]
    }

    const TEST_SUITE_SCOPE: SigningScope<'static> = SigningScope {
        region: "us-east-1",
        service: "service",
    };

    // aws-sig-v4-test-suite: get-vanilla
    #[test]
    fn get_vanilla() {
        let auth = credentials().sign(
            TEST_SUITE_SCOPE,
            "GET",
            "/",
            &[],
            &vanilla_headers(),
            "",
            "20150830T123600Z",
        );
        assert_eq!(
            auth,
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, \
             SignedHeaders=host;x-amz-date, \
             Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
        );
    }

    // aws-sig-v4-test-suite: get-vanilla-query-order-key-case
    #[test]
    fn get_vanilla_query_order() {
        let auth = credentials().sign(
            TEST_SUITE_SCOPE,
            "GET",
            "/",
            &[("Param2", "value2"), ("Param1", "value1")],
            &vanilla_headers(),
            "",
            "20150830T123600Z",
        );
        assert!(
            auth.ends_with(
                "Signature=b97d918cfa904a5beff61c982a1b6f458b799221646efd99d3219ec94cdf2500"
            ),
            "unexpected signature: {auth}"
        );
    }

    #[test]
    fn route53_list_with_session_token() {
        let headers = vec![
            ("Host".to_string(), "route53.amazonaws.com".to_string()),
            ("X-Amz-Date".to_string(), "20240101T000000Z".to_string()),
            ("X-Amz-Security-Token".to_string(), "session-token".to_string()),
        ];
        let auth = credentials().sign(
            SigningScope {
                region: "us-east-1",
                service: "route53",
            },
            "GET",
            "/2013-04-01/hostedzone",
            &[("maxitems", "100"), ("marker", "Z2 /x")],
            &headers,
            "",
            "20240101T000000Z",
        );
        assert_eq!(
            auth,
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240101/us-east-1/route53/aws4_request, \
             SignedHeaders=host;x-amz-date;x-amz-security-token, \
             Signature=28eac31ff6fa5aee4f8a6f672827eb5483228de9d725e3969be45ceba33e7ebd"
        );
    }

    #[test]
    fn canonical_query_encodes_and_sorts() {
        assert_eq!(
            canonical_query_string(&[("maxitems", "100"), ("marker", "Z2 /x")]),
            "marker=Z2%20%2Fx&maxitems=100"
        );
        assert_eq!(canonical_query_string(&[]), "");
    }

    #[test]
    fn different_secret_changes_signature() {
        let other = AwsCredentials {
            secret_access_key: "another-secret".to_string(),
            ..credentials()
        };
        let a = credentials().sign(
            TEST_SUITE_SCOPE,
            "GET",
            "/",
            &[],
            &vanilla_headers(),
            "",
            "20150830T123600Z",
        );
        let b = other.sign(
            TEST_SUITE_SCOPE,
            "GET",
            "/",
            &[],
            &vanilla_headers(),
            "",
            "20150830T123600Z",
        );
        assert_ne!(a, b);
    }
}
