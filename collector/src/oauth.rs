use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha1::Sha1;

/// RFC 3986 unreserved characters stay as-is; everything else is encoded.
const OAUTH_ENCODE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

pub const CONSUMER_KEY_VAR: &str = "TWITTER_CONSUMER_API_KEY";
pub const CONSUMER_SECRET_VAR: &str = "TWITTER_CONSUMER_API_SECRET";
pub const ACCESS_KEY_VAR: &str = "TWITTER_CONSUMER_ACCESS_KEY";
pub const ACCESS_SECRET_VAR: &str = "TWITTER_CONSUMER_ACCESS_SECRET";

#[derive(Clone)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").field("consumer_key", &self.consumer_key).finish_non_exhaustive()
    }
}

impl Credentials {
    /// All four values are required.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self> {
        let get = |name: &str| lookup(name).with_context(|| format!("missing environment variable {name}"));
        Ok(Self {
            consumer_key: get(CONSUMER_KEY_VAR)?,
            consumer_secret: get(CONSUMER_SECRET_VAR)?,
            access_token: get(ACCESS_KEY_VAR)?,
            access_secret: get(ACCESS_SECRET_VAR)?,
        })
    }
}

pub fn encode(s: &str) -> String {
    utf8_percent_encode(s, OAUTH_ENCODE).to_string()
}

/// HMAC-SHA1 signature over the request. `params` holds both the request's
/// own parameters and the `oauth_*` protocol parameters.
pub fn signature(method: &str, base_url: &str, params: &[(String, String)], consumer_secret: &str, token_secret: &str) -> Result<String> {
    let mut encoded: Vec<(String, String)> = params.iter().map(|(k, v)| (encode(k), encode(v))).collect();
    encoded.sort();
    let param_string = encoded.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join("&");
    let base = format!("{}&{}&{}", method.to_uppercase(), encode(base_url), encode(&param_string));
    let key = format!("{}&{}", encode(consumer_secret), encode(token_secret));

    let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes()).map_err(|e| anyhow!("hmac key: {e}"))?;
    mac.update(base.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Build the `Authorization` header value for one request.
pub fn authorization_header(
    creds: &Credentials,
    method: &str,
    base_url: &str,
    query: &[(String, String)],
    nonce: &str,
    timestamp: u64,
) -> Result<String> {
    let mut oauth: Vec<(String, String)> = vec![
        ("oauth_consumer_key".into(), creds.consumer_key.clone()),
        ("oauth_nonce".into(), nonce.to_string()),
        ("oauth_signature_method".into(), "HMAC-SHA1".into()),
        ("oauth_timestamp".into(), timestamp.to_string()),
        ("oauth_token".into(), creds.access_token.clone()),
        ("oauth_version".into(), "1.0".into()),
    ];
    let mut all = oauth.clone();
    all.extend_from_slice(query);
    let sig = signature(method, base_url, &all, &creds.consumer_secret, &creds.access_secret)?;
    oauth.push(("oauth_signature".into(), sig));
    oauth.sort();
    let fields = oauth
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!("OAuth {fields}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_credentials() -> Credentials {
        Credentials {
            consumer_key: "xvz1evFS4wEEPTGEFPHBog".into(),
            consumer_secret: "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw".into(),
            access_token: "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb".into(),
            access_secret: "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE".into(),
        }
    }

    #[test]
    fn matches_published_signing_example() {
        let creds = reference_credentials();
        let request = vec![
            ("include_entities".to_string(), "true".to_string()),
            ("status".to_string(), "Hello Ladies + Gentlemen, a signed OAuth request!".to_string()),
        ];
        let header = authorization_header(
            &creds,
            "post",
            "https://api.twitter.com/1.1/statuses/update.json",
            &request,
            "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg",
            1318622958,
        )
        .unwrap();
        assert!(header.starts_with("OAuth oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\", oauth_nonce="));
        assert!(header.contains("oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\""));
    }

    #[test]
    fn encodes_reserved_characters() {
        assert_eq!(encode("#vaksin OR -filter:retweets"), "%23vaksin%20OR%20-filter%3Aretweets");
        assert_eq!(encode("a.b_c~d"), "a.b_c~d");
    }

    #[test]
    fn missing_variable_is_named() {
        let err = Credentials::from_lookup(|name| (name != ACCESS_SECRET_VAR).then(|| "x".to_string())).unwrap_err();
        assert!(err.to_string().contains(ACCESS_SECRET_VAR));
    }
}
