use std::borrow::Cow;

use crate::seed::{Seed, SeedError};

/// Query parameter carrying the session seed.
pub const SEED_PARAM: &str = "seed";

/// Where the session seed came from.
#[derive(Debug, Clone, PartialEq)]
pub enum SeedOrigin {
    /// Read from the URL.
    Url,
    /// No seed in the URL; a fresh one was generated.
    Generated,
    /// The URL carried an unusable seed, which was replaced.
    Recovered(SeedError),
}

/// The resolved session seed and the URL that now carries it.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedSession {
    pub seed: Seed,
    pub url: String,
    pub origin: SeedOrigin,
}

impl SeedSession {
    /// Text a user copies to share this world.
    pub fn share_text(&self) -> String {
        self.seed.canonical_text()
    }

    /// True when the URL had to be rewritten.
    pub fn url_changed(&self) -> bool {
        !matches!(self.origin, SeedOrigin::Url)
    }
}

/// Establishes the session seed from the page URL.
///
/// A valid `?seed=` value is used as-is. A missing or malformed one is
/// replaced with a fresh random seed written back into the URL so the page
/// can be reloaded into the same world.
pub struct SeedManager;

impl SeedManager {
    /// Read the seed from `url`, generating and persisting one if needed.
    pub fn get_or_create(url: &str) -> SeedSession {
        match query_param(url, SEED_PARAM).as_deref().map(Seed::parse) {
            Some(Ok(seed)) => {
                tracing::info!(%seed, "current seed");
                SeedSession {
                    seed,
                    url: url.to_string(),
                    origin: SeedOrigin::Url,
                }
            }
            Some(Err(err)) => {
                tracing::warn!(%err, "unusable seed in url, generating a fresh one");
                Self::fresh(url, SeedOrigin::Recovered(err))
            }
            None => Self::fresh(url, SeedOrigin::Generated),
        }
    }

    /// Replace whatever seed the URL holds with a fresh one.
    pub fn randomize(url: &str) -> SeedSession {
        Self::fresh(url, SeedOrigin::Generated)
    }

    fn fresh(url: &str, origin: SeedOrigin) -> SeedSession {
        let seed = Seed::random();
        tracing::info!(%seed, "current seed");
        SeedSession {
            seed,
            url: set_query_param(url, SEED_PARAM, &seed.canonical_text()),
            origin,
        }
    }
}

/// Split `url` into (before query, query, fragment-with-hash).
fn split_url(url: &str) -> (&str, Option<&str>, &str) {
    let (rest, fragment) = match url.find('#') {
        Some(i) => (&url[..i], &url[i..]),
        None => (url, ""),
    };
    match rest.find('?') {
        Some(i) => (&rest[..i], Some(&rest[i + 1..]), fragment),
        None => (rest, None, fragment),
    }
}

/// Value of the first `key=value` pair in the URL query, if any, with
/// `%XX` escapes and `+` decoded.
pub fn query_param<'a>(url: &'a str, key: &str) -> Option<Cow<'a, str>> {
    let (_, query, _) = split_url(url);
    query?
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| decode_component(v))
}

/// Form-style decoding of one query value. Malformed escapes pass through
/// unchanged.
fn decode_component(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['%', '+']) {
        return Cow::Borrowed(raw);
    }
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' => {
                let escaped = raw
                    .get(i + 1..i + 3)
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok());
                match escaped {
                    Some(byte) => {
                        out.push(byte);
                        i += 2;
                    }
                    None => out.push(b'%'),
                }
            }
            b => out.push(b),
        }
        i += 1;
    }
    Cow::Owned(String::from_utf8_lossy(&out).into_owned())
}

/// Set `key=value` in the URL query, replacing existing occurrences and
/// keeping other parameters and the fragment intact.
pub fn set_query_param(url: &str, key: &str, value: &str) -> String {
    let (base, query, fragment) = split_url(url);
    let mut pairs: Vec<String> = query
        .unwrap_or("")
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| pair.split('=').next() != Some(key))
        .map(str::to_string)
        .collect();
    pairs.push(format!("{key}={value}"));
    format!("{base}?{}{fragment}", pairs.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_seed_from_url() {
        let session = SeedManager::get_or_create("https://garden.test/?seed=0.5");
        assert_eq!(session.seed.value(), 0.5);
        assert_eq!(session.origin, SeedOrigin::Url);
        assert!(!session.url_changed());
        assert_eq!(session.url, "https://garden.test/?seed=0.5");
    }

    #[test]
    fn missing_seed_is_generated_and_persisted() {
        let session = SeedManager::get_or_create("https://garden.test/#debug");
        assert_eq!(session.origin, SeedOrigin::Generated);
        let written = query_param(&session.url, SEED_PARAM).unwrap();
        assert_eq!(Seed::parse(&written).unwrap(), session.seed);
        assert!(session.url.ends_with("#debug"));
    }

    #[test]
    fn malformed_seed_falls_back_to_fresh() {
        let session = SeedManager::get_or_create("https://garden.test/?seed=banana&x=1");
        assert!(matches!(
            session.origin,
            SeedOrigin::Recovered(SeedError::NotANumber(_))
        ));
        assert_eq!(query_param(&session.url, "x").as_deref(), Some("1"));
        assert_ne!(query_param(&session.url, SEED_PARAM).as_deref(), Some("banana"));
    }

    #[test]
    fn empty_seed_param_falls_back() {
        let session = SeedManager::get_or_create("https://garden.test/?seed=");
        assert_eq!(session.origin, SeedOrigin::Recovered(SeedError::Empty));
    }

    #[test]
    fn randomize_rewrites_existing_seed() {
        let session = SeedManager::randomize("https://garden.test/?seed=0.5");
        let params: Vec<&str> = session.url.matches("seed=").collect();
        assert_eq!(params.len(), 1);
        assert_eq!(session.share_text(), session.seed.canonical_text());
    }

    #[test]
    fn query_param_lookup() {
        let url = "http://h/p?a=1&seed=0.25&b#frag";
        assert_eq!(query_param(url, "a").as_deref(), Some("1"));
        assert_eq!(query_param(url, "seed").as_deref(), Some("0.25"));
        assert_eq!(query_param(url, "b").as_deref(), Some(""));
        assert_eq!(query_param(url, "frag"), None);
        assert_eq!(query_param("http://h/p", "a"), None);
    }

    #[test]
    fn encoded_seed_is_decoded_before_parsing() {
        let session = SeedManager::get_or_create("https://garden.test/?seed=0%2E5");
        assert_eq!(session.seed.value(), 0.5);
        assert_eq!(session.origin, SeedOrigin::Url);
        assert_eq!(session.url, "https://garden.test/?seed=0%2E5");

        let padded = SeedManager::get_or_create("https://garden.test/?seed=+0.25");
        assert_eq!(padded.seed.value(), 0.25);
        assert_eq!(padded.origin, SeedOrigin::Url);
    }

    #[test]
    fn query_values_are_decoded() {
        assert_eq!(query_param("http://h/?q=a%20b+c", "q").as_deref(), Some("a b c"));
        assert_eq!(query_param("http://h/?q=100%", "q").as_deref(), Some("100%"));
        assert_eq!(query_param("http://h/?q=%zz1", "q").as_deref(), Some("%zz1"));
        assert!(matches!(query_param("http://h/?q=plain", "q"), Some(Cow::Borrowed("plain"))));
    }

    #[test]
    fn set_query_param_replaces_and_appends() {
        assert_eq!(set_query_param("http://h/", "seed", "0.1"), "http://h/?seed=0.1");
        assert_eq!(
            set_query_param("http://h/?seed=0.2&a=1#x", "seed", "0.1"),
            "http://h/?a=1&seed=0.1#x"
        );
    }
}
