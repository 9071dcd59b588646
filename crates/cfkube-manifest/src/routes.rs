//! Route strings as written in manifests: `host.domain[/path]`.

use crate::error::{ManifestError, Result};
use crate::route_words::{ADJECTIVES, NOUNS};
use cfkube_storage::RouteRecord;
use rand::Rng;
use rand::seq::SliceRandom;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteParts {
    pub host: String,
    pub domain: String,
    /// Empty, or starting with `/`.
    pub path: String,
}

impl RouteParts {
    pub fn canonical_key(&self) -> String {
        canonical_key(&self.host, &self.domain, &self.path)
    }
}

/// Splits a route string. The host is everything before the first `.`, the
/// domain runs up to the first following `/`, the rest is the path.
pub fn split_route(route: &str) -> Result<RouteParts> {
    let (host, domain_and_path) = route.split_once('.').ok_or_else(|| {
        ManifestError::unprocessable_entity(format!(
            "Route {route:?} must be of the form host.domain[/path]"
        ))
    })?;
    let (domain, path) = match domain_and_path.split_once('/') {
        Some((domain, path)) => (domain, clean_path(path)),
        None => (domain_and_path, String::new()),
    };
    Ok(RouteParts {
        host: host.to_string(),
        domain: domain.to_string(),
        path,
    })
}

/// Drops empty segments and trailing slashes: `/x//y/` becomes `/x/y`, and
/// `/` becomes the empty path.
pub fn clean_path(path: &str) -> String {
    path.split('/')
        .filter(|s| !s.is_empty())
        .fold(String::new(), |mut cleaned, segment| {
            cleaned.push('/');
            cleaned.push_str(segment);
            cleaned
        })
}

/// Join key between desired and observed routes. Empty path segments and
/// trailing slashes do not change the key.
pub fn canonical_key(host: &str, domain: &str, path: &str) -> String {
    format!("{host}.{domain}{}", clean_path(path))
}

pub fn route_record_key(route: &RouteRecord) -> String {
    canonical_key(&route.host, &route.domain.name, &route.path)
}

/// `<adjective>-<noun>-<two lowercase letters>`
pub fn random_host_suffix<R: Rng + ?Sized>(rng: &mut R) -> String {
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("brave");
    let noun = NOUNS.choose(rng).copied().unwrap_or("wombat");
    let suffix: String = (0..2)
        .map(|_| char::from(b'a' + rng.gen_range(0..26u8)))
        .collect();
    format!("{adjective}-{noun}-{suffix}")
}
