//! URL construction for listing and detail pages
//!
//! Listing pages live at `{base}/{route}/{page}`; detail pages at
//! `{base}{path}` where `path` is the link found on a listing page.

use crate::{UrlError, UrlResult};
use url::Url;

/// Parses and checks a base location
///
/// Only HTTP and HTTPS schemes are accepted. HTTP stays allowed so that
/// crawls can target local mock servers.
///
/// # Examples
///
/// ```
/// use term_harvest::url::parse_base_url;
///
/// assert!(parse_base_url("https://www.opcionempleo.cl").is_ok());
/// assert!(parse_base_url("ftp://example.com").is_err());
/// ```
pub fn parse_base_url(base: &str) -> UrlResult<Url> {
    let url = parse(base)?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    Ok(url)
}

/// Builds the URL of a listing page
///
/// # Examples
///
/// ```
/// use term_harvest::url::listing_url;
///
/// let url = listing_url("https://www.opcionempleo.cl", "topqueries", 3).unwrap();
/// assert_eq!(url.as_str(), "https://www.opcionempleo.cl/topqueries/3");
/// ```
pub fn listing_url(base: &str, route: &str, page: u32) -> UrlResult<Url> {
    parse(&format!(
        "{}/{}/{}",
        base.trim_end_matches('/'),
        route.trim_matches('/'),
        page
    ))
}

/// Builds the URL of a query's detail page
///
/// The path is appended to the base verbatim. A path that is already an
/// absolute URL is used as-is, and a path without a leading slash gets one.
///
/// # Examples
///
/// ```
/// use term_harvest::url::query_url;
///
/// let url = query_url("https://www.opcionempleo.cl", "/empleo-nurse.html").unwrap();
/// assert_eq!(url.as_str(), "https://www.opcionempleo.cl/empleo-nurse.html");
/// ```
pub fn query_url(base: &str, path: &str) -> UrlResult<Url> {
    let path = path.trim();

    if let Ok(absolute) = Url::parse(path) {
        if absolute.has_host() {
            return Ok(absolute);
        }
    }

    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        parse(&format!("{}{}", base, path))
    } else {
        parse(&format!("{}/{}", base, path))
    }
}

fn parse(raw: &str) -> UrlResult<Url> {
    Url::parse(raw).map_err(|e| UrlError::Parse {
        url: raw.to_string(),
        message: e.to_string(),
    })
}
