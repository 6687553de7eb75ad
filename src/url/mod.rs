//! URL handling for the catalogue hierarchy
//!
//! Every catalogue page lives at the base URL followed by one path segment per
//! hierarchy level: `base/manufacturer/category/model[/subsection]`.

use crate::{UrlError, UrlResult};
use url::Url;

/// Parses the configured catalogue root
///
/// Only HTTP(S) URLs that can carry path segments are accepted.
pub fn parse_base_url(base: &str) -> Result<Url, crate::CatalogueError> {
    let url = Url::parse(base)?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()).into());
    }

    if url.cannot_be_a_base() {
        return Err(UrlError::CannotBeABase(base.to_string()).into());
    }

    Ok(url)
}

/// Builds the URL of a catalogue page below `base`
///
/// Segments are labels scraped from the previous level, so they are
/// percent-encoded rather than interpreted: a `/` inside a label stays part of
/// that label. A trailing slash on the base is absorbed.
///
/// # Examples
///
/// ```
/// use catalogue_harvester::url::catalogue_url;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/catalogue/").unwrap();
/// let url = catalogue_url(&base, &["Volvo", "Wheel Loader"]).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/catalogue/Volvo/Wheel%20Loader");
/// ```
pub fn catalogue_url(base: &Url, segments: &[&str]) -> UrlResult<Url> {
    let mut url = base.clone();

    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| UrlError::CannotBeABase(base.to_string()))?;
        path.pop_if_empty();

        for segment in segments {
            if segment.is_empty() {
                return Err(UrlError::EmptySegment(base.to_string()));
            }
            path.push(segment);
        }
    }

    Ok(url)
}
