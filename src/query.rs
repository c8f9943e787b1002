//! Search query construction.

use crate::country;
use crate::error::Result;
use crate::types::Country;

pub const SEARCH_BASE_URL: &str = "https://twitter.com/search?q=";

const RADIUS: &str = "500mi";
const SINCE: &str = "2018-12-31";
const UNTIL: &str = "2019-01-02";

/// Builds the encoded query string for an already resolved country.
pub fn build_for(country: &Country) -> String {
    let place = urlencoding::encode(&country.name);
    format!(
        "filter%3Aimages%20near%3A%22{}%22%20within%3A{}%20since%3A{}%20until%3A{}&src=typd&lang={}",
        place, RADIUS, SINCE, UNTIL, country.code
    )
}

/// Resolves `code` and builds its query, failing with `LookupError` for unknown codes.
pub fn build(code: &str) -> Result<String> {
    Ok(build_for(&country::resolve(code)?))
}

pub fn search_url(country: &Country) -> String {
    format!("{}{}", SEARCH_BASE_URL, build_for(country))
}
