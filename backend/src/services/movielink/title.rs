//! Movie title handling for the movielink route

use std::borrow::Cow;

/// Pull the movie title out of a `/movielink/...` request URI
///
/// The title is whatever follows the last `/`, cut at the last `?`. Only that
/// segment is percent-decoded, so an encoded `/` or `?` stays in the title.
pub fn title_from_request_uri(path_and_query: &str) -> String {
    let after_slash = match path_and_query.rfind('/') {
        Some(idx) => &path_and_query[idx + 1..],
        None => path_and_query,
    };

    let segment = match after_slash.rfind('?') {
        Some(idx) => &after_slash[..idx],
        None => after_slash,
    };

    urlencoding::decode(segment)
        .unwrap_or(Cow::Borrowed(segment))
        .into_owned()
}

/// URL slug for a title: lowercase words joined by single dashes
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}
