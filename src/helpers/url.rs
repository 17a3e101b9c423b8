//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left as-is in a path segment or query value
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Encode a single URL path segment or query value
pub fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT).to_string()
}

/// Route of a post page
///
/// # Examples
/// ```ignore
/// post_path("como-utilizar-hooks") // -> "/post/como-utilizar-hooks"
/// ```
pub fn post_path(uid: &str) -> String {
    format!("/post/{}", encode_segment(uid))
}

/// Whether a uid can be used as a directory name under the public dir
pub fn is_safe_uid(uid: &str) -> bool {
    !uid.is_empty()
        && uid != "."
        && uid != ".."
        && uid
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Route rendering a post page on demand
pub fn post_data_path(uid: &str) -> String {
    format!("/data/post/{}", encode_segment(uid))
}

/// Route returning the page a listing cursor points at
pub fn more_posts_path(cursor: &str) -> String {
    format!("/api/posts?cursor={}", encode_segment(cursor))
}
