//! Key comparison and ordered merging of key lists
//!
//! Keys coming from the ordering document are resolved against the album
//! path and therefore start with a separator, while keys from a bucket
//! listing never do. Every comparison here goes through [`normalize_key`] so
//! the two spellings match.

use crate::defaults::KEY_SEPARATOR;

/// Strip a single leading separator from a key
pub fn normalize_key(key: &str) -> &str {
    key.strip_prefix(KEY_SEPARATOR).unwrap_or(key)
}

/// Find the entry of `corpus` that names the same object as `key`
pub fn find_path<'a, S: AsRef<str>>(corpus: &'a [S], key: &str) -> Option<&'a S> {
    let wanted = normalize_key(key);
    corpus
        .iter()
        .find(|candidate| normalize_key(candidate.as_ref()) == wanted)
}

/// Check whether `corpus` contains `key`, ignoring a leading separator on
/// either side.
///
/// Albums hold tens to low hundreds of images, so a linear scan is fine.
pub fn contains_path<S: AsRef<str>>(corpus: &[S], key: &str) -> bool {
    find_path(corpus, key).is_some()
}

/// Merge a preferred ordering into an authoritative key list.
///
/// Entries of `preferred` that exist in `authoritative` come first, in
/// `preferred` order. Every remaining entry of `authoritative` follows in its
/// original order. Preferred entries that do not exist are dropped, and no
/// key appears twice.
///
/// Output entries always use the spelling found in `authoritative`, so the
/// result is a reordering of a subset of that list.
///
/// # Examples
///
/// ```
/// use album_order::path::merge_list;
///
/// let keys = vec!["a.jpg".to_string(), "b.jpg".to_string(), "c.jpg".to_string()];
/// let merged = merge_list(&keys, &["/c.jpg", "missing.jpg"]);
/// assert_eq!(merged, vec!["c.jpg", "a.jpg", "b.jpg"]);
/// ```
pub fn merge_list<S: AsRef<str>>(authoritative: &[String], preferred: &[S]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(authoritative.len());

    for wanted in preferred {
        if let Some(found) = find_path(authoritative, wanted.as_ref()) {
            if !contains_path(&merged, found) {
                merged.push(found.clone());
            }
        }
    }

    for key in authoritative {
        if !contains_path(&merged, key) {
            merged.push(key.clone());
        }
    }

    merged
}
