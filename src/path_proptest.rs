//! Property-based tests for key comparison and merging.
//!
//! These tests use proptest to generate random key lists and verify that the
//! merge invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::path::{contains_path, merge_list, normalize_key};
    use proptest::collection::vec;
    use proptest::prelude::*;
    use std::collections::HashSet;

    /// Bucket listings: distinct, never starting with a separator.
    fn listing() -> impl Strategy<Value = Vec<String>> {
        proptest::collection::hash_set("[a-z]{1,6}(/[a-z]{1,6})?\\.jpg", 0..20)
            .prop_map(|set| set.into_iter().collect())
    }

    /// Preferred keys, some of which may carry a leading separator.
    fn preferences() -> impl Strategy<Value = Vec<String>> {
        vec("/?[a-z]{1,6}(/[a-z]{1,6})?\\.jpg", 0..10)
    }

    // ============================================================================
    // merge_list property tests
    // ============================================================================

    proptest! {
        /// Property: merging with no preference returns the listing unchanged
        #[test]
        fn merge_without_preference_is_identity(authoritative in listing()) {
            let empty: Vec<String> = Vec::new();
            prop_assert_eq!(merge_list(&authoritative, &empty), authoritative);
        }

        /// Property: the output has no duplicates and only contains listed keys
        #[test]
        fn merge_is_duplicate_free_subset(
            authoritative in listing(),
            preferred in preferences(),
        ) {
            let merged = merge_list(&authoritative, &preferred);

            let unique: HashSet<&str> = merged.iter().map(|k| normalize_key(k)).collect();
            prop_assert_eq!(unique.len(), merged.len(), "duplicates in {:?}", merged);

            for key in &merged {
                prop_assert!(
                    authoritative.contains(key),
                    "merged key '{}' is not in the listing",
                    key
                );
            }
        }

        /// Property: distinct listings are permuted, never shrunk
        #[test]
        fn merge_keeps_every_listed_key(
            authoritative in listing(),
            preferred in preferences(),
        ) {
            let merged = merge_list(&authoritative, &preferred);
            prop_assert_eq!(merged.len(), authoritative.len());
        }

        /// Property: preferred keys precede every key that was not preferred
        #[test]
        fn merge_puts_preferred_keys_first(
            authoritative in listing(),
            picks in vec(any::<prop::sample::Index>(), 0..5),
        ) {
            prop_assume!(!authoritative.is_empty());
            let preferred: Vec<String> = picks
                .iter()
                .map(|idx| format!("/{}", idx.get(&authoritative)))
                .collect();

            let merged = merge_list(&authoritative, &preferred);
            let is_preferred = |key: &str| contains_path(&preferred, key);

            let first_plain = merged.iter().position(|k| !is_preferred(k));
            let last_preferred = merged.iter().rposition(|k| is_preferred(k));
            if let (Some(plain), Some(pref)) = (first_plain, last_preferred) {
                prop_assert!(pref < plain, "preferred key after plain key in {:?}", merged);
            }
        }

        /// Property: keys that were not preferred keep their listing order
        #[test]
        fn merge_preserves_order_of_remaining_keys(
            authoritative in listing(),
            preferred in preferences(),
        ) {
            let merged = merge_list(&authoritative, &preferred);
            let remaining_in_merge: Vec<&String> = merged
                .iter()
                .filter(|k| !contains_path(&preferred, k))
                .collect();
            let remaining_in_listing: Vec<&String> = authoritative
                .iter()
                .filter(|k| !contains_path(&preferred, k))
                .collect();
            prop_assert_eq!(remaining_in_merge, remaining_in_listing);
        }
    }

    // ============================================================================
    // contains_path property tests
    // ============================================================================

    proptest! {
        /// Property: a single leading separator on either side is ignored
        #[test]
        fn contains_path_ignores_leading_separator(key in "[a-z]{1,8}(/[a-z]{1,8})?") {
            let plain = vec![key.clone()];
            let rooted = vec![format!("/{}", key)];
            let rooted_key = format!("/{}", key);

            prop_assert!(contains_path(&plain, &key));
            prop_assert!(contains_path(&plain, &rooted_key));
            prop_assert!(contains_path(&rooted, &key));
            prop_assert!(contains_path(&rooted, &rooted_key));
        }

        /// Property: contains_path agrees with membership after normalization
        #[test]
        fn contains_path_matches_normalized_membership(
            corpus in listing(),
            key in "/?[a-z]{1,6}\\.jpg",
        ) {
            let expected = corpus.iter().any(|k| normalize_key(k) == normalize_key(&key));
            prop_assert_eq!(contains_path(&corpus, &key), expected);
        }
    }
}
