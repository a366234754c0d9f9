use exthost_fs::NormalizedPath;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_normalized_path_has_no_backslashes(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        prop_assert!(!path.as_str().contains('\\'));
    }

    #[test]
    fn test_normalization_is_idempotent(s in "\\PC*") {
        let once = NormalizedPath::new(&s);
        let twice = NormalizedPath::new(once.as_str());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_separator_style_does_not_change_key(parts in prop::collection::vec("[a-z]{1,8}", 1..5)) {
        let unix = NormalizedPath::new(parts.join("/"));
        let windows = NormalizedPath::new(parts.join("\\"));
        prop_assert_eq!(unix, windows);
    }
}
