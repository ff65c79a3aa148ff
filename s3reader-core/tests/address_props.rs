//! Property tests for address normalization and parsing.

use proptest::prelude::*;
use s3reader_core::{Address, classify, extract_object_info, normalize};

fn segment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.-]{1,12}"
}

fn separator() -> impl Strategy<Value = String> {
    "/{1,3}"
}

proptest! {
    #[test]
    fn normalize_is_idempotent(raw in "[a-z0-9:/._-]{0,40}") {
        let once = normalize(&raw);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn duplicate_slashes_do_not_change_classification(
        parts in prop::collection::vec((segment(), separator()), 1..6),
        scheme in prop::sample::select(vec!["", "s3://", "https://", "http://"]),
    ) {
        let messy: String = parts.iter().map(|(s, sep)| format!("{s}{sep}")).collect();
        let clean = parts.iter().map(|(s, _)| s.as_str()).collect::<Vec<_>>().join("/");

        let messy = format!("{scheme}{messy}");
        let clean = format!("{scheme}{clean}");

        prop_assert_eq!(classify(&normalize(&messy)), classify(&messy));
        prop_assert_eq!(normalize(&messy), normalize(&clean));
    }

    #[test]
    fn object_info_keeps_key_slashes(
        bucket in "[a-z0-9-]{3,20}",
        key_parts in prop::collection::vec("[a-zA-Z0-9_-]{1,10}", 1..6),
    ) {
        let key = key_parts.join("/");
        let address = format!("s3://{bucket}/{key}");

        let (parsed_bucket, parsed_key) = extract_object_info(&address).unwrap();
        prop_assert_eq!(&parsed_bucket, &bucket);
        prop_assert_eq!(&parsed_key, &key);

        prop_assert_eq!(classify(&address).unwrap(), Address::ObjectStore { bucket, key });
    }
}

#[test]
fn test_address_serializes_with_kind_tag() {
    let address = classify("s3://my-bucket/data/file.csv").unwrap();
    let json = serde_json::to_value(&address).unwrap();
    assert_eq!(json["kind"], "object_store");
    assert_eq!(json["bucket"], "my-bucket");
    assert_eq!(json["key"], "data/file.csv");

    let json = serde_json::to_value(Address::None).unwrap();
    assert_eq!(json["kind"], "none");
}
