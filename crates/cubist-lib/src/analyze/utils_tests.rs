use super::utils::{SUGGESTION_MAX_DISTANCE, edit_distance, find_similar, quoted_list, suggest};

#[test]
fn edit_distance_basics() {
    assert_eq!(edit_distance("", ""), 0);
    assert_eq!(edit_distance("ADSL", ""), 4);
    assert_eq!(edit_distance("", "ADSL"), 4);
    assert_eq!(edit_distance("ADSL", "ADSL"), 0);
    assert_eq!(edit_distance("ADLS", "ADSL"), 2);
    assert_eq!(edit_distance("kitten", "sitting"), 3);
}

#[test]
fn edit_distance_is_symmetric() {
    let pairs = [("AVAL", "AVALC"), ("USUBJID", "SUBJID"), ("Gaussian", "Gausian")];
    for (a, b) in pairs {
        assert_eq!(edit_distance(a, b), edit_distance(b, a));
    }
}

#[test]
fn suggestion_threshold_is_three() {
    assert_eq!(SUGGESTION_MAX_DISTANCE, 3);
    assert_eq!(suggest("ADXYZ", &["ADSL"]), None);
    assert_eq!(suggest("ADLS", &["ADSL", "ADAE"]), Some("ADSL"));
}

#[test]
fn find_similar_prefers_closest() {
    let candidates = ["ADAE", "ADSL", "ADLB"];
    assert_eq!(find_similar("ADSX", &candidates, 3), Some("ADSL"));
    assert_eq!(find_similar("ZZZZZZZZ", &candidates, 3), None);
}

#[test]
fn find_similar_skips_exact_name() {
    assert_eq!(find_similar("ADSL", &["ADSL"], 3), None);
}

#[test]
fn quoted_names() {
    insta::assert_snapshot!(quoted_list(&["ADSL", "ADAE"]), @"'ADSL', 'ADAE'");
}
