#[cfg(test)]
use super::*;

#[test]
fn test_plain_keys() {
    let segments = parse_path("server.host");
    assert_eq!(segments, vec![Segment::Key("server"), Segment::Key("host")]);
}

#[test]
fn test_index_forms() {
    assert_eq!(Segment::parse("3"), Segment::Index { raw: "3", index: 3 });
    assert_eq!(Segment::parse("3:"), Segment::Index { raw: "3:", index: 3 });
    assert_eq!(Segment::parse(":3"), Segment::Index { raw: ":3", index: 3 });
    assert_eq!(Segment::parse("3:").raw(), "3:");
    assert_eq!(Segment::parse("12").index(), Some(12));
}

#[test]
fn test_sequence_inception() {
    let segment = Segment::parse(":1:");
    assert!(segment.is_inception());
    assert_eq!(segment.index(), Some(1));
    assert_eq!(segment.raw(), ":1:");
}

#[test]
fn test_non_numeric_tokens_are_keys() {
    assert_eq!(Segment::parse("-1"), Segment::Key("-1"));
    assert_eq!(Segment::parse("+2"), Segment::Key("+2"));
    assert_eq!(Segment::parse(":x:"), Segment::Key(":x:"));
    assert_eq!(Segment::parse("v1"), Segment::Key("v1"));
    assert_eq!(Segment::parse("99999999999999999999999999"), Segment::Key("99999999999999999999999999"));
}

#[test]
fn test_empty_segments_are_kept() {
    assert_eq!(parse_path("a..b"), vec![Segment::Key("a"), Segment::Key(""), Segment::Key("b")]);
    assert_eq!(parse_path(""), vec![Segment::Key("")]);
}

#[test]
fn test_parse_is_pure() {
    let first = parse_path("list.:0:.name");
    let second = parse_path("list.:0:.name");
    assert_eq!(first, second);
    assert_eq!(first[1], Segment::Inception { raw: ":0:", index: 0 });
}

#[test]
fn test_trim_set_path() {
    assert_eq!(trim_set_path("ports.2:"), "ports.2");
    assert_eq!(trim_set_path("ports.:1:"), "ports.:1");
    assert_eq!(trim_set_path("a.b"), "a.b");
}
