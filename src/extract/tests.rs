use super::*;

#[test]
fn test_plain_text_pass_through() {
    let extractor = PlainTextExtractor;
    let text = extractor.extract("Experienced engineer.".as_bytes()).unwrap();
    assert_eq!(text, "Experienced engineer.");
}

#[test]
fn test_invalid_utf8_is_explicit_error() {
    let extractor = PlainTextExtractor;
    let err = extractor.extract(&[0xff, 0xfe, 0x00]).unwrap_err();
    assert!(matches!(err, ExtractError::InvalidEncoding { .. }));
}

#[test]
fn test_whitespace_only_is_no_text() {
    let extractor = PlainTextExtractor;
    let err = extractor.extract(b"   \n\t  ").unwrap_err();
    assert!(matches!(err, ExtractError::NoText));
}
