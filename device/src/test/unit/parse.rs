use crate::Cursor;

#[test]
fn test_numbers_and_separators() {
    let mut c = Cursor::new("12x34*5");
    assert_eq!(c.number().unwrap(), 12);
    assert!(c.eat('x'));
    assert_eq!(c.number().unwrap(), 34);
    assert!(!c.eat('.'));
    c.expect('*').unwrap();
    assert_eq!(c.number().unwrap(), 5);
    assert!(c.is_at_end());
}

#[test]
fn test_blanks_are_significant_by_default() {
    let mut c = Cursor::new(" 1");
    assert_eq!(c.number().unwrap_err().position, Some(0));
    let mut c = Cursor::skipping_blanks(" \t1");
    assert_eq!(c.number().unwrap(), 1);
}

#[test]
fn test_word() {
    let mut c = Cursor::skipping_blanks("  gpu}");
    assert_eq!(c.word(), "gpu");
    assert_eq!(c.bump(), Some('}'));
    assert_eq!(c.bump(), None);
}

#[test]
fn test_error_without_position() {
    let c = Cursor::new("abc");
    let err = c.error_without_position("too long");
    assert_eq!(err.to_string(), "==> abc is malformed: too long");
}

#[test]
fn test_number_out_of_range() {
    let mut c = Cursor::new("99999999999999999999999");
    assert_eq!(c.number().unwrap_err().message, "number out of range");
}
