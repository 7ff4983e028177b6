use test_case::test_case;

use crate::factor::{factor, trial_division};

#[test_case(1, &[] ; "one")]
#[test_case(2, &[2] ; "prime")]
#[test_case(60, &[2, 2, 3, 5] ; "composite")]
#[test_case(128, &[2, 2, 2, 2, 2, 2, 2] ; "power of two")]
#[test_case(27, &[3, 3, 3] ; "power of three")]
fn test_trial_division(n: usize, expected: &[usize]) {
    assert_eq!(trial_division(n).as_slice(), expected);
}

#[test_case(16, 2, &[4, 4] ; "square")]
#[test_case(12, 2, &[3, 4] ; "near square")]
#[test_case(7, 2, &[1, 7] ; "prime padded with one")]
#[test_case(64, 3, &[4, 4, 4] ; "cube")]
#[test_case(5, 1, &[5] ; "single factor")]
fn test_factor(n: usize, count: usize, expected: &[usize]) {
    assert_eq!(factor(n, count), expected);
}

#[test]
fn test_factor_edge_cases() {
    assert!(factor(10, 0).is_empty());
    assert_eq!(factor(0, 3), vec![0, 0, 0]);
}
