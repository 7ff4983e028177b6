use crate::algorithm::plan_stages;
use crate::configuration::{Configuration, Direction, TransformKind, UserModule};
use crate::descriptor::parse_fft_descriptor;
use crate::error::Error;
use crate::precision::Precision;

#[test]
fn test_one_dimensional_is_unchanged() {
    let cfg = parse_fft_descriptor("scfi3.16*5").unwrap();
    let stages = plan_stages(&cfg).unwrap();
    assert_eq!(stages.len(), 1);
    assert_eq!(stages[0], cfg);
}

#[test]
fn test_c2c_two_dimensional() {
    let cfg = parse_fft_descriptor("scfi8x4*2").unwrap();
    let stages = plan_stages(&cfg).unwrap();
    assert_eq!(stages.len(), 2);
    assert_eq!(stages[0].tensor_shape(), &[1, 8, 8]);
    assert_eq!(&stages[0].istride[..3], &[1, 1, 8]);
    assert_eq!(stages[1].tensor_shape(), &[8, 4, 2]);
    assert_eq!(&stages[1].istride[..3], &[1, 8, 32]);
    assert!(stages.iter().all(|s| s.dim == 1 && s.kind == TransformKind::C2c));
}

#[test]
fn test_r2c_three_dimensional() {
    let cfg = parse_fft_descriptor("srfi6x4x2").unwrap();
    let stages = plan_stages(&cfg).unwrap();
    let kinds: Vec<_> = stages.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, [TransformKind::R2c, TransformKind::C2c, TransformKind::C2c]);
    assert_eq!(stages[0].tensor_shape(), &[1, 6, 8]);
    assert_eq!(&stages[0].istride[..3], &[1, 1, 8]);
    assert_eq!(&stages[0].ostride[..3], &[1, 1, 4]);
    assert_eq!(stages[1].tensor_shape(), &[4, 4, 2]);
    assert_eq!(stages[2].tensor_shape(), &[16, 2, 1]);
}

#[test]
fn test_c2r_runs_in_reverse() {
    let cfg = parse_fft_descriptor("drbi8x4").unwrap();
    let stages = plan_stages(&cfg).unwrap();
    assert_eq!(stages[0].kind, TransformKind::C2c);
    assert_eq!(stages[0].tensor_shape(), &[5, 4, 1]);
    assert_eq!(stages[1].kind, TransformKind::C2r);
    assert_eq!(stages[1].tensor_shape(), &[1, 8, 4]);
    assert_eq!(&stages[1].istride[..3], &[1, 1, 5]);
    assert_eq!(&stages[1].ostride[..3], &[1, 1, 10]);
}

#[test]
fn test_rejects_callbacks_and_dimensions() {
    let module = UserModule { source: String::new(), load_function: Some("load".into()), store_function: None };
    let cfg = parse_fft_descriptor("scfi8x8").unwrap().with_callbacks(module);
    assert!(matches!(plan_stages(&cfg), Err(Error::CallbacksUnsupported { dim: 2 })));

    let mut cfg = Configuration::new_1d(1, 8, 1, Precision::F32, Direction::Forward, TransformKind::C2c);
    cfg.dim = 0;
    assert!(matches!(plan_stages(&cfg), Err(Error::UnsupportedDimension { dim: 0 })));
}
