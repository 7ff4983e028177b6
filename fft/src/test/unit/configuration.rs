use crate::configuration::{Configuration, Direction, TransformKind, UserModule, default_istride, default_ostride};
use crate::error::Error;
use crate::precision::Precision;

#[test]
fn test_default_strides_c2c() {
    let cfg = Configuration::new(2, &[3, 8, 4, 5], Precision::F32, Direction::Forward, TransformKind::C2c, true);
    assert_eq!(&cfg.istride[..4], &[1, 3, 24, 96]);
    assert_eq!(cfg.istride, cfg.ostride);
    assert!(cfg.is_inplace());
    assert_eq!(cfg.tensor_shape(), &[3, 8, 4, 5]);
    assert_eq!(cfg.fft_shape().as_slice(), &[8, 4]);
    assert_eq!((cfg.m(), cfg.n(), cfg.k()), (3, 8, 5));
}

#[test]
fn test_default_strides_real_inplace_pad() {
    let shape = [1, 5, 2, 1, 1];
    assert_eq!(&default_istride(1, &shape, TransformKind::R2c, true)[..3], &[1, 1, 6]);
    assert_eq!(&default_istride(1, &shape, TransformKind::R2c, false)[..3], &[1, 1, 5]);
    assert_eq!(&default_ostride(1, &shape, TransformKind::R2c, true)[..3], &[1, 1, 3]);
    assert_eq!(&default_istride(1, &shape, TransformKind::C2r, true)[..3], &[1, 1, 3]);
    assert_eq!(&default_ostride(1, &shape, TransformKind::C2r, true)[..3], &[1, 1, 6]);
}

#[test]
fn test_real_placement_detection() {
    let inplace = Configuration::new(1, &[1, 8, 2], Precision::F32, Direction::Forward, TransformKind::R2c, true);
    assert!(inplace.is_inplace());
    let out_of_place = Configuration::new(1, &[1, 8, 2], Precision::F32, Direction::Forward, TransformKind::R2c, false);
    assert!(!out_of_place.is_inplace());
}

#[test]
fn test_direction_mismatch() {
    let cfg = Configuration::new_1d(1, 8, 1, Precision::F32, Direction::Backward, TransformKind::R2c);
    assert!(matches!(cfg.check_direction(), Err(Error::DirectionMismatch { .. })));
    assert!(cfg.descriptor().is_err());
    let cfg = Configuration::new_1d(1, 8, 1, Precision::F32, Direction::Forward, TransformKind::C2r);
    assert!(matches!(cfg.check_direction(), Err(Error::DirectionMismatch { .. })));
}

#[test]
fn test_callbacks() {
    let cfg = Configuration::new_1d(1, 8, 1, Precision::F32, Direction::Forward, TransformKind::C2c);
    assert!(!cfg.has_callbacks());
    let empty = cfg.clone().with_callbacks(UserModule::default());
    assert!(!empty.has_callbacks());
    let module = UserModule { source: String::new(), load_function: Some("load".into()), store_function: None };
    assert!(cfg.with_callbacks(module).has_callbacks());
}
