use fftgen_device::{DeviceInfo, DeviceType};
use test_case::test_case;

use super::pvc;
use crate::algorithm::{KernelConfiguration, KernelFamily, configure, select_family, validate};
use crate::config::GeneratorConfig;
use crate::configuration::{Configuration, Direction, TransformKind};
use crate::error::Error;
use crate::precision::Precision;

fn c2c(m: usize, n: usize, k: usize) -> Configuration {
    Configuration::new_1d(m, n, k, Precision::F32, Direction::Forward, TransformKind::C2c)
}

#[test_case(16, TransformKind::C2c, KernelFamily::SmallBatch ; "short fits registers")]
#[test_case(63, TransformKind::C2c, KernelFamily::SmallBatch ; "just below the register bound")]
#[test_case(64, TransformKind::C2c, KernelFamily::Factor2Slm ; "register bound reached")]
#[test_case(67, TransformKind::C2c, KernelFamily::SmallBatch ; "prime falls back")]
#[test_case(128, TransformKind::R2c, KernelFamily::Factor2Slm ; "long real")]
fn test_select_family(n: usize, kind: TransformKind, expected: KernelFamily) {
    let cfg = Configuration::new_1d(1, n, 1, Precision::F32, Direction::Forward, kind);
    assert_eq!(select_family(&cfg, &pvc(), &GeneratorConfig::default()), expected);
}

#[test]
fn test_double_precision_halves_the_bound() {
    let cfg = Configuration::new_1d(1, 32, 1, Precision::F64, Direction::Forward, TransformKind::C2c);
    assert_eq!(select_family(&cfg, &pvc(), &GeneratorConfig::default()), KernelFamily::Factor2Slm);
}

#[test]
fn test_force_family() {
    let policy = GeneratorConfig::builder().force_family(KernelFamily::Factor2Slm).build();
    assert_eq!(select_family(&c2c(1, 16, 1), &pvc(), &policy), KernelFamily::Factor2Slm);
    let config = configure(&c2c(1, 16, 1), &pvc(), &policy).unwrap();
    assert_eq!(config.family(), KernelFamily::Factor2Slm);
}

#[test]
fn test_small_batch_identifier() {
    let config = configure(&c2c(1, 16, 100), &pvc(), &GeneratorConfig::default()).unwrap();
    let KernelConfiguration::SmallBatch(sb) = &config else { panic!("expected small-batch, got {config:?}") };
    assert_eq!((sb.mb, sb.kb, sb.sgs), (1, 100, 32));
    assert_eq!(config.identifier(), "sbfft_m1_M1_Mb1_N16_Kb100_sgs32_f32_c2c_is1_1_16_os1_1_16_in0");
}

#[test]
fn test_small_batch_real_batch_block() {
    let cfg = Configuration::new_1d(3, 8, 5, Precision::F32, Direction::Forward, TransformKind::R2c);
    let config = configure(&cfg, &pvc(), &GeneratorConfig::default()).unwrap();
    assert_eq!(config.identifier(), "sbfft_m1_M3_Mb4_N8_Kb5_sgs16_f32_r2c_is1_3_30_os1_3_15_in0");
    assert!(!config.inplace_unsupported());
}

#[test]
fn test_real_inplace_unsupported_when_batch_block_is_partial() {
    let cfg = Configuration::new_1d(64, 8, 1, Precision::F32, Direction::Forward, TransformKind::R2c);
    let config = configure(&cfg, &pvc(), &GeneratorConfig::default()).unwrap();
    let KernelConfiguration::SmallBatch(sb) = &config else { panic!("expected small-batch, got {config:?}") };
    assert_eq!(sb.mb, 32);
    assert!(config.inplace_unsupported());
}

#[test]
fn test_work_group_cap() {
    let policy = GeneratorConfig::builder().max_work_group_size_cap(16).build();
    let config = configure(&c2c(1, 16, 100), &pvc(), &policy).unwrap();
    let KernelConfiguration::SmallBatch(sb) = &config else { panic!("expected small-batch, got {config:?}") };
    assert_eq!(sb.kb, 16);
}

#[test]
fn test_factor2_identifier() {
    let config = configure(&c2c(1, 64, 10), &pvc(), &GeneratorConfig::default()).unwrap();
    let KernelConfiguration::Factor2Slm(f2) = &config else { panic!("expected two-factor, got {config:?}") };
    assert_eq!(f2.factorization, vec![8, 8]);
    assert_eq!(f2.split(), Some((8, 8)));
    assert_eq!((f2.mb, f2.nb, f2.kb), (1, 8, 2));

    let three_stages = crate::algorithm::Factor2SlmConfiguration { factorization: vec![4, 4, 4], ..f2.clone() };
    assert_eq!(three_stages.split(), None);
    assert_eq!(config.identifier(), "f2fft_m1_M1_Mb1_N64_F8x8_Nb8_Kb2_sgs16_f32_c2c_is1_1_64_os1_1_64_eb0_in0");
}

#[test]
fn test_factor2_real_layout() {
    let cfg = Configuration::new_1d(1, 128, 1, Precision::F32, Direction::Forward, TransformKind::R2c);
    let config = configure(&cfg, &pvc(), &GeneratorConfig::default()).unwrap();
    let layout = config.layout();
    assert_eq!((layout.n_fft, layout.n_slm, layout.n_out), (64, 65, 65));
}

#[test]
fn test_insufficient_local_memory() {
    let tiny = DeviceInfo::new(256, [16], 64, DeviceType::Gpu);
    let err = configure(&c2c(1, 16, 1), &tiny, &GeneratorConfig::default()).unwrap_err();
    assert!(matches!(err, Error::InsufficientLocalMemory { required: 128, available: 64 }), "{err}");
}

#[test]
fn test_forced_factor2_on_prime_fails() {
    let policy = GeneratorConfig::builder().force_family(KernelFamily::Factor2Slm).build();
    let err = configure(&c2c(1, 67, 1), &pvc(), &policy).unwrap_err();
    assert!(matches!(err, Error::FactorizationTooShort { n: 67, .. }), "{err}");
}

#[test]
fn test_validate() {
    assert!(validate(&c2c(1, 8, 1)).is_ok());
    assert!(matches!(validate(&c2c(1, 8, 0)), Err(Error::InvalidShape { .. })));
    let mismatch = Configuration::new_1d(1, 8, 1, Precision::F32, Direction::Backward, TransformKind::R2c);
    assert!(matches!(validate(&mismatch), Err(Error::DirectionMismatch { .. })));
}
