use crate::algorithm::KernelFamily;
use crate::config::{DEFAULT_WORK_GROUP_SIZE_CAP, GeneratorConfig};
use crate::generator::mixed_radix::Butterfly;

#[test]
fn test_builder_defaults_match_default() {
    let built = GeneratorConfig::builder().build();
    assert_eq!(built, GeneratorConfig::default());
    assert_eq!(built.max_work_group_size_cap, DEFAULT_WORK_GROUP_SIZE_CAP);
    assert!(built.simplify);
}

#[test]
fn test_butterfly_per_family() {
    let policy = GeneratorConfig::default();
    assert_eq!(policy.butterfly_for(KernelFamily::SmallBatch), Butterfly::Basic);
    assert_eq!(policy.butterfly_for(KernelFamily::Factor2Slm), Butterfly::PairOptimized);

    let forced = GeneratorConfig::builder().butterfly(Butterfly::PairOptimized).build();
    assert_eq!(forced.butterfly_for(KernelFamily::SmallBatch), Butterfly::PairOptimized);
}

#[test]
fn test_family_and_butterfly_names() {
    assert_eq!("sbfft".parse::<KernelFamily>().unwrap(), KernelFamily::SmallBatch);
    assert_eq!("f2fft".parse::<KernelFamily>().unwrap(), KernelFamily::Factor2Slm);
    assert_eq!("pair".parse::<Butterfly>().unwrap(), Butterfly::PairOptimized);
    assert!("radix".parse::<Butterfly>().is_err());
}
