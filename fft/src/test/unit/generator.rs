use fftgen_codegen::Renderer;
use fftgen_codegen::opencl::OpenClRenderer;
use test_case::test_case;

use super::pvc;
use crate::algorithm::{KernelConfiguration, KernelFamily, configure};
use crate::config::GeneratorConfig;
use crate::configuration::{Configuration, Direction, TransformKind, UserModule};
use crate::error::Error;
use crate::generator::mixed_radix::Butterfly;
use crate::generator::{GenerateOptions, f2fft, sbfft};
use crate::precision::Precision;

fn policy(family: KernelFamily) -> GeneratorConfig {
    GeneratorConfig::builder().force_family(family).build()
}

fn options() -> GenerateOptions {
    GenerateOptions { butterfly: Butterfly::Basic, simplify: true, name: None }
}

fn render(cfg: &Configuration, family: KernelFamily) -> (KernelConfiguration, String) {
    let config = configure(cfg, &pvc(), &policy(family)).unwrap();
    let program = crate::build::generate_program(&config, &policy(family)).unwrap();
    let code = OpenClRenderer::new().render(&program).unwrap().source;
    (config, code)
}

fn direction(kind: TransformKind) -> Direction {
    match kind {
        TransformKind::C2r => Direction::Backward,
        _ => Direction::Forward,
    }
}

// =============================================================================
// Small-batch
// =============================================================================

#[test_case(16, TransformKind::C2c, Precision::F32 ; "c2c_f32")]
#[test_case(16, TransformKind::C2c, Precision::F64 ; "c2c_f64")]
#[test_case(16, TransformKind::R2c, Precision::F32 ; "r2c_half")]
#[test_case(15, TransformKind::R2c, Precision::F32 ; "r2c_double")]
#[test_case(16, TransformKind::C2r, Precision::F64 ; "c2r_half")]
#[test_case(15, TransformKind::C2r, Precision::F64 ; "c2r_double")]
fn test_small_batch_kernel(n: usize, kind: TransformKind, precision: Precision) {
    let cfg = Configuration::new_1d(3, n, 5, precision, direction(kind), kind);
    let (config, code) = render(&cfg, KernelFamily::SmallBatch);

    assert!(code.contains(&format!("void {}(", config.identifier())), "Missing kernel name:\n{code}");
    assert!(code.contains("reqd_work_group_size("), "Missing work-group attribute:\n{code}");
    assert!(code.contains("intel_reqd_sub_group_size("), "Missing sub-group attribute:\n{code}");
    assert!(code.contains("barrier(CLK_LOCAL_MEM_FENCE)"), "Missing barrier:\n{code}");
    assert!(code.contains("ulong K"), "Missing batch argument:\n{code}");
    assert!(!code.contains("twiddle"), "Small-batch kernels take no twiddle table:\n{code}");
    match precision {
        Precision::F32 => assert!(code.contains("float2"), "Missing float2:\n{code}"),
        Precision::F64 => assert!(code.contains("double2"), "Missing double2:\n{code}"),
    }
}

#[test]
fn test_small_batch_name_override() {
    let cfg = Configuration::new_1d(1, 8, 4, Precision::F32, Direction::Forward, TransformKind::C2c);
    let KernelConfiguration::SmallBatch(sb) = configure(&cfg, &pvc(), &GeneratorConfig::default()).unwrap() else {
        panic!("expected a small-batch configuration");
    };
    let options = GenerateOptions { name: Some("my_fft".into()), ..options() };
    let program = sbfft::generate(&sb, &options).unwrap();
    let code = OpenClRenderer::new().render(&program).unwrap().source;
    assert!(code.contains("void my_fft("), "Missing overridden name:\n{code}");
}

#[test]
fn test_small_batch_callbacks() {
    let module = UserModule {
        source: String::new(),
        load_function: Some("my_load".into()),
        store_function: Some("my_store".into()),
    };
    let cfg = Configuration::new_1d(1, 8, 4, Precision::F32, Direction::Forward, TransformKind::C2c)
        .with_callbacks(module);
    let (_, code) = render(&cfg, KernelFamily::SmallBatch);
    assert!(code.contains("my_load("), "Missing load callback:\n{code}");
    assert!(code.contains("my_store("), "Missing store callback:\n{code}");
    assert!(code.contains("user_data"), "Missing user data argument:\n{code}");
}

#[test]
fn test_butterflies_differ() {
    // Radix-3 stages have conjugate twiddle pairs; radix-2 stages have none.
    let cfg = Configuration::new_1d(1, 27, 4, Precision::F32, Direction::Forward, TransformKind::C2c);
    let KernelConfiguration::SmallBatch(sb) = configure(&cfg, &pvc(), &GeneratorConfig::default()).unwrap() else {
        panic!("expected a small-batch configuration");
    };
    let render = |butterfly| {
        let program = sbfft::generate(&sb, &GenerateOptions { butterfly, ..options() }).unwrap();
        OpenClRenderer::new().render(&program).unwrap().source
    };
    let basic = render(Butterfly::Basic);
    let pair = render(Butterfly::PairOptimized);
    assert_ne!(basic, pair);
    assert!(pair.contains(" p1 = ") && pair.contains(" p2 = "), "Missing pair products:\n{pair}");
    assert!(!basic.contains(" p1 = "), "Unexpected pair products:\n{basic}");
}

// =============================================================================
// Two-factor
// =============================================================================

#[test_case(64, TransformKind::C2c, Precision::F32 ; "c2c_f32")]
#[test_case(64, TransformKind::C2c, Precision::F64 ; "c2c_f64")]
#[test_case(64, TransformKind::R2c, Precision::F32 ; "r2c_half")]
#[test_case(45, TransformKind::R2c, Precision::F32 ; "r2c_double")]
#[test_case(64, TransformKind::C2r, Precision::F64 ; "c2r_half")]
#[test_case(45, TransformKind::C2r, Precision::F64 ; "c2r_double")]
fn test_factor2_kernel(n: usize, kind: TransformKind, precision: Precision) {
    let cfg = Configuration::new_1d(1, n, 6, precision, direction(kind), kind);
    let (config, code) = render(&cfg, KernelFamily::Factor2Slm);

    assert_eq!(config.family(), KernelFamily::Factor2Slm);
    assert!(code.contains(&format!("void {}(", config.identifier())), "Missing kernel name:\n{code}");
    assert!(code.contains("reqd_work_group_size("), "Missing work-group attribute:\n{code}");
    assert!(code.contains("barrier(CLK_LOCAL_MEM_FENCE)"), "Missing barrier:\n{code}");
    assert!(code.contains("twiddle"), "Missing twiddle argument:\n{code}");
    assert!(code.contains("local "), "Missing shared local memory:\n{code}");
}

#[test]
fn test_factor2_single_factor_rejected() {
    let cfg = Configuration::new_1d(1, 64, 6, Precision::F32, Direction::Forward, TransformKind::C2c);
    let KernelConfiguration::Factor2Slm(mut f2) = configure(&cfg, &pvc(), &policy(KernelFamily::Factor2Slm)).unwrap()
    else {
        panic!("expected a two-factor configuration");
    };
    f2.factorization = vec![64];
    let err = f2fft::generate(&f2, &options()).unwrap_err();
    assert!(matches!(err, Error::FactorizationTooShort { n: 64, .. }), "{err}");
}

#[test]
fn test_factor2_callbacks() {
    let module =
        UserModule { source: String::new(), load_function: Some("my_load".into()), store_function: None };
    let cfg = Configuration::new_1d(1, 64, 6, Precision::F32, Direction::Forward, TransformKind::C2c)
        .with_callbacks(module);
    let (_, code) = render(&cfg, KernelFamily::Factor2Slm);
    assert!(code.contains("my_load("), "Missing load callback:\n{code}");
    assert!(code.contains("user_data"), "Missing user data argument:\n{code}");
}
