use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use enumset::EnumSet;
use fftgen_codegen::RenderedProgram;
use fftgen_device::{Compiler, MemoryCache};
use fftgen_ir::Extension;
use parking_lot::Mutex;

use super::pvc;
use crate::algorithm::{KernelFamily, configure};
use crate::build::{
    build_kernel, build_plan, check_extensions, check_placement, clear_sources, get_or_generate, source_count,
};
use crate::config::GeneratorConfig;
use crate::configuration::{Configuration, Direction, TransformKind, UserModule};
use crate::error::Error;
use crate::launch::KernelArg;
use crate::precision::Precision;

/// Serializes tests that observe the process-wide source cache.
static SOURCE_CACHE: Mutex<()> = Mutex::new(());

/// Compiler that returns the source as its module and counts invocations.
#[derive(Default)]
struct CountingCompiler {
    calls: AtomicUsize,
}

impl Compiler for CountingCompiler {
    type Module = String;

    fn device_id(&self) -> u64 {
        7
    }

    fn compile(&self, program: &RenderedProgram) -> fftgen_device::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(program.source.clone())
    }
}

struct FailingCompiler;

impl Compiler for FailingCompiler {
    type Module = ();

    fn device_id(&self) -> u64 {
        0
    }

    fn compile(&self, program: &RenderedProgram) -> fftgen_device::Result<()> {
        fftgen_device::error::CompilationSnafu {
            identifier: program.kernels.first().cloned().unwrap_or_default(),
            reason: "rejected",
        }
        .fail()
    }
}

fn c2c(n: usize, k: usize) -> Configuration {
    Configuration::new_1d(1, n, k, Precision::F32, Direction::Forward, TransformKind::C2c)
}

#[test]
fn test_module_cache_hit() {
    let _lock = SOURCE_CACHE.lock();
    let compiler = CountingCompiler::default();
    let cache = MemoryCache::new();
    let policy = GeneratorConfig::default();
    let cfg = c2c(16, 8);

    let first = build_kernel(&cfg, &pvc(), &compiler, &cache, &policy).unwrap();
    let second = build_kernel(&cfg, &pvc(), &compiler, &cache, &policy).unwrap();

    assert_eq!(compiler.calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.len(), 1);
    assert_eq!(first.module, second.module);
    assert!(first.module.contains(&first.kernel.identifier), "Missing kernel:\n{}", first.module);
    assert_eq!(first.launch.args.as_slice(), &[KernelArg::In, KernelArg::Out, KernelArg::K]);
}

#[test]
fn test_distinct_kernels_compile_separately() {
    let _lock = SOURCE_CACHE.lock();
    let compiler = CountingCompiler::default();
    let cache = MemoryCache::new();
    let policy = GeneratorConfig::default();

    build_kernel(&c2c(16, 8), &pvc(), &compiler, &cache, &policy).unwrap();
    build_kernel(&c2c(32, 8), &pvc(), &compiler, &cache, &policy).unwrap();

    assert_eq!(compiler.calls.load(Ordering::SeqCst), 2);
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_callback_source_is_prepended() {
    let _lock = SOURCE_CACHE.lock();
    let module = UserModule {
        source: "float2 my_load(global float2* in, size_t offset, global void* user_data) { return in[offset]; }"
            .into(),
        load_function: Some("my_load".into()),
        store_function: None,
    };
    let cfg = c2c(16, 4).with_callbacks(module);
    let compiler = CountingCompiler::default();
    let cache = MemoryCache::new();

    let built = build_kernel(&cfg, &pvc(), &compiler, &cache, &GeneratorConfig::default()).unwrap();
    assert!(built.module.starts_with("float2 my_load("), "Callback source not prepended:\n{}", built.module);
    assert_eq!(built.launch.args.last(), Some(&KernelArg::UserData));
}

#[test]
fn test_callbacks_with_same_names_compile_separately() {
    let _lock = SOURCE_CACHE.lock();
    let module = |scale: &str| UserModule {
        source: format!(
            "float2 my_load(global float2* in, size_t offset, global void* user_data) {{ return {scale} * in[offset]; }}"
        ),
        load_function: Some("my_load".into()),
        store_function: None,
    };
    let compiler = CountingCompiler::default();
    let cache = MemoryCache::new();
    let policy = GeneratorConfig::default();

    let one = build_kernel(&c2c(16, 4).with_callbacks(module("1.0f")), &pvc(), &compiler, &cache, &policy).unwrap();
    let two = build_kernel(&c2c(16, 4).with_callbacks(module("2.0f")), &pvc(), &compiler, &cache, &policy).unwrap();

    assert_eq!(one.kernel.identifier, two.kernel.identifier);
    assert_ne!(one.kernel.module_identifier(), two.kernel.module_identifier());
    assert_eq!(compiler.calls.load(Ordering::SeqCst), 2);
    assert_eq!(cache.len(), 2);
    assert!(one.module.contains("return 1.0f *"), "{}", one.module);
    assert!(two.module.contains("return 2.0f *"), "{}", two.module);
}

#[test]
fn test_policy_changes_compiled_module_key() {
    let _lock = SOURCE_CACHE.lock();
    let compiler = CountingCompiler::default();
    let cache = MemoryCache::new();
    let simplified = GeneratorConfig::default();
    let verbatim = GeneratorConfig::builder().simplify(false).build();

    let a = build_kernel(&c2c(16, 4), &pvc(), &compiler, &cache, &simplified).unwrap();
    let b = build_kernel(&c2c(16, 4), &pvc(), &compiler, &cache, &verbatim).unwrap();

    assert_eq!(a.kernel.identifier, b.kernel.identifier);
    let distinct = if a.kernel.rendered.source == b.kernel.rendered.source { 1 } else { 2 };
    assert_eq!(compiler.calls.load(Ordering::SeqCst), distinct);
    assert_eq!(cache.len(), distinct);
    assert_eq!(a.module, a.kernel.rendered.source);
    assert_eq!(b.module, b.kernel.rendered.source);
}

#[test]
fn test_compiler_failure_is_reported() {
    let _lock = SOURCE_CACHE.lock();
    let cache = MemoryCache::new();
    let err = build_kernel(&c2c(16, 4), &pvc(), &FailingCompiler, &cache, &GeneratorConfig::default()).unwrap_err();
    assert!(matches!(err, Error::Device { .. }), "{err}");
    assert!(cache.is_empty());
}

#[test]
fn test_multi_dimensional_stage_rejected() {
    let cfg = Configuration::new(2, &[1, 8, 8, 1], Precision::F32, Direction::Forward, TransformKind::C2c, true);
    let err = build_kernel(&cfg, &pvc(), &CountingCompiler::default(), &MemoryCache::new(), &GeneratorConfig::default())
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedDimension { dim: 2 }), "{err}");
}

#[test]
fn test_plan_builds_every_stage() {
    let _lock = SOURCE_CACHE.lock();
    let cfg = Configuration::new(2, &[1, 8, 16, 3], Precision::F32, Direction::Forward, TransformKind::C2c, true);
    let compiler = CountingCompiler::default();
    let cache = MemoryCache::new();

    let kernels = build_plan(&cfg, &pvc(), &compiler, &cache, &GeneratorConfig::default()).unwrap();
    assert_eq!(kernels.len(), 2);
    assert_ne!(kernels[0].kernel.identifier, kernels[1].kernel.identifier);
    assert_eq!(compiler.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_missing_extension() {
    let rendered = RenderedProgram {
        source: String::new(),
        kernels: vec!["k".into()],
        extensions: vec![Extension::ClIntelSubgroups],
    };
    let bare = pvc().with_extensions(EnumSet::empty());
    let err = check_extensions(&rendered, &bare).unwrap_err();
    assert!(matches!(err, Error::MissingExtension { extension: Extension::ClIntelSubgroups }), "{err}");

    let full = pvc().with_extensions(Extension::ClIntelSubgroups);
    check_extensions(&rendered, &full).unwrap();
}

#[test]
fn test_source_cache_shares_kernels() {
    let _lock = SOURCE_CACHE.lock();
    clear_sources();

    let policy = GeneratorConfig::default();
    let config = configure(&c2c(16, 4), &pvc(), &policy).unwrap();
    let a = get_or_generate(&config, &policy, None).unwrap();
    let b = get_or_generate(&config, &policy, None).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(source_count(), 1);

    let other = GeneratorConfig::builder().simplify(false).build();
    let c = get_or_generate(&config, &other, None).unwrap();
    assert!(!Arc::ptr_eq(&a, &c));
    assert_eq!(source_count(), 2);

    clear_sources();
    assert_eq!(source_count(), 0);
}

#[test]
fn test_source_cache_separates_families() {
    let _lock = SOURCE_CACHE.lock();
    clear_sources();

    let cfg = c2c(64, 4);
    let sb = GeneratorConfig::builder().force_family(KernelFamily::SmallBatch).build();
    let f2 = GeneratorConfig::builder().force_family(KernelFamily::Factor2Slm).build();
    let a = get_or_generate(&configure(&cfg, &pvc(), &sb).unwrap(), &sb, None).unwrap();
    let b = get_or_generate(&configure(&cfg, &pvc(), &f2).unwrap(), &f2, None).unwrap();
    assert!(a.identifier.starts_with("sbfft_"));
    assert!(b.identifier.starts_with("f2fft_"));
    assert_eq!(source_count(), 2);
    clear_sources();
}

#[test]
fn test_partial_real_batch_rejected_in_place() {
    let cfg = Configuration::new_1d(64, 8, 1, Precision::F32, Direction::Forward, TransformKind::R2c);
    let err = build_kernel(&cfg, &pvc(), &CountingCompiler::default(), &MemoryCache::new(), &GeneratorConfig::default())
        .unwrap_err();
    assert!(matches!(err, Error::InplaceUnsupported { ref identifier } if identifier.starts_with("sbfft_")), "{err}");

    let mut out_of_place = cfg.clone();
    out_of_place.set_strides_default(false);
    let config = configure(&out_of_place, &pvc(), &GeneratorConfig::default()).unwrap();
    check_placement(&out_of_place, &config).unwrap();
}
