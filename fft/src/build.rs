//! Kernel build flow.
//!
//! `configure -> generate -> render -> check extensions -> compile`. Rendered sources are
//! memoized process-wide; compiled modules go through the caller's [`KernelCache`].
//!
//! # Thread Safety
//!
//! The source cache is a lock-free `papaya` map. Concurrent requests for the same kernel may
//! both generate it, but all of them end up sharing the first inserted copy.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use fftgen_codegen::opencl::OpenClRenderer;
use fftgen_codegen::{RenderedProgram, Renderer};
use fftgen_device::{CacheKey, Compiler, DeviceInfo, KernelCache};
use fftgen_ir::Program;
use papaya::HashMap;
use snafu::ResultExt;
use tracing::debug;

use crate::algorithm::{KernelConfiguration, Stages, configure, plan_stages};
use crate::config::GeneratorConfig;
use crate::configuration::{Configuration, UserModule};
use crate::error::{
    CodegenSnafu, DeviceSnafu, InplaceUnsupportedSnafu, MissingExtensionSnafu, Result, UnsupportedDimensionSnafu,
};
use crate::generator::mixed_radix::Butterfly;
use crate::generator::{GenerateOptions, f2fft, sbfft};
use crate::launch::LaunchConfig;

/// Rendered kernel together with the configuration it implements.
#[derive(Debug, Clone)]
pub struct GeneratedKernel {
    pub configuration: KernelConfiguration,
    pub identifier: String,
    /// Source with the callback module prepended.
    pub rendered: RenderedProgram,
}

impl GeneratedKernel {
    /// Identifier tagged with a hash of the rendered source.
    ///
    /// Callback modules and generator policy change the source without changing the identifier,
    /// so compiled modules are keyed by both.
    pub fn module_identifier(&self) -> String {
        let mut hasher = DefaultHasher::new();
        self.rendered.source.hash(&mut hasher);
        format!("{}#{:016x}", self.identifier, hasher.finish())
    }
}

/// Compiled kernel ready to launch.
#[derive(Debug, Clone)]
pub struct BuiltKernel<M> {
    pub kernel: Arc<GeneratedKernel>,
    pub module: M,
    pub launch: LaunchConfig,
}

/// Everything that changes the emitted source of one configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SourceKey {
    identifier: String,
    butterfly: Butterfly,
    simplify: bool,
    callback_source: Option<String>,
}

static SOURCES: OnceLock<HashMap<SourceKey, Arc<GeneratedKernel>>> = OnceLock::new();

fn sources() -> &'static HashMap<SourceKey, Arc<GeneratedKernel>> {
    SOURCES.get_or_init(HashMap::new)
}

/// Kernel IR for `config`.
pub fn generate_program(config: &KernelConfiguration, policy: &GeneratorConfig) -> Result<Program> {
    let options =
        GenerateOptions { butterfly: policy.butterfly_for(config.family()), simplify: policy.simplify, name: None };
    match config {
        KernelConfiguration::SmallBatch(cfg) => sbfft::generate(cfg, &options),
        KernelConfiguration::Factor2Slm(cfg) => f2fft::generate(cfg, &options),
    }
}

/// Generates and renders `config`, without consulting the source cache.
pub fn render_kernel(
    config: &KernelConfiguration,
    policy: &GeneratorConfig,
    callbacks: Option<&UserModule>,
) -> Result<GeneratedKernel> {
    let program = generate_program(config, policy)?;
    let mut rendered = OpenClRenderer::new().render(&program).context(CodegenSnafu)?;
    if let Some(module) = callbacks.filter(|m| !m.source.is_empty()) {
        rendered.source = format!("{}\n{}", module.source, rendered.source);
    }
    let identifier = config.identifier();
    debug!(%identifier, source_len = rendered.source.len(), "rendered kernel");
    Ok(GeneratedKernel { configuration: config.clone(), identifier, rendered })
}

/// [`render_kernel`] memoized process-wide.
pub fn get_or_generate(
    config: &KernelConfiguration,
    policy: &GeneratorConfig,
    callbacks: Option<&UserModule>,
) -> Result<Arc<GeneratedKernel>> {
    let key = SourceKey {
        identifier: config.identifier(),
        butterfly: policy.butterfly_for(config.family()),
        simplify: policy.simplify,
        callback_source: callbacks.map(|m| m.source.clone()),
    };
    let map = sources();
    let guard = map.guard();

    if let Some(cached) = map.get(&key, &guard) {
        debug!(identifier = %key.identifier, "kernel source cache hit");
        return Ok(Arc::clone(cached));
    }

    let generated = Arc::new(render_kernel(config, policy, callbacks)?);

    use papaya::{Compute, Operation};
    match map.compute(
        key,
        |entry| match entry {
            Some((_, existing)) => Operation::Abort(Arc::clone(existing)),
            None => Operation::Insert(Arc::clone(&generated)),
        },
        &guard,
    ) {
        Compute::Inserted(_, kernel) => Ok(Arc::clone(kernel)),
        Compute::Aborted(kernel) => Ok(kernel),
        _ => Ok(generated),
    }
}

/// Drops all memoized sources.
pub fn clear_sources() {
    sources().pin().clear();
}

pub fn source_count() -> usize {
    sources().pin().len()
}

/// Fails with the first extension `rendered` needs but `device` does not advertise.
pub fn check_extensions(rendered: &RenderedProgram, device: &DeviceInfo) -> Result<()> {
    match rendered.extensions.iter().find(|&&e| !device.supports(e)) {
        Some(&extension) => MissingExtensionSnafu { extension }.fail(),
        None => Ok(()),
    }
}

/// Rejects in-place execution of kernels whose batch blocks would overwrite each other's input.
pub fn check_placement(cfg: &Configuration, config: &KernelConfiguration) -> Result<()> {
    snafu::ensure!(
        !(cfg.is_inplace() && config.inplace_unsupported()),
        InplaceUnsupportedSnafu { identifier: config.identifier() }
    );
    Ok(())
}

/// Builds the kernel of a 1-D configuration.
///
/// Required extensions are checked against `device` before the compiler is invoked; compiled
/// modules are looked up in and stored to `cache` under
/// `(kernel.module_identifier(), compiler.device_id())`.
#[tracing::instrument(skip_all, fields(n = cfg.n(), kind = %cfg.kind))]
pub fn build_kernel<C: Compiler>(
    cfg: &Configuration,
    device: &DeviceInfo,
    compiler: &C,
    cache: &dyn KernelCache<C::Module>,
    policy: &GeneratorConfig,
) -> Result<BuiltKernel<C::Module>> {
    snafu::ensure!(cfg.dim == 1, UnsupportedDimensionSnafu { dim: cfg.dim });
    let config = configure(cfg, device, policy)?;
    check_placement(cfg, &config)?;
    let kernel = get_or_generate(&config, policy, cfg.callbacks.as_ref())?;

    check_extensions(&kernel.rendered, device)?;

    let key = CacheKey::new(kernel.module_identifier(), compiler.device_id());
    let module = match cache.get(&key) {
        Some(module) => {
            debug!(%key, "kernel cache hit");
            module
        }
        None => {
            debug!(%key, "kernel cache miss");
            let module = compiler.compile(&kernel.rendered).context(DeviceSnafu)?;
            cache.store(key, module.clone());
            module
        }
    };

    let launch = LaunchConfig::new(&config, cfg.k());
    Ok(BuiltKernel { kernel, module, launch })
}

/// Builds every 1-D stage of `cfg` in execution order.
pub fn build_plan<C: Compiler>(
    cfg: &Configuration,
    device: &DeviceInfo,
    compiler: &C,
    cache: &dyn KernelCache<C::Module>,
    policy: &GeneratorConfig,
) -> Result<Vec<BuiltKernel<C::Module>>> {
    let stages: Stages = plan_stages(cfg)?;
    stages.iter().map(|stage| build_kernel(stage, device, compiler, cache, policy)).collect()
}
