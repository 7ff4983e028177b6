//! Host execution of a complete transform.
//!
//! A [`HostPlan`] holds the kernel IR and launch contract of every 1-D stage of a configuration
//! and runs them through the [`Interpreter`] on buffers in [`Memory`]. It goes straight from IR
//! to execution, so no compiler and no kernel cache are involved.

use std::rc::Rc;

use fftgen_device::DeviceInfo;
use fftgen_fft::build::check_placement;
use fftgen_fft::{
    Configuration, GeneratorConfig, KernelArg, KernelConfiguration, LaunchConfig, configure, generate_program,
    plan_stages, twiddle,
};
use fftgen_ir::Program;
use snafu::{OptionExt, ResultExt};
use tracing::debug;

use crate::error::{FftSnafu, PlanArgumentsSnafu, Result, UnknownKernelSnafu};
use crate::interpreter::{HostFunction, Interpreter, NdRange};
use crate::memory::{BufferId, Memory, Pointer};
use crate::value::{Scalar, Value};

/// One kernel of a plan.
#[derive(Debug, Clone)]
pub struct Stage {
    pub configuration: KernelConfiguration,
    /// Name of the kernel inside `program`.
    pub kernel: String,
    pub program: Program,
    pub launch: LaunchConfig,
}

/// Every stage of a configuration, ready to run on the host.
pub struct HostPlan {
    stages: Vec<Stage>,
    functions: Vec<(String, HostFunction)>,
}

impl HostPlan {
    /// Configures and generates each 1-D stage of `cfg` for `device`.
    #[tracing::instrument(skip_all, fields(dim = cfg.dim, kind = %cfg.kind))]
    pub fn new(cfg: &Configuration, device: &DeviceInfo, policy: &GeneratorConfig) -> Result<Self> {
        let mut stages = Vec::new();
        for stage in plan_stages(cfg).context(FftSnafu)? {
            let configuration = configure(&stage, device, policy).context(FftSnafu)?;
            check_placement(&stage, &configuration).context(FftSnafu)?;
            let program = generate_program(&configuration, policy).context(FftSnafu)?;
            let kernel = program
                .kernels()
                .find_map(|d| d.prototype())
                .map(|p| p.name.clone())
                .context(UnknownKernelSnafu { name: configuration.identifier() })?;
            let launch = LaunchConfig::new(&configuration, stage.k());
            debug!(%kernel, global = ?launch.global_size, local = ?launch.local_size, "planned stage");
            stages.push(Stage { configuration, kernel, program, launch });
        }
        Ok(Self { stages, functions: Vec::new() })
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Provides the host implementation of callback `name`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        function: impl Fn(&mut Memory, &[Value]) -> Result<Value> + 'static,
    ) -> &mut Self {
        self.functions.push((name.into(), Rc::new(function)));
        self
    }

    /// Runs all stages.
    ///
    /// The first stage reads `input` and writes `output`; later stages transform `output` in
    /// place. `user_data` is required when the configuration has callbacks. Buffers allocated
    /// while a stage runs, such as its twiddle table, are freed after it.
    pub fn execute(
        &self,
        memory: &mut Memory,
        input: BufferId,
        output: BufferId,
        user_data: Option<Value>,
    ) -> Result<()> {
        for (index, stage) in self.stages.iter().enumerate() {
            let source = if index == 0 { input } else { output };
            let mark = memory.mark();
            let args = Self::bind(stage, memory, source, output, user_data.as_ref())?;
            let interpreter = Interpreter::new(&stage.program).with_functions(self.functions.iter().cloned());
            let range = NdRange::new(stage.launch.global_size, stage.launch.local_size);
            interpreter.launch(&stage.kernel, memory, &args, range)?;
            memory.release(mark);
        }
        Ok(())
    }

    fn bind(
        stage: &Stage,
        memory: &mut Memory,
        input: BufferId,
        output: BufferId,
        user_data: Option<&Value>,
    ) -> Result<Vec<Value>> {
        stage
            .launch
            .args
            .iter()
            .map(|arg| {
                Ok(match arg {
                    KernelArg::In => Value::Pointer(Pointer::new(input)),
                    KernelArg::Out => Value::Pointer(Pointer::new(output)),
                    KernelArg::Twiddle => {
                        let table = stage.launch.twiddle.as_deref().context(PlanArgumentsSnafu {
                            reason: format!("{} has no twiddle table", stage.kernel),
                        })?;
                        Value::Pointer(Pointer::new(memory.alloc_floats(&twiddle::interleaved(table))))
                    }
                    KernelArg::K => Value::Scalar(Scalar::UInt(stage.launch.k as u64)),
                    KernelArg::UserData => user_data.cloned().context(PlanArgumentsSnafu {
                        reason: format!("{} takes user data for its callbacks", stage.kernel),
                    })?,
                })
            })
            .collect()
    }
}
