//! Device capabilities consumed by configuration selection.

use std::fmt;
use std::str::FromStr;

use enumset::EnumSet;
use fftgen_ir::Extension;
use itertools::Itertools;
use smallvec::SmallVec;
use snafu::ResultExt;

use crate::error::{Error, MalformedDeviceInfoSnafu};
use crate::parse::{Cursor, ParseError};

/// Bytes in one hardware register at sub-group size 8.
const BYTES_PER_REGISTER: usize = 32;
/// Registers per thread with the large register file.
const NUM_REGISTERS: usize = 256;
/// Sub-group size assumed when the device reports none.
const DEFAULT_SUBGROUP_SIZE: usize = 8;

/// Device class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(strum::Display, strum::EnumString, strum::IntoStaticStr, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceType {
    #[default]
    Gpu,
    Cpu,
    Custom,
}

/// Hardware limits of a target device.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceInfo {
    /// Maximum number of work-items in a work-group.
    pub max_work_group_size: usize,
    /// Supported sub-group sizes.
    pub subgroup_sizes: SmallVec<[usize; 5]>,
    /// Shared local memory per work-group in bytes.
    pub local_memory_size: usize,
    pub device_type: DeviceType,
    /// Kernel-language extensions the device advertises.
    pub extensions: EnumSet<Extension>,
}

impl DeviceInfo {
    /// Device with the extensions usual for its class, see [`DeviceInfo::default_extensions`].
    pub fn new(
        max_work_group_size: usize,
        subgroup_sizes: impl IntoIterator<Item = usize>,
        local_memory_size: usize,
        device_type: DeviceType,
    ) -> Self {
        Self {
            max_work_group_size,
            subgroup_sizes: subgroup_sizes.into_iter().collect(),
            local_memory_size,
            device_type,
            extensions: Self::default_extensions(device_type),
        }
    }

    pub fn with_extensions(mut self, extensions: impl Into<EnumSet<Extension>>) -> Self {
        self.extensions = extensions.into();
        self
    }

    /// Intel GPUs expose all sub-group extensions, Intel CPUs the basic one.
    pub fn default_extensions(device_type: DeviceType) -> EnumSet<Extension> {
        match device_type {
            DeviceType::Gpu => {
                Extension::ClIntelSubgroups | Extension::ClIntelSubgroupsLong | Extension::ClIntelSubgroupsShort
            }
            DeviceType::Cpu => EnumSet::only(Extension::ClIntelSubgroups),
            DeviceType::Custom => EnumSet::empty(),
        }
    }

    pub fn supports(&self, extension: Extension) -> bool {
        extension == Extension::Builtin || self.extensions.contains(extension)
    }

    pub fn min_subgroup_size(&self) -> usize {
        self.subgroup_sizes.iter().copied().min().unwrap_or(DEFAULT_SUBGROUP_SIZE)
    }

    pub fn max_subgroup_size(&self) -> usize {
        self.subgroup_sizes.iter().copied().max().unwrap_or(DEFAULT_SUBGROUP_SIZE)
    }

    /// Register file size in bytes at the minimum sub-group size.
    ///
    /// Register width is assumed to scale with the sub-group size.
    pub fn register_space(&self) -> usize {
        register_space_for(self.min_subgroup_size())
    }

    /// Register file size in bytes at the maximum sub-group size.
    pub fn register_space_max(&self) -> usize {
        register_space_for(self.max_subgroup_size())
    }
}

fn register_space_for(subgroup_size: usize) -> usize {
    (subgroup_size / 8).max(1) * BYTES_PER_REGISTER * NUM_REGISTERS
}

// =============================================================================
// Text form
// =============================================================================

/// `{max_work_group_size,{subgroup sizes...},local_memory_size,device type}`
impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{},{{{}}},{},{}}}",
            self.max_work_group_size,
            self.subgroup_sizes.iter().join(","),
            self.local_memory_size,
            self.device_type
        )
    }
}

impl FromStr for DeviceInfo {
    type Err = Error;

    fn from_str(desc: &str) -> Result<Self, Self::Err> {
        parse_device_info(desc).context(MalformedDeviceInfoSnafu)
    }
}

fn parse_device_info(desc: &str) -> Result<DeviceInfo, ParseError> {
    let mut cursor = Cursor::skipping_blanks(desc);

    cursor.expect('{')?;
    let max_work_group_size = cursor.number()?;
    cursor.expect(',')?;

    cursor.expect('{')?;
    let mut subgroup_sizes = SmallVec::<[usize; 5]>::new();
    subgroup_sizes.push(cursor.number()?);
    while cursor.eat(',') {
        subgroup_sizes.push(cursor.number()?);
    }
    cursor.expect('}')?;
    cursor.expect(',')?;

    let local_memory_size = cursor.number()?;
    cursor.expect(',')?;

    cursor.peek();
    let start = cursor.position();
    let device_type = cursor
        .word()
        .parse::<DeviceType>()
        .map_err(|_| cursor.error_at(start, "expected gpu, cpu or custom"))?;
    cursor.expect('}')?;

    if !cursor.is_at_end() {
        return Err(cursor.error("unexpected trailing input"));
    }

    Ok(DeviceInfo::new(max_work_group_size, subgroup_sizes, local_memory_size, device_type))
}
