mod build;
mod config;
mod configuration;
mod factor;
mod generator;
mod nd;
mod select;

use fftgen_device::{DeviceInfo, DeviceType};

/// 1024 work-items, sub-groups of 16 and 32, 128 KiB shared local memory.
pub(crate) fn pvc() -> DeviceInfo {
    DeviceInfo::new(1024, [16, 32], 128 * 1024, DeviceType::Gpu)
}
