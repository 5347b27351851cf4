//! Backend seam for the neural synthesis model
//!
//! The engine only knows a model through these two traits. A [`ModelLoader`] picks a
//! compute device and builds the model once; the resulting [`SynthesisModel`] turns
//! text plus a reference audio file into raw samples.

use crate::AudioData;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Compute target the model runs on
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Cpu,
    Cuda(usize),
    Metal(usize),
}

impl Device {
    pub fn is_accelerated(&self) -> bool {
        !matches!(self, Device::Cpu)
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Cuda(0) => write!(f, "cuda"),
            Device::Cuda(ordinal) => write!(f, "cuda:{}", ordinal),
            Device::Metal(0) => write!(f, "metal"),
            Device::Metal(ordinal) => write!(f, "metal:{}", ordinal),
        }
    }
}

/// Requested device, resolved by the loader against the available hardware
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePreference {
    /// Prefer an accelerator, fall back to CPU
    #[default]
    Auto,
    Cpu,
    Cuda,
    Metal,
}

impl std::str::FromStr for DevicePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(DevicePreference::Auto),
            "cpu" => Ok(DevicePreference::Cpu),
            "cuda" | "gpu" => Ok(DevicePreference::Cuda),
            "metal" | "mps" => Ok(DevicePreference::Metal),
            _ => Err(format!("Unknown device preference: {}", s)),
        }
    }
}

/// A loaded synthesis model.
///
/// Implementations are not assumed to be reentrant; the engine never calls
/// [`SynthesisModel::generate`] concurrently on the same instance.
pub trait SynthesisModel: Send + Sync {
    /// Native output sample rate in Hz
    fn sample_rate(&self) -> u32;

    /// Generate speech for `text` imitating the voice in `reference`. Blocking.
    fn generate(&self, text: &str, reference: &Path) -> anyhow::Result<AudioData>;
}

/// Builds the process-wide model instance
pub trait ModelLoader: Send + Sync {
    /// Pick the compute device for this process
    fn select_device(&self, preference: DevicePreference) -> Device;

    /// Load the model onto `device`. Blocking and potentially slow.
    fn load(&self, device: &Device) -> anyhow::Result<Box<dyn SynthesisModel>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_display() {
        assert_eq!(Device::Cpu.to_string(), "cpu");
        assert_eq!(Device::Cuda(0).to_string(), "cuda");
        assert_eq!(Device::Cuda(1).to_string(), "cuda:1");
        assert_eq!(Device::Metal(0).to_string(), "metal");
        assert!(!Device::Cpu.is_accelerated());
        assert!(Device::Cuda(0).is_accelerated());
    }

    #[test]
    fn test_device_preference_from_str() {
        assert_eq!("AUTO".parse::<DevicePreference>().unwrap(), DevicePreference::Auto);
        assert_eq!("gpu".parse::<DevicePreference>().unwrap(), DevicePreference::Cuda);
        assert_eq!("mps".parse::<DevicePreference>().unwrap(), DevicePreference::Metal);
        assert!("tpu".parse::<DevicePreference>().is_err());
    }
}
