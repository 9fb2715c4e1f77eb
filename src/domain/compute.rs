use serde::{Deserialize, Serialize};

/// Compute device used for model inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    /// CPU-only execution.
    Cpu,
    /// NVIDIA GPU.
    Cuda,
    /// Apple unified-memory accelerator.
    Mps,
}

impl Device {
    /// Get the identifier engines expect.
    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Cpu => "cpu",
            Device::Cuda => "cuda",
            Device::Mps => "mps",
        }
    }

    /// Whether this is a GPU-class device (affects batch sizing).
    pub fn is_gpu(&self) -> bool {
        matches!(self, Device::Cuda)
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Numeric precision used for inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    Float32,
    Float16,
    Int8,
}

impl Precision {
    /// Get the identifier engines expect.
    pub fn as_str(&self) -> &'static str {
        match self {
            Precision::Float32 => "float32",
            Precision::Float16 => "float16",
            Precision::Int8 => "int8",
        }
    }

    /// Fixed precision policy per device: half precision on GPU-class
    /// hardware, full precision on unified memory, quantized int8 on CPU.
    pub fn for_device(device: Device) -> Self {
        match device {
            Device::Cuda => Precision::Float16,
            Device::Mps => Precision::Float32,
            Device::Cpu => Precision::Int8,
        }
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Device plus precision, derived once per invocation from host probing and
/// never mutated mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComputeProfile {
    pub device: Device,
    pub precision: Precision,
}

impl ComputeProfile {
    /// Profile for a device, precision following the fixed policy.
    pub fn for_device(device: Device) -> Self {
        Self {
            device,
            precision: Precision::for_device(device),
        }
    }

    /// Conservative fallback when no accelerator is detected.
    pub fn cpu() -> Self {
        Self::for_device(Device::Cpu)
    }

    /// Transcription batch size: a throughput knob with no correctness
    /// effect, larger on GPU-class devices.
    pub fn batch_size(&self) -> u32 {
        if self.device.is_gpu() {
            16
        } else {
            4
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_policy_per_device() {
        assert_eq!(Precision::for_device(Device::Cuda), Precision::Float16);
        assert_eq!(Precision::for_device(Device::Mps), Precision::Float32);
        assert_eq!(Precision::for_device(Device::Cpu), Precision::Int8);
    }

    #[test]
    fn test_batch_size_policy() {
        assert_eq!(ComputeProfile::for_device(Device::Cuda).batch_size(), 16);
        assert_eq!(ComputeProfile::for_device(Device::Mps).batch_size(), 4);
        assert_eq!(ComputeProfile::cpu().batch_size(), 4);
    }

    #[test]
    fn test_display_identifiers() {
        assert_eq!(Device::Mps.to_string(), "mps");
        assert_eq!(Precision::Float16.to_string(), "float16");
    }
}
