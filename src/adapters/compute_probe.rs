use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::domain::{ComputeProfile, Device};
use crate::ports::ComputeProbe;

/// Host compute probe.
///
/// Tries CUDA first, then the Apple unified-memory accelerator, and falls
/// back to CPU. The result is cached after the first probe; the host
/// environment does not change mid-run.
pub struct HostComputeProbe {
    profile: OnceCell<ComputeProfile>,
}

impl HostComputeProbe {
    /// Create a new probe.
    pub fn new() -> Self {
        Self {
            profile: OnceCell::new(),
        }
    }

    fn probe() -> ComputeProfile {
        let device = if Self::has_cuda() {
            Device::Cuda
        } else if Self::has_mps() {
            Device::Mps
        } else {
            Device::Cpu
        };
        let profile = ComputeProfile::for_device(device);

        info!(
            device = %profile.device,
            precision = %profile.precision,
            "Compute profile resolved"
        );
        profile
    }

    /// CUDA counts as present when the NVIDIA management tool runs and
    /// reports at least one device.
    fn has_cuda() -> bool {
        use std::process::Command;

        let output = match Command::new("nvidia-smi")
            .args(["--query-gpu=name", "--format=csv,noheader"])
            .output()
        {
            Ok(output) => output,
            Err(_) => return false,
        };
        if !output.status.success() {
            return false;
        }

        let listed = String::from_utf8_lossy(&output.stdout);
        let found = listed.lines().any(|line| !line.trim().is_empty());
        debug!(found, "Probed for CUDA devices");
        found
    }

    #[cfg(all(target_os = "macos", target_arch = "aarch64"))]
    fn has_mps() -> bool {
        true
    }

    #[cfg(not(all(target_os = "macos", target_arch = "aarch64")))]
    fn has_mps() -> bool {
        false
    }
}

impl Default for HostComputeProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ComputeProbe for HostComputeProbe {
    fn resolve(&self) -> ComputeProfile {
        *self.profile.get_or_init(Self::probe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Precision;

    #[test]
    fn test_resolve_is_cached_and_consistent() {
        let probe = HostComputeProbe::new();
        let first = probe.resolve();
        let second = probe.resolve();
        assert_eq!(first, second);
    }

    #[test]
    fn test_resolved_precision_follows_device_policy() {
        let profile = HostComputeProbe::new().resolve();
        assert_eq!(profile.precision, Precision::for_device(profile.device));
    }
}
