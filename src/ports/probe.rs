use crate::domain::ComputeProfile;

/// Port for host capability probing.
///
/// Implementations inspect the machine once and answer from cache after
/// that; the host environment does not change mid-run.
pub trait ComputeProbe: Send + Sync {
    /// Resolve the device and precision for this host.
    ///
    /// Pure probe, always succeeds: falls back to the conservative CPU
    /// profile when no accelerator is detected.
    fn resolve(&self) -> ComputeProfile;
}
