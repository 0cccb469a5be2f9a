/// Decides whether a file may grow.
///
/// Capacity accounting and eviction live outside the storage engine; the
/// engine only asks before every operation that would increase a file's
/// length, and fails with `QuotaExceeded` (changing nothing) when refused.
pub trait CapacityAllocator: std::fmt::Debug + Send + Sync + 'static {
    /// Returns `true` if `name` may grow from `current` to `requested` bytes.
    fn grant(&self, name: &str, current: u64, requested: u64) -> bool;
}

/// Grants every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unbounded;

impl CapacityAllocator for Unbounded {
    fn grant(&self, _name: &str, _current: u64, _requested: u64) -> bool {
        true
    }
}
