/// Receives transfer progress. Every method has a no-op default.
pub trait Progress {
    /// A new transfer begins; `total` is its size in bytes when known
    fn start(&self, _label: &str, _total: Option<u64>) {}

    /// `bytes` more bytes were written
    fn advance(&self, _bytes: u64) {}

    /// The current transfer is over, successfully or not
    fn finish(&self) {}
}

/// Reports nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {}
