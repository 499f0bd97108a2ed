use crate::util;

/// Receives ingestion progress.
///
/// Called synchronously from the ingestion loop before each data line with
/// the 1-based line index and the number of data lines.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, current: usize, total: usize);

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}

impl<F> ProgressObserver for F
where
    F: Fn(usize, usize) + Send + Sync,
{
    fn on_progress(&self, current: usize, total: usize) {
        self(current, total)
    }
}

/// Logs progress every `every` lines and on the last line.
pub struct LogProgress {
    pub every: usize,
}

impl Default for LogProgress {
    fn default() -> Self {
        Self { every: 500 }
    }
}

impl ProgressObserver for LogProgress {
    fn on_progress(&self, current: usize, total: usize) {
        if current == total || (self.every > 0 && current % self.every == 0) {
            log::info!("processing row {} of {}", current, total);
        }
    }
}
