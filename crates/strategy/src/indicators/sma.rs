/// Simple moving average: arithmetic mean of the most recent `period` values.
///
/// Returns `None` until at least `period` values are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sma {
    pub period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Compute the SMA over the tail of `values` (oldest first).
    pub fn compute(&self, values: &[f64]) -> Option<f64> {
        if self.period == 0 || values.len() < self.period {
            return None;
        }
        let tail = &values[values.len() - self.period..];
        Some(tail.iter().sum::<f64>() / self.period as f64)
    }
}
