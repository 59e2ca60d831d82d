/// Bounded rolling window of recent prices, oldest first.
///
/// Once full, every push evicts the oldest price.
#[derive(Debug, Clone)]
pub struct PriceWindow {
    prices: Vec<f64>,
    capacity: usize,
}

impl PriceWindow {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "PriceWindow capacity must be > 0");
        Self {
            prices: Vec::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a price, returning the evicted one if the window was full.
    pub fn push(&mut self, price: f64) -> Option<f64> {
        self.prices.push(price);
        if self.prices.len() > self.capacity {
            Some(self.prices.remove(0))
        } else {
            None
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.prices
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.prices.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
