/// Running statistics of the areas of the landmarks accepted in one filter invocation.
///
/// These are purely diagnostic (useful to tune the area bounds) and never affect the output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaStats {
    /// The number of accepted landmarks.
    pub count: usize,
    /// The mean area of the accepted landmarks.
    pub mean: f64,
    /// The smallest accepted area, or infinity if nothing was accepted.
    pub min: f64,
    /// The largest accepted area, or zero if nothing was accepted.
    pub max: f64,
    /// Landmarks that passed every check but did not fit in the landmark set.
    pub dropped: usize,
}

impl AreaStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, area: f64) {
        self.count += 1;
        self.mean += (area - self.mean) / self.count as f64;
        self.min = self.min.min(area);
        self.max = self.max.max(area);
    }

    pub fn record_drop(&mut self) {
        self.dropped += 1;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Default for AreaStats {
    fn default() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            min: f64::INFINITY,
            max: 0.0,
            dropped: 0,
        }
    }
}
