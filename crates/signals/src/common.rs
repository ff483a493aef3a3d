//! Small numeric helpers shared by the forecasters.

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator), `None` below two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Ordinary least-squares line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Fits a line through `(x, y)` pairs.
    ///
    /// Returns `None` for mismatched or empty input. When every `x` is equal
    /// the fit is the horizontal line through the mean of `y`.
    pub fn fit(xs: &[f64], ys: &[f64]) -> Option<Self> {
        if xs.len() != ys.len() {
            return None;
        }
        let mean_x = mean(xs)?;
        let mean_y = mean(ys)?;

        let mut covariance = 0.0;
        let mut var_x = 0.0;
        for (x, y) in xs.iter().zip(ys) {
            let dx = x - mean_x;
            covariance += dx * (y - mean_y);
            var_x += dx * dx;
        }

        let slope = if var_x < f64::EPSILON {
            0.0
        } else {
            covariance / var_x
        };

        Some(Self {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}
