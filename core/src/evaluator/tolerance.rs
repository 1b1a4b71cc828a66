//! Tolerance-based ("fuzzy") numeric comparison.
//!
//! Every configured bound relaxes a comparison independently: the comparison
//! holds if it holds exactly or under any one of the bounds. Bounds are never
//! combined into a single wider interval.

/// Relaxation of numeric comparisons, supplied per call.
///
/// All fields unset means exact comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tolerance {
    /// Absolute slack below the reference value.
    pub lower: Option<f64>,
    /// Absolute slack above the reference value.
    pub upper: Option<f64>,
    /// Slack below, applied to integer-truncated values.
    pub int_lower: Option<f64>,
    /// Slack above, applied to integer-truncated values.
    pub int_upper: Option<f64>,
    /// Relative slack as a fraction of either operand's magnitude.
    pub proportional: Option<f64>,
}

impl Tolerance {
    pub const EXACT: Tolerance = Tolerance {
        lower: None,
        upper: None,
        int_lower: None,
        int_upper: None,
        proportional: None,
    };

    pub fn exact() -> Self {
        Self::EXACT
    }

    /// Absolute bounds on both sides.
    pub fn absolute(lower: f64, upper: f64) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
            ..Self::EXACT
        }
    }

    /// Absolute bounds on both sides, applied after truncating to integers.
    pub fn integer(lower: f64, upper: f64) -> Self {
        Self {
            int_lower: Some(lower),
            int_upper: Some(upper),
            ..Self::EXACT
        }
    }

    pub fn proportional(fraction: f64) -> Self {
        Self {
            proportional: Some(fraction),
            ..Self::EXACT
        }
    }

    pub fn with_lower(mut self, lower: f64) -> Self {
        self.lower = Some(lower);
        self
    }

    pub fn with_upper(mut self, upper: f64) -> Self {
        self.upper = Some(upper);
        self
    }

    pub fn with_int_lower(mut self, lower: f64) -> Self {
        self.int_lower = Some(lower);
        self
    }

    pub fn with_int_upper(mut self, upper: f64) -> Self {
        self.int_upper = Some(upper);
        self
    }

    pub fn with_proportional(mut self, fraction: f64) -> Self {
        self.proportional = Some(fraction);
        self
    }

    pub fn is_exact(&self) -> bool {
        *self == Self::EXACT
    }

    /// Tolerant equality: exact, or within any configured range around
    /// either operand.
    pub fn equal(&self, x: f64, y: f64) -> bool {
        if x == y {
            return true;
        }
        if self.lower.is_some() || self.upper.is_some() {
            let lo = self.lower.unwrap_or(0.0);
            let hi = self.upper.unwrap_or(0.0);
            if within_around(x, y, lo, hi) {
                return true;
            }
        }
        if self.int_lower.is_some() || self.int_upper.is_some() {
            let lo = self.int_lower.unwrap_or(0.0);
            let hi = self.int_upper.unwrap_or(0.0);
            if within_around(x.trunc(), y.trunc(), lo, hi) {
                return true;
            }
        }
        if let Some(p) = self.proportional {
            let distance = (x - y).abs();
            if distance <= p * y.abs() || distance <= p * x.abs() {
                return true;
            }
        }
        false
    }

    /// `x > y` (or `x >= y`), with the threshold moved down by each bound.
    pub fn greater(&self, x: f64, y: f64, or_equal: bool) -> bool {
        let cmp = |a: f64, b: f64| if or_equal { a >= b } else { a > b };
        if cmp(x, y) {
            return true;
        }
        if let Some(lo) = self.lower {
            if cmp(x, y - lo) {
                return true;
            }
        }
        if let Some(lo) = self.int_lower {
            if cmp(x.trunc(), y.trunc() - lo) {
                return true;
            }
        }
        if let Some(p) = self.proportional {
            if cmp(x, y - p * y.abs()) || cmp(x, y - p * x.abs()) {
                return true;
            }
        }
        false
    }

    /// `x < y` (or `x <= y`), with the threshold moved up by each bound.
    pub fn less(&self, x: f64, y: f64, or_equal: bool) -> bool {
        let cmp = |a: f64, b: f64| if or_equal { a <= b } else { a < b };
        if cmp(x, y) {
            return true;
        }
        if let Some(hi) = self.upper {
            if cmp(x, y + hi) {
                return true;
            }
        }
        if let Some(hi) = self.int_upper {
            if cmp(x.trunc(), y.trunc() + hi) {
                return true;
            }
        }
        if let Some(p) = self.proportional {
            if cmp(x, y + p * y.abs()) || cmp(x, y + p * x.abs()) {
                return true;
            }
        }
        false
    }
}

/// `x` lies in `[y - lo, y + hi]` or `y` lies in `[x - lo, x + hi]`.
fn within_around(x: f64, y: f64, lo: f64, hi: f64) -> bool {
    let inside = |v: f64, center: f64| v >= center - lo && v <= center + hi;
    inside(x, y) || inside(y, x)
}
