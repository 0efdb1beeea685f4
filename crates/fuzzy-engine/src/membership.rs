//! Membership Functions

use crate::FuzzyError;
use serde::{Deserialize, Serialize};

/// Piecewise-linear membership function
///
/// Degrees are 0 outside `[a, last]`, 1 on the plateau and linear on the
/// slopes. A vertical slope (equal breakpoints) evaluates to 1 at that
/// breakpoint instead of dividing by zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum MembershipFunction {
    /// Triangle rising on `[a, b]`, peaking at `b`, falling on `[b, c]`
    Triangular { a: f64, b: f64, c: f64 },
    /// Trapezoid rising on `[a, b]`, flat on `[b, c]`, falling on `[c, d]`
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
}

impl MembershipFunction {
    /// Triangular function `(a, b, c)`
    pub const fn triangular(a: f64, b: f64, c: f64) -> Self {
        Self::Triangular { a, b, c }
    }

    /// Trapezoidal function `(a, b, c, d)`
    pub const fn trapezoidal(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self::Trapezoidal { a, b, c, d }
    }

    /// Degree of membership of `x`, in `[0, 1]`
    pub fn degree(&self, x: f64) -> f64 {
        match *self {
            Self::Triangular { a, b, c } => Self::trapezoid(x, a, b, b, c),
            Self::Trapezoidal { a, b, c, d } => Self::trapezoid(x, a, b, c, d),
        }
    }

    fn trapezoid(x: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
        if x.is_nan() || x < a || x > d {
            return 0.0;
        }
        if x < b {
            return (x - a) / (b - a);
        }
        if x <= c {
            return 1.0;
        }
        // c < x <= d, so d > c here
        (d - x) / (d - c)
    }

    /// Breakpoints in order
    pub fn breakpoints(&self) -> Vec<f64> {
        match *self {
            Self::Triangular { a, b, c } => vec![a, b, c],
            Self::Trapezoidal { a, b, c, d } => vec![a, b, c, d],
        }
    }

    /// Support interval `[first, last]` breakpoint
    pub fn support(&self) -> (f64, f64) {
        match *self {
            Self::Triangular { a, c, .. } => (a, c),
            Self::Trapezoidal { a, d, .. } => (a, d),
        }
    }

    /// Check that breakpoints are finite and non-decreasing
    pub fn validate(&self, label: &str) -> Result<(), FuzzyError> {
        let points = self.breakpoints();
        let ordered = points.windows(2).all(|w| w[0] <= w[1]);
        if ordered && points.iter().all(|p| p.is_finite()) {
            Ok(())
        } else {
            Err(FuzzyError::InvalidBreakpoints {
                label: label.to_string(),
                breakpoints: points,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_triangular_shape() {
        let mf = MembershipFunction::triangular(0.17, 0.25, 0.29);

        assert_eq!(mf.degree(0.10), 0.0);
        assert!((mf.degree(0.21) - 0.5).abs() < 1e-9);
        assert_eq!(mf.degree(0.25), 1.0);
        assert!((mf.degree(0.27) - 0.5).abs() < 1e-9);
        assert_eq!(mf.degree(0.30), 0.0);
    }

    #[test]
    fn test_trapezoidal_plateau() {
        let mf = MembershipFunction::trapezoidal(0.0, 0.0, 1.0, 2.0);

        assert_eq!(mf.degree(0.0), 1.0);
        assert_eq!(mf.degree(1.0), 1.0);
        assert!((mf.degree(1.5) - 0.5).abs() < 1e-9);
        assert_eq!(mf.degree(2.0), 0.0);
        assert_eq!(mf.degree(-0.1), 0.0);
    }

    #[test]
    fn test_degenerate_breakpoints() {
        // Left shoulder collapsed onto the origin
        let shoulder = MembershipFunction::trapezoidal(0.0, 0.0, 0.0, 2.0);
        assert_eq!(shoulder.degree(0.0), 1.0);
        assert!((shoulder.degree(1.0) - 0.5).abs() < 1e-9);

        // Right shoulder collapsed onto the upper bound
        let right = MembershipFunction::triangular(60.0, 100.0, 100.0);
        assert_eq!(right.degree(100.0), 1.0);

        // Fully collapsed triangle is a singleton
        let point = MembershipFunction::triangular(3.0, 3.0, 3.0);
        assert_eq!(point.degree(3.0), 1.0);
        assert_eq!(point.degree(3.0001), 0.0);
    }

    #[test]
    fn test_nan_has_no_membership() {
        let mf = MembershipFunction::trapezoidal(0.0, 0.0, 1.0, 2.0);
        assert_eq!(mf.degree(f64::NAN), 0.0);
    }

    #[test]
    fn test_validate_rejects_unordered() {
        assert!(MembershipFunction::triangular(0.0, 0.5, 1.0).validate("ok").is_ok());
        assert!(MembershipFunction::triangular(0.0, 1.5, 1.0).validate("bad").is_err());
        assert!(MembershipFunction::trapezoidal(0.0, f64::NAN, 1.0, 2.0)
            .validate("nan")
            .is_err());
    }

    #[test]
    fn test_serde_tagged_shape() {
        let mf: MembershipFunction =
            serde_json::from_str(r#"{"shape":"triangular","a":1.0,"b":2.0,"c":3.0}"#).unwrap();
        assert_eq!(mf, MembershipFunction::triangular(1.0, 2.0, 3.0));
    }

    fn sorted_breakpoints() -> impl Strategy<Value = [f64; 4]> {
        prop::array::uniform4(-100.0f64..100.0).prop_map(|mut p| {
            p.sort_by(|a, b| a.total_cmp(b));
            p
        })
    }

    proptest! {
        #[test]
        fn prop_degree_in_unit_interval(p in sorted_breakpoints(), x in -200.0f64..200.0) {
            let trap = MembershipFunction::trapezoidal(p[0], p[1], p[2], p[3]);
            let tri = MembershipFunction::triangular(p[0], p[1], p[3]);

            for mf in [trap, tri] {
                let d = mf.degree(x);
                prop_assert!((0.0..=1.0).contains(&d));
            }
        }

        #[test]
        fn prop_continuous_inside_support(
            p in sorted_breakpoints(),
            t in 0.0f64..1.0,
        ) {
            // Slopes of at least 1 unit keep the Lipschitz bound small
            let (a, b, c, d) = (p[0], p[1] + 1.0, p[2] + 1.0, p[3] + 2.0);
            let mf = MembershipFunction::trapezoidal(a, b, c, d);
            let x = a + t * (d - a);
            let h = 1e-6;
            let slope_bound = 1.0 / (b - a).min(d - c);

            prop_assert!((mf.degree(x + h) - mf.degree(x)).abs() <= slope_bound * h + 1e-9);
        }
    }
}
