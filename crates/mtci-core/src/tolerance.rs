use serde::{Deserialize, Serialize};

/// Absolute/relative tolerance used to compare two scalar model outputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tolerance {
    #[serde(default)]
    pub atol: f64,
    #[serde(default = "default_rtol")]
    pub rtol: f64,
}

fn default_rtol() -> f64 {
    0.01
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            atol: 0.0,
            rtol: default_rtol(),
        }
    }
}

impl Tolerance {
    pub fn new(atol: f64, rtol: f64) -> Self {
        Self { atol, rtol }
    }
}

/// `|a - b| <= atol + rtol * |b|`.
///
/// Not symmetric: `b` is the reference value the relative term scales with.
/// Call sites must keep the operand order their relation documents.
pub fn within_tolerance(a: f64, b: f64, tol: &Tolerance) -> bool {
    (a - b).abs() <= tol.atol + tol.rtol * b.abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_with_zero_tolerance() {
        let tol = Tolerance::new(0.0, 0.0);
        assert!(within_tolerance(0.5, 0.5, &tol));
        assert!(!within_tolerance(0.5, 0.5000001, &tol));
    }

    #[test]
    fn test_relative_term_scales_with_reference() {
        let tol = Tolerance::new(0.0, 0.1);
        // |10 - 11| = 1 <= 0.1 * 11
        assert!(within_tolerance(10.0, 11.0, &tol));
        // boundary is inclusive: 1 <= 0.1 * 10
        assert!(within_tolerance(11.0, 10.0, &tol));
        // 2 > 0.1 * 10
        assert!(!within_tolerance(12.0, 10.0, &tol));
    }

    #[test]
    fn test_asymmetry_depends_on_which_operand_is_reference() {
        let tol = Tolerance::new(0.0, 0.5);
        // reference 2.0: 1.0 <= 1.0
        assert!(within_tolerance(1.0, 2.0, &tol));
        // reference 1.0: 1.0 > 0.5
        assert!(!within_tolerance(2.0, 1.0, &tol));
    }

    #[test]
    fn test_zero_inputs() {
        let tol = Tolerance::new(0.0, 0.01);
        assert!(within_tolerance(0.0, 0.0, &tol));
        assert!(!within_tolerance(0.001, 0.0, &tol));
        assert!(within_tolerance(0.001, 0.0, &Tolerance::new(0.001, 0.0)));
    }

    #[test]
    fn test_matches_formula_on_grid() {
        let values: [f64; 7] = [-3.5, -1.0, 0.0, 0.1, 0.9, 2.0, 100.0];
        let tols = [
            Tolerance::new(0.0, 0.0),
            Tolerance::new(0.05, 0.0),
            Tolerance::new(0.0, 0.01),
            Tolerance::new(0.2, 0.3),
        ];
        for tol in &tols {
            for &a in &values {
                for &b in &values {
                    let expected = (a - b).abs() <= tol.atol + tol.rtol * b.abs();
                    assert_eq!(within_tolerance(a, b, tol), expected, "a={a} b={b} {tol:?}");
                }
            }
        }
    }

    #[test]
    fn test_defaults() {
        let tol = Tolerance::default();
        assert_eq!(tol.atol, 0.0);
        assert_eq!(tol.rtol, 0.01);
    }
}
