/// Solve `a·t² + b·t + c = 0`.
///
/// Uses the cancellation-free form `q = -(b ± √d) / 2`, so both roots keep
/// full precision even when `b² ≫ 4ac`. Roots are returned in ascending
/// order; `None` when the discriminant is negative.
///
/// `a == 0` is not special-cased: the roots come out as NaN or infinite and
/// callers comparing them against a distance range reject them.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Option<(f64, f64)> {
    let d = b * b - 4.0 * a * c;
    if d < 0.0 {
        return None;
    }

    let d = d.sqrt();
    let q = -0.5 * if b < 0.0 { b - d } else { b + d };
    let t0 = q / a;
    let t1 = c / q;

    if t0 > t1 {
        Some((t1, t0))
    } else {
        Some((t0, t1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_roots_sorted() {
        // (t - 1)(t - 3) = t² - 4t + 3
        let (t0, t1) = solve_quadratic(1.0, -4.0, 3.0).unwrap();
        assert!((t0 - 1.0).abs() < 1e-12);
        assert!((t1 - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_real_roots() {
        assert!(solve_quadratic(1.0, 0.0, 1.0).is_none());
    }

    #[test]
    fn test_double_root() {
        let (t0, t1) = solve_quadratic(1.0, -2.0, 1.0).unwrap();
        assert_eq!(t0, t1);
        assert!((t0 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_leading_coefficient() {
        // A zero-direction ray produces a = b = 0; nothing usable must come out.
        if let Some((t0, t1)) = solve_quadratic(0.0, 0.0, 1.0) {
            assert!(!(t0 >= 0.0) && !(t1 >= 0.0));
        }
    }
}
