//! Monotonic lookup with linear interpolation and flat extrapolation

/// Linearly interpolate `ys` over strictly increasing `xs` at `x`
///
/// Outside `[xs[0], xs[n-1]]` the boundary value is returned. A single node
/// gives a constant curve; no nodes gives 0.0. A NaN `x` gives NaN.
pub fn interp_flat(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());

    let n = xs.len().min(ys.len());
    if n == 0 {
        return 0.0;
    }
    if x.is_nan() {
        return f64::NAN;
    }
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[n - 1] {
        return ys[n - 1];
    }

    // First node strictly greater than x; in 1..n because of the checks above
    let hi = xs[..n].partition_point(|&node| node <= x);
    let lo = hi - 1;

    let (x0, x1) = (xs[lo], xs[hi]);
    let (y0, y1) = (ys[lo], ys[hi]);
    y0 + (x - x0) / (x1 - x0) * (y1 - y0)
}
