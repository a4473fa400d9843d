//! Point-list helpers shared by the line charts.

/// Split a polyline into runs of finite points. A NaN coordinate ends the
/// current run, so no segment is drawn across it.
pub fn split_at_nan<I>(points: I) -> Vec<Vec<(f64, f64)>>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (x, y) in points {
        if x.is_finite() && y.is_finite() {
            current.push((x, y));
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Raise finite values below `floor` to `floor`; NaN passes through.
pub fn clamp_floor(value: f64, floor: f64) -> f64 {
    if value.is_nan() {
        value
    } else {
        value.max(floor)
    }
}

/// Min and max of the finite values, widened by `pad` of the span (or by
/// `pad` absolutely when all values are equal).
pub fn padded_range<I>(values: I, pad: f64) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;
    let margin = if hi > lo { (hi - lo) * pad } else { pad.max(f64::EPSILON) };
    Some((lo - margin, hi + margin))
}
