//! Derived metrics computed from demographic fields.

/// Body-mass index from height in centimeters and weight in kilograms.
///
/// The inputs are raw form text and may be absent, blank, or non-numeric;
/// BMI is only defined when both parse to finite positive numbers. The
/// result is rounded to two decimals. Callers recompute this at every read
/// site — it is never stored.
pub fn compute_bmi(height_cm: Option<&str>, weight_kg: Option<&str>) -> Option<f64> {
    let height = parse_positive(height_cm?)?;
    let weight = parse_positive(weight_kg?)?;

    let height_m = height / 100.0;
    let bmi = weight / (height_m * height_m);
    if !bmi.is_finite() {
        return None;
    }
    Some(round2(bmi))
}

fn parse_positive(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
