//! Accuracy metrics for held-out forecasts

/// Stand-in denominator when an actual value is exactly zero.
pub const ZERO_DENOM_EPS: f64 = 1e-8;

/// Align two slices on their common suffix.
///
/// Length mismatches are compared over the overlapping tail, the most
/// recent observations, instead of failing the evaluation.
fn align<'a>(actual: &'a [f64], predicted: &'a [f64]) -> (&'a [f64], &'a [f64]) {
    let n = actual.len().min(predicted.len());
    (&actual[actual.len() - n..], &predicted[predicted.len() - n..])
}

/// Mean absolute percentage error, in percent.
///
/// Zero actuals contribute through [`ZERO_DENOM_EPS`] rather than
/// dividing by zero. Empty input yields NaN.
pub fn percentage_error(actual: &[f64], predicted: &[f64]) -> f64 {
    let (actual, predicted) = align(actual, predicted);

    let total: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(&a, &p)| {
            let denominator = if a == 0.0 { ZERO_DENOM_EPS } else { a };
            ((a - p) / denominator).abs()
        })
        .sum();

    total / actual.len() as f64 * 100.0
}

/// Root mean squared error, in price units.
///
/// Empty input yields NaN.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> f64 {
    let (actual, predicted) = align(actual, predicted);

    let total: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(&a, &p)| (a - p).powi(2))
        .sum();

    (total / actual.len() as f64).sqrt()
}
