//! Tools to calculate Pearson correlation coefficients across recorded channels.

use std::result::Result;
use crate::error::TimeSeriesProcessingError;


fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn sum_of_squares(values: &[f64], values_mean: f64) -> f64 {
    values.iter()
        .map(|i| (i - values_mean).powf(2.0))
        .sum()
}

/// Calculates the Pearson correlation coefficient given two series of the
/// same length (if either series has zero variance, `f64::NAN` is returned),
/// errors on length mismatch or empty input
pub fn pearsonr(x: &[f64], y: &[f64]) -> Result<f64, TimeSeriesProcessingError> {
    if x.len() != y.len() {
        return Err(TimeSeriesProcessingError::SeriesAreNotSameLength);
    }
    if x.is_empty() {
        return Err(TimeSeriesProcessingError::SeriesIsEmpty);
    }

    let x_mean: f64 = mean(x);
    let y_mean: f64 = mean(y);

    let numerator: f64 = x.iter().zip(y.iter())
        .map(|(i, j)| (i - x_mean) * (j - y_mean))
        .sum();

    let denominator: f64 = (sum_of_squares(x, x_mean) * sum_of_squares(y, y_mean)).powf(0.5);

    Ok(numerator / denominator) // returns nan if either variance is 0
}

/// Calculates the pairwise Pearson correlation matrix across a set of
/// recorded channels, each inner slice is one channel's samples, all
/// channels must have the same length
pub fn correlation_matrix(channels: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, TimeSeriesProcessingError> {
    let mut matrix = vec![vec![0.; channels.len()]; channels.len()];

    for i in 0..channels.len() {
        for j in i..channels.len() {
            let coefficient = if i == j {
                1.
            } else {
                pearsonr(&channels[i], &channels[j])?
            };

            matrix[i][j] = coefficient;
            matrix[j][i] = coefficient;
        }
    }

    Ok(matrix)
}
