//! A set of tools to analyze power spectral density for extracellular
//! and intracellular recordings.

use std::result::Result;
use ndarray::{Array1, s};
use num_complex::Complex;
use rustfft::{FftPlanner, FftDirection};
mod emd;
use emd::earth_movers_distance;
use crate::error::TimeSeriesProcessingError;


/// Retrieves the power density of the given time series based on the given
/// timestep (ms) and total time elapsed by the end of the series (ms),
/// returns a tuple of the frequency axis and the one sided power spectrum,
/// errors if the series is empty
pub fn get_power_density(
    x: &[f64],
    dt: f64,
    total_time: f64,
) -> Result<(Array1<f64>, Array1<f64>), TimeSeriesProcessingError> {
    if x.is_empty() {
        return Err(TimeSeriesProcessingError::SeriesIsEmpty);
    }

    let x_mean = x.iter().sum::<f64>() / x.len() as f64;

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft(x.len(), FftDirection::Forward);

    let mut x_fft: Vec<Complex<f64>> = x.iter()
        .map(|&x_i| Complex::new(x_i - x_mean, 0.0))
        .collect();
    fft.process(&mut x_fft);

    let x_fft_array: Array1<Complex<f64>> = x_fft.into();

    let sxx: Array1<Complex<f64>> = x_fft_array.mapv(|val| {
        let conj = val.conj();
        2.0 * dt.powi(2) / (x.len() as f64 * dt) * (val * conj)
    });

    let sxx_positive = sxx.slice(s![0..(x.len() / 2)]);
    let sxx_positive = sxx_positive.mapv(|val| val.re);

    let df: f64 = 1.0 / total_time;

    let fnq: f64 = 1.0 / (2.0 * dt);

    let faxis: Array1<f64> = Array1::range(0.0, fnq, df);

    Ok((faxis, sxx_positive.to_owned()))
}

fn find_max(arr: &Array1<f64>) -> Option<&f64> {
    arr.iter().max_by(|a, b| a.total_cmp(b))
}

/// Compares two power density spectra (e.g. baseline versus drug
/// application) using the earth mover's distance scaled by the squared
/// difference in peak power, assumes the same frequency range for both
/// arguments, (only compares the second item of [`get_power_density`])
pub fn power_density_comparison(
    sxx1: &Array1<f64>,
    sxx2: &Array1<f64>,
) -> Result<f64, TimeSeriesProcessingError> {
    if sxx1.len() != sxx2.len() {
        return Err(TimeSeriesProcessingError::SeriesAreNotSameLength);
    }
    if sxx1.is_empty() {
        return Err(TimeSeriesProcessingError::SeriesIsEmpty);
    }

    let values = (0..sxx1.len()).map(|x| x as f64)
        .collect::<Vec<f64>>();

    let u_values = Array1::from(values.clone());
    let v_values = Array1::from(values);

    let u_max = *find_max(sxx1).unwrap_or(&1.);
    let v_max = *find_max(sxx2).unwrap_or(&1.);

    let u_weights = sxx1.map(|x| x / u_max);
    let v_weights = sxx2.map(|x| x / v_max);

    // scale earth mover's distance based on heights
    Ok(earth_movers_distance(u_values, v_values, u_weights, v_weights) * (u_max - v_max).powf(2.))
}

/// Sums the power spectral density over a frequency band (Hz), band edges
/// outside of the frequency axis contribute nothing, errors on length mismatch
pub fn band_power(
    faxis: &Array1<f64>,
    sxx: &Array1<f64>,
    freq_min: f64,
    freq_max: f64,
) -> Result<f64, TimeSeriesProcessingError> {
    if faxis.len() < sxx.len() {
        return Err(TimeSeriesProcessingError::SeriesAreNotSameLength);
    }

    Ok(
        sxx.iter()
            .zip(faxis.iter())
            .filter(|(_, &freq)| freq >= freq_min && freq <= freq_max)
            .map(|(power, _)| power)
            .sum()
    )
}
