//! A set of tools to preprocess intracellular voltage traces and detect
//! action potentials, interspike intervals, and firing rate changes.

use std::result::Result;
use std::f32::consts::PI;
use crate::error::TimeSeriesProcessingError;


fn diff(x: &[f32]) -> Vec<f32> {
    (1..x.len()).map(|i| x[i] - x[i - 1])
        .collect()
}

/// Removes the least squares linear trend from a trace
pub fn detrend(trace: &[f32]) -> Vec<f32> {
    let n = trace.len();
    if n < 2 {
        return trace.to_vec();
    }

    let t_mean = (n - 1) as f32 / 2.;
    let x_mean = trace.iter().sum::<f32>() / n as f32;

    let mut numerator = 0.;
    let mut denominator = 0.;
    for (i, x) in trace.iter().enumerate() {
        let t_centered = i as f32 - t_mean;
        numerator += t_centered * (x - x_mean);
        denominator += t_centered * t_centered;
    }

    let slope = numerator / denominator;
    let intercept = x_mean - slope * t_mean;

    trace.iter()
        .enumerate()
        .map(|(i, x)| x - (slope * i as f32 + intercept))
        .collect()
}

/// Applies a second order bandpass filter between the given corner
/// frequencies (Hz) as a single causal forward pass
pub fn bandpass_filter(
    trace: &[f32],
    sampling_rate: f32,
    freq_min: f32,
    freq_max: f32,
) -> Vec<f32> {
    // center frequency and quality factor from the corner frequencies
    let f0 = (freq_min * freq_max).sqrt();
    let q = f0 / (freq_max - freq_min);

    let omega = 2. * PI * f0 / sampling_rate;
    let alpha = omega.sin() / (2. * q);

    let a0 = 1. + alpha;
    let b0 = alpha / a0;
    let b2 = -alpha / a0;
    let a1 = (-2. * omega.cos()) / a0;
    let a2 = (1. - alpha) / a0;

    let mut output = Vec::with_capacity(trace.len());

    let (mut x1, mut x2) = (0., 0.);
    let (mut y1, mut y2) = (0., 0.);
    for &x in trace.iter() {
        let y = b0 * x + b2 * x2 - a1 * y1 - a2 * y2;

        x2 = x1;
        x1 = x;
        y2 = y1;
        y1 = y;

        output.push(y);
    }

    output
}

/// Detrends and bandpass filters a raw trace, set `detrend_trace` to `false`
/// to only filter
pub fn preprocess_trace(
    trace: &[f32],
    sampling_rate: f32,
    detrend_trace: bool,
    freq_min: f32,
    freq_max: f32,
) -> Vec<f32> {
    if detrend_trace {
        bandpass_filter(&detrend(trace), sampling_rate, freq_min, freq_max)
    } else {
        bandpass_filter(trace, sampling_rate, freq_min, freq_max)
    }
}

/// Returns indices of local maxima above `min_height`, a plateau of equal
/// values is reported at its rightmost sample
pub fn find_peaks(trace: &[f32], min_height: f32) -> Vec<usize> {
    let mut peaks = Vec::new();

    for i in 1..trace.len().saturating_sub(1) {
        if trace[i] > min_height && trace[i] >= trace[i - 1] && trace[i] > trace[i + 1] {
            peaks.push(i);
        }
    }

    peaks
}

/// Detects action potentials as local maxima above a voltage threshold (mV),
/// returns spike times (s), errors if the trace is empty
pub fn detect_action_potentials(
    trace: &[f32],
    sampling_rate: f32,
    threshold: f32,
) -> Result<Vec<f32>, TimeSeriesProcessingError> {
    if trace.is_empty() {
        return Err(TimeSeriesProcessingError::SeriesIsEmpty);
    }

    Ok(
        find_peaks(trace, threshold).iter()
            .map(|&i| i as f32 / sampling_rate)
            .collect()
    )
}

/// Computes interspike intervals (ms) from ordered spike times (s)
pub fn interspike_intervals(spike_times: &[f32]) -> Vec<f32> {
    diff(spike_times).iter()
        .map(|interval| interval * 1000.)
        .collect()
}

/// Computes the firing rate (Hz) of a trace as the number of local maxima
/// over the trace duration, errors if the trace is empty
pub fn firing_rate(trace: &[f32], sampling_rate: f32) -> Result<f32, TimeSeriesProcessingError> {
    if trace.is_empty() {
        return Err(TimeSeriesProcessingError::SeriesIsEmpty);
    }

    let num_peaks = find_peaks(trace, f32::MIN).len();

    Ok(num_peaks as f32 * sampling_rate / trace.len() as f32)
}

/// Compares firing rates before and after a treatment is applied given two
/// time windows in seconds, returns the baseline rate and treatment rate (Hz),
/// errors if either window is empty or falls outside of the trace
pub fn detect_firing_rate_change(
    trace: &[f32],
    sampling_rate: f32,
    baseline_period: (f32, f32),
    treatment_period: (f32, f32),
) -> Result<(f32, f32), TimeSeriesProcessingError> {
    let to_window = |period: (f32, f32)| -> Result<(usize, usize), TimeSeriesProcessingError> {
        let start = (period.0 * sampling_rate) as usize;
        let end = (period.1 * sampling_rate) as usize;

        if start >= end || end > trace.len() {
            return Err(TimeSeriesProcessingError::WindowOutOfBounds);
        }

        Ok((start, end))
    };

    let (baseline_start, baseline_end) = to_window(baseline_period)?;
    let (treatment_start, treatment_end) = to_window(treatment_period)?;

    let baseline_rate = firing_rate(&trace[baseline_start..baseline_end], sampling_rate)?;
    let treatment_rate = firing_rate(&trace[treatment_start..treatment_end], sampling_rate)?;

    Ok((baseline_rate, treatment_rate))
}
