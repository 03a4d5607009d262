#[cfg(test)]
mod tests {
    use ephys_analysis::trace::{
        bandpass_filter, detect_action_potentials, detect_firing_rate_change, detrend,
        find_peaks, firing_rate, interspike_intervals, preprocess_trace,
    };
    use ephys_analysis::error::TimeSeriesProcessingError;

    fn trace_with_peaks(length: usize, peak_indices: &[usize]) -> Vec<f32> {
        let mut trace = vec![-65.; length];
        for &i in peak_indices {
            trace[i] = 30.;
        }

        trace
    }

    #[test]
    pub fn test_find_peaks() {
        let trace = vec![0., 1., 0., 2., 1., 3., 0.];

        assert_eq!(find_peaks(&trace, f32::MIN), vec![1, 3, 5]);
        assert_eq!(find_peaks(&trace, 1.5), vec![3, 5]);
        assert_eq!(find_peaks(&trace, 10.), Vec::<usize>::new());

        // endpoints are never peaks
        assert_eq!(find_peaks(&[5., 0., 5.], f32::MIN), Vec::<usize>::new());
    }

    #[test]
    pub fn test_detect_action_potentials() -> Result<(), TimeSeriesProcessingError> {
        let trace = trace_with_peaks(3000, &[500, 1500, 2500]);

        let spike_times = detect_action_potentials(&trace, 10_000., -30.)?;

        assert_eq!(spike_times.len(), 3);
        assert!((spike_times[0] - 0.05).abs() < 1e-6);
        assert!((spike_times[2] - 0.25).abs() < 1e-6);

        assert!(detect_action_potentials(&[], 10_000., -30.).is_err());

        Ok(())
    }

    #[test]
    pub fn test_interspike_intervals() {
        let intervals = interspike_intervals(&[0.1, 0.2, 0.4]);

        assert_eq!(intervals.len(), 2);
        assert!((intervals[0] - 100.).abs() < 1e-2);
        assert!((intervals[1] - 200.).abs() < 1e-2);

        assert!(interspike_intervals(&[0.5]).is_empty());
        assert!(interspike_intervals(&[]).is_empty());
    }

    #[test]
    pub fn test_firing_rate() -> Result<(), TimeSeriesProcessingError> {
        // 5 spikes over 1 second of recording
        let trace = trace_with_peaks(1000, &[100, 300, 500, 700, 900]);

        let rate = firing_rate(&trace, 1000.)?;
        assert!((rate - 5.).abs() < 1e-6);

        assert!(matches!(
            firing_rate(&[], 1000.),
            Err(TimeSeriesProcessingError::SeriesIsEmpty)
        ));

        Ok(())
    }

    #[test]
    pub fn test_firing_rate_change() -> Result<(), TimeSeriesProcessingError> {
        // 2 spikes in the baseline half, 3 after treatment
        let trace = trace_with_peaks(1000, &[100, 300, 600, 700, 800]);

        let (baseline_rate, treatment_rate) = detect_firing_rate_change(
            &trace, 1000., (0., 0.5), (0.5, 1.),
        )?;

        assert!((baseline_rate - 4.).abs() < 1e-6);
        assert!((treatment_rate - 6.).abs() < 1e-6);

        Ok(())
    }

    #[test]
    pub fn test_firing_rate_change_window_out_of_bounds() {
        let trace = trace_with_peaks(1000, &[100, 300]);

        let result = detect_firing_rate_change(&trace, 1000., (0., 0.5), (0.9, 2.));
        assert!(matches!(result, Err(TimeSeriesProcessingError::WindowOutOfBounds)));

        let result = detect_firing_rate_change(&trace, 1000., (0.5, 0.5), (0.5, 1.));
        assert!(matches!(result, Err(TimeSeriesProcessingError::WindowOutOfBounds)));
    }

    #[test]
    pub fn test_detrend_removes_linear_trend() {
        let trace: Vec<f32> = (0..100).map(|i| 0.5 * i as f32 + 3.).collect();

        let detrended = detrend(&trace);

        assert_eq!(detrended.len(), trace.len());
        for value in detrended {
            assert!(value.abs() < 1e-3);
        }
    }

    #[test]
    pub fn test_bandpass_rejects_constant_offset() {
        let trace = vec![1.; 2000];

        let filtered = bandpass_filter(&trace, 1000., 1., 100.);

        assert_eq!(filtered.len(), trace.len());
        // after the initial transient the output settles to zero
        for value in &filtered[1000..] {
            assert!(value.abs() < 1e-2);
        }
    }

    #[test]
    pub fn test_bandpass_passes_center_frequency() {
        use std::f32::consts::PI;

        let sampling_rate = 1000.;
        // 10 Hz sine is the geometric center of a 5 to 20 Hz band
        let trace: Vec<f32> = (0..4000)
            .map(|i| (2. * PI * 10. * i as f32 / sampling_rate).sin())
            .collect();

        let filtered = bandpass_filter(&trace, sampling_rate, 5., 20.);

        let steady_state_max = filtered[2000..].iter()
            .fold(0.0_f32, |acc, x| acc.max(x.abs()));
        assert!(steady_state_max > 0.5);
    }

    #[test]
    pub fn test_preprocess_trace_length() {
        let trace: Vec<f32> = (0..500).map(|i| (i as f32 * 0.1).sin() + 0.01 * i as f32).collect();

        let preprocessed = preprocess_trace(&trace, 1000., true, 1., 100.);
        assert_eq!(preprocessed.len(), trace.len());

        let unfiltered_trend = preprocess_trace(&trace, 1000., false, 1., 100.);
        assert_eq!(unfiltered_trend.len(), trace.len());
    }
}
