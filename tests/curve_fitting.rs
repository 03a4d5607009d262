#[cfg(test)]
mod tests {
    use ephys_analysis::error::{FittingError, GeneticAlgorithmError};
    use ephys_analysis::fitting::{
        HillParameters, SigmoidParameters, fit_dose_response, fit_sigmoid, hill, sigmoid,
    };
    use ephys_analysis::ga::{BitString, GeneticAlgorithmParameters, decode};

    #[test]
    pub fn test_decode() -> Result<(), GeneticAlgorithmError> {
        let bitstring = BitString { string: String::from("1111111100000000") };
        let bounds = vec![(0., 1.), (0., 1.)];

        let decoded = decode(&bitstring, &bounds, 8)?;

        assert_eq!(decoded.len(), 2);
        assert!((decoded[0] - 1.).abs() < 1e-6);
        assert!(decoded[1].abs() < 1e-6);

        Ok(())
    }

    #[test]
    pub fn test_decode_invalid_input() {
        let bitstring = BitString { string: String::from("1111111100000000") };

        let result = decode(&bitstring, &[(0., 1.)], 8);
        assert!(matches!(result, Err(GeneticAlgorithmError::InvalidBoundsLength)));

        let result = decode(&bitstring, &[(0., 1.), (0., 1.)], 3);
        assert!(matches!(result, Err(GeneticAlgorithmError::InvalidBitstringLength)));
    }

    #[test]
    pub fn test_decode_rejects_too_many_bits() {
        let bitstring = BitString { string: "1".repeat(32) };

        let result = decode(&bitstring, &[(0., 1.)], 32);
        assert!(matches!(result, Err(GeneticAlgorithmError::InvalidBitstringLength)));
    }

    #[test]
    pub fn test_sigmoid_evaluation() {
        let params = SigmoidParameters { midpoint: 0., slope: 1., max_response: 1. };

        assert!((sigmoid(0., &params) - 0.5).abs() < 1e-6);
        assert!(sigmoid(10., &params) > 0.99);
        assert!(sigmoid(-10., &params) < 0.01);
    }

    #[test]
    pub fn test_hill_evaluation() {
        let params = HillParameters { ec50: 3., hill_slope: 1., max_response: 100. };

        assert!((hill(3., &params) - 50.).abs() < 1e-4);
        assert!(hill(300., &params) > 99.);
        assert!(hill(0.03, &params) < 1.);
    }

    #[test]
    pub fn test_fit_sigmoid_recovers_curve() -> Result<(), FittingError> {
        let true_params = SigmoidParameters { midpoint: 0.5, slope: 1., max_response: 1. };

        let inputs: Vec<f32> = (0..50).map(|i| -5. + 0.2 * i as f32).collect();
        let outputs: Vec<f32> = inputs.iter().map(|&x| sigmoid(x, &true_params)).collect();

        let ga_params = GeneticAlgorithmParameters {
            n_iter: 100,
            n_pop: 100,
            ..GeneticAlgorithmParameters::default()
        };

        let (fit, score) = fit_sigmoid(&inputs, &outputs, &ga_params, false)?;

        assert!(score < 1.);
        for (&x, &y) in inputs.iter().zip(outputs.iter()) {
            assert!((sigmoid(x, &fit) - y).abs() < 0.2);
        }

        Ok(())
    }

    #[test]
    pub fn test_fit_dose_response_recovers_curve() -> Result<(), FittingError> {
        let true_params = HillParameters { ec50: 3., hill_slope: 1., max_response: 100. };

        let doses: Vec<f32> = vec![0.1, 0.3, 1., 3., 10., 30., 100.];
        let responses: Vec<f32> = doses.iter().map(|&dose| hill(dose, &true_params)).collect();

        let ga_params = GeneticAlgorithmParameters {
            n_iter: 100,
            n_pop: 100,
            ..GeneticAlgorithmParameters::default()
        };

        let (fit, _score) = fit_dose_response(&doses, &responses, &ga_params, false)?;

        for (&dose, &response) in doses.iter().zip(responses.iter()) {
            assert!((hill(dose, &fit) - response).abs() < 20.);
        }

        Ok(())
    }

    #[test]
    pub fn test_fit_input_validation() {
        let ga_params = GeneticAlgorithmParameters::default();

        let result = fit_sigmoid(&[1., 2.], &[1.], &ga_params, false);
        assert!(matches!(result, Err(FittingError::SeriesAreNotSameLength)));

        let result = fit_sigmoid(&[], &[], &ga_params, false);
        assert!(matches!(result, Err(FittingError::EmptyData)));

        let result = fit_dose_response(&[0., 1.], &[0., 1.], &ga_params, false);
        assert!(matches!(result, Err(FittingError::NonPositiveDose)));
    }

    #[test]
    pub fn test_fit_rejects_incomplete_bounds() {
        // bounds must cover the midpoint, slope, and maximal response
        let ga_params = GeneticAlgorithmParameters {
            bounds: vec![(0., 1.), (0., 1.)],
            ..GeneticAlgorithmParameters::default()
        };

        let result = fit_sigmoid(&[0., 1., 2.], &[0., 0.5, 1.], &ga_params, false);
        assert!(matches!(
            result,
            Err(FittingError::GeneticAlgorithmRelatedError(
                GeneticAlgorithmError::InvalidBoundsLength
            ))
        ));

        let result = fit_dose_response(&[1., 2., 3.], &[0., 0.5, 1.], &ga_params, false);
        assert!(matches!(
            result,
            Err(FittingError::GeneticAlgorithmRelatedError(
                GeneticAlgorithmError::InvalidBoundsLength
            ))
        ));
    }
}
