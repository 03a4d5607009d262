//! A set of tools to fit synaptic input/output and pharmacological
//! dose-response curves to recorded data.

use std::{
    collections::HashMap,
    result::Result,
};
use crate::error::{FittingError, GeneticAlgorithmError};
use crate::ga::{BitString, decode, genetic_algo, GeneticAlgorithmParameters};


/// Parameters of a sigmoid input/output curve,
/// `max_response / (1 + exp(-(x - midpoint) / slope))`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SigmoidParameters {
    /// Input at half maximal output
    pub midpoint: f32,
    /// Steepness of the transition
    pub slope: f32,
    /// Saturating output
    pub max_response: f32,
}

/// Evaluates the sigmoid input/output curve at the given input
pub fn sigmoid(x: f32, params: &SigmoidParameters) -> f32 {
    params.max_response / (1. + ((-(x - params.midpoint)) / params.slope).exp())
}

/// Parameters of a Hill dose-response curve,
/// `max_response / (1 + (ec50 / dose) ^ hill_slope)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HillParameters {
    /// Dose producing half maximal response
    pub ec50: f32,
    /// Hill coefficient
    pub hill_slope: f32,
    /// Saturating response
    pub max_response: f32,
}

/// Evaluates the Hill dose-response curve at the given dose
pub fn hill(dose: f32, params: &HillParameters) -> f32 {
    params.max_response / (1. + (params.ec50 / dose).powf(params.hill_slope))
}

#[derive(Clone, Copy)]
enum CurveModel {
    Sigmoid,
    Hill,
}

#[derive(Clone)]
struct CurveFitSettings {
    xs: Vec<f32>,
    ys: Vec<f32>,
    model: CurveModel,
}

// sum of squared residuals, not a number scores count as the worst possible
fn curve_objective(
    bitstring: &BitString,
    bounds: &[(f32, f32)],
    n_bits: usize,
    settings: &HashMap<&str, CurveFitSettings>,
) -> Result<f32, GeneticAlgorithmError> {
    let settings = match settings.get("settings") {
        Some(value) => value,
        None => {
            return Err(
                GeneticAlgorithmError::ObjectiveFunctionFailure(
                    String::from("Curve fit settings could not be found")
                )
            );
        },
    };

    let decoded = decode(bitstring, bounds, n_bits)?;

    let score: f32 = settings.xs.iter()
        .zip(settings.ys.iter())
        .map(|(&x, &y)| {
            let predicted = match settings.model {
                CurveModel::Sigmoid => sigmoid(
                    x,
                    &SigmoidParameters {
                        midpoint: decoded[0], slope: decoded[1], max_response: decoded[2],
                    },
                ),
                CurveModel::Hill => hill(
                    x,
                    &HillParameters {
                        ec50: decoded[0], hill_slope: decoded[1], max_response: decoded[2],
                    },
                ),
            };

            (predicted - y).powf(2.)
        })
        .sum();

    if score.is_nan() {
        Ok(f32::INFINITY)
    } else {
        Ok(score)
    }
}

fn get_f32_max(x: &[f32]) -> Option<&f32> {
    x.iter()
        .max_by(|a, b| a.total_cmp(b))
}

fn get_f32_min(x: &[f32]) -> Option<&f32> {
    x.iter()
        .min_by(|a, b| a.total_cmp(b))
}

fn check_series(xs: &[f32], ys: &[f32]) -> Result<(), FittingError> {
    if xs.len() != ys.len() {
        return Err(FittingError::SeriesAreNotSameLength);
    }
    if xs.is_empty() {
        return Err(FittingError::EmptyData);
    }

    Ok(())
}

// caller supplied bounds must cover all three curve parameters
fn check_bounds(bounds: &[(f32, f32)]) -> Result<(), FittingError> {
    if !bounds.is_empty() && bounds.len() != 3 {
        return Err(GeneticAlgorithmError::InvalidBoundsLength.into());
    }

    Ok(())
}

fn fit_curve(
    xs: &[f32],
    ys: &[f32],
    model: CurveModel,
    bounds: Vec<(f32, f32)>,
    ga_params: &GeneticAlgorithmParameters,
    verbose: bool,
) -> Result<(Vec<f32>, f32), FittingError> {
    let mut params = ga_params.clone();
    params.bounds = bounds;

    let settings = CurveFitSettings {
        xs: xs.to_vec(),
        ys: ys.to_vec(),
        model,
    };

    let mut settings_map: HashMap<&str, CurveFitSettings> = HashMap::new();
    settings_map.insert("settings", settings);

    let (best_bitstring, best_score, _scores) = genetic_algo(
        curve_objective,
        &params,
        &settings_map,
        verbose,
    )?;

    let decoded = decode(&best_bitstring, &params.bounds, params.n_bits)?;

    Ok((decoded, best_score))
}

/// Fits a sigmoid input/output curve to the given synaptic input and output
/// series by minimizing the sum of squared residuals over a bounded
/// parameter box, returns the fitted parameters and the residual score
///
/// if `ga_params.bounds` is empty, bounds are derived from the data
/// (midpoint within the input range, slope up to the input range,
/// maximal response up to twice the largest output), otherwise the given
/// bounds are used as midpoint, slope, and maximal response respectively
/// and must cover all three parameters, set `verbose` to `true` to print
/// optimizer progress
pub fn fit_sigmoid(
    inputs: &[f32],
    outputs: &[f32],
    ga_params: &GeneticAlgorithmParameters,
    verbose: bool,
) -> Result<(SigmoidParameters, f32), FittingError> {
    check_series(inputs, outputs)?;
    check_bounds(&ga_params.bounds)?;

    let bounds = if ga_params.bounds.is_empty() {
        let x_min = *get_f32_min(inputs).unwrap_or(&0.);
        let x_max = *get_f32_max(inputs).unwrap_or(&1.);
        let y_max = *get_f32_max(outputs).unwrap_or(&1.);

        let x_range = (x_max - x_min).max(1e-3);

        vec![
            (x_min, x_max),
            (x_range / 100., x_range),
            (0., 2. * y_max.max(1e-3)),
        ]
    } else {
        ga_params.bounds.clone()
    };

    let (decoded, score) = fit_curve(inputs, outputs, CurveModel::Sigmoid, bounds, ga_params, verbose)?;

    Ok((
        SigmoidParameters {
            midpoint: decoded[0],
            slope: decoded[1],
            max_response: decoded[2],
        },
        score,
    ))
}

/// Fits a Hill dose-response curve to the given dose and response series by
/// minimizing the sum of squared residuals over a bounded parameter box,
/// returns the fitted parameters and the residual score, all doses must
/// be positive
///
/// if `ga_params.bounds` is empty, bounds are derived from the data
/// (half maximal dose within the dose range, Hill coefficient in [0.1, 10],
/// maximal response up to twice the largest response), otherwise the given
/// bounds are used as half maximal dose, Hill coefficient, and maximal
/// response respectively and must cover all three parameters, set `verbose`
/// to `true` to print optimizer progress
pub fn fit_dose_response(
    doses: &[f32],
    responses: &[f32],
    ga_params: &GeneticAlgorithmParameters,
    verbose: bool,
) -> Result<(HillParameters, f32), FittingError> {
    check_series(doses, responses)?;
    check_bounds(&ga_params.bounds)?;

    if doses.iter().any(|&dose| dose <= 0.) {
        return Err(FittingError::NonPositiveDose);
    }

    let bounds = if ga_params.bounds.is_empty() {
        let dose_min = *get_f32_min(doses).unwrap_or(&1e-3);
        let dose_max = *get_f32_max(doses).unwrap_or(&1.);
        let response_max = *get_f32_max(responses).unwrap_or(&1.);

        vec![
            (dose_min, dose_max),
            (0.1, 10.),
            (0., 2. * response_max.max(1e-3)),
        ]
    } else {
        ga_params.bounds.clone()
    };

    let (decoded, score) = fit_curve(doses, responses, CurveModel::Hill, bounds, ga_params, verbose)?;

    Ok((
        HillParameters {
            ec50: decoded[0],
            hill_slope: decoded[1],
            max_response: decoded[2],
        },
        score,
    ))
}
