//! A binary encoded genetic algorithm used as the optimizer for
//! curve fitting routines.

use std::{
    collections::HashMap,
    marker::Sync,
    result::Result,
};
use rand::Rng;
use rayon::prelude::*;
use crate::error::GeneticAlgorithmError;


/// A binary string encoding a set of bounded parameters
#[derive(Clone)]
pub struct BitString {
    pub string: String,
}

impl BitString {
    fn check(&self) -> Result<(), GeneticAlgorithmError> {
        for i in self.string.chars() {
            if i != '1' && i != '0' {
                return Err(GeneticAlgorithmError::NonBinaryInBitstring(self.string.clone()));
            }
        }

        Ok(())
    }

    fn set(&mut self, new_string: String) -> Result<(), GeneticAlgorithmError> {
        self.string = new_string;

        self.check()
    }

    fn length(&self) -> usize {
        self.string.len()
    }
}

/// Hyperparameters for the genetic algorithm
#[derive(Clone)]
pub struct GeneticAlgorithmParameters {
    /// Lower and upper bound per parameter
    pub bounds: Vec<(f32, f32)>,
    /// Number of bits encoding each parameter
    pub n_bits: usize,
    /// Number of generations
    pub n_iter: usize,
    /// Population size (must be even)
    pub n_pop: usize,
    /// Crossover rate
    pub r_cross: f32,
    /// Mutation rate
    pub r_mut: f32,
    /// Tournament selection size
    pub k: usize,
}

impl Default for GeneticAlgorithmParameters {
    fn default() -> Self {
        GeneticAlgorithmParameters {
            bounds: vec![],
            n_bits: 16,
            n_iter: 100,
            n_pop: 100,
            r_cross: 0.9,
            r_mut: 0.05,
            k: 3,
        }
    }
}

fn crossover(
    parent1: &BitString,
    parent2: &BitString,
    r_cross: f32,
) -> Result<(BitString, BitString), GeneticAlgorithmError> {
    let mut rng_thread = rand::thread_rng();
    let (mut clone1, mut clone2) = (parent1.clone(), parent2.clone());

    if rng_thread.gen::<f32>() <= r_cross {
        let crossover_point = rng_thread.gen_range(1..parent1.length());

        let string1 = format!(
            "{}{}", &parent1.string[0..crossover_point], &parent2.string[crossover_point..]
        );
        let string2 = format!(
            "{}{}", &parent2.string[0..crossover_point], &parent1.string[crossover_point..]
        );

        clone1.set(string1)?;
        clone2.set(string2)?;
    }

    Ok((clone1, clone2))
}

fn mutate(bitstring: &mut BitString, r_mut: f32) {
    let mut rng_thread = rand::thread_rng();

    let mutated = bitstring.string.chars()
        .map(|bit| {
            if rng_thread.gen::<f32>() <= r_mut {
                if bit == '1' { '0' } else { '1' }
            } else {
                bit
            }
        })
        .collect();

    bitstring.string = mutated;
}

// tournament selection to select parents
fn selection(pop: &[BitString], scores: &[f32], k: usize) -> BitString {
    let mut rng_thread = rand::thread_rng();
    let mut selection_index = rng_thread.gen_range(0..pop.len());

    let indices = (0..k.saturating_sub(1))
        .map(|_| rng_thread.gen_range(0..pop.len()))
        .collect::<Vec<usize>>();

    for i in indices {
        if scores[i] < scores[selection_index] {
            selection_index = i;
        }
    }

    pop[selection_index].clone()
}

/// Decodes a bitstring into one value per bound scaled to within that bound,
/// `n_bits` is the number of bits per parameter (1 to 31)
pub fn decode(
    bitstring: &BitString,
    bounds: &[(f32, f32)],
    n_bits: usize,
) -> Result<Vec<f32>, GeneticAlgorithmError> {
    if n_bits == 0 || n_bits > 31 || bitstring.length() % n_bits != 0 {
        return Err(GeneticAlgorithmError::InvalidBitstringLength);
    }
    if bounds.len() != bitstring.length() / n_bits {
        return Err(GeneticAlgorithmError::InvalidBoundsLength);
    }

    let maximum = u32::pow(2, n_bits as u32) as f32 - 1.;
    let mut decoded_vec = vec![0.; bounds.len()];

    for (i, (lower, upper)) in bounds.iter().enumerate() {
        let (start, end) = (i * n_bits, (i * n_bits) + n_bits);
        let substring = &bitstring.string[start..end];

        let value = match u32::from_str_radix(substring, 2) {
            Ok(value_result) => value_result as f32,
            Err(_e) => return Err(
                GeneticAlgorithmError::NonBinaryInBitstring(substring.to_string())
            ),
        };

        decoded_vec[i] = value * (upper - lower) / maximum + lower;
    }

    Ok(decoded_vec)
}

fn create_random_string(length: usize) -> BitString {
    let mut rng_thread = rand::thread_rng();

    let random_string = (0..length)
        .map(|_| if rng_thread.gen::<f32>() <= 0.5 { '0' } else { '1' })
        .collect();

    BitString { string: random_string }
}

/// Minimizes the given objective function over the parameter bounds in
/// `params`, returns the best bitstring found, its score, and the scores of
/// every generation, `settings` is passed through to the objective on
/// every call, set `verbose` to `true` to print progress per generation
///
/// objective scores are calculated in parallel across the population
pub fn genetic_algo<T: Sync>(
    f: fn(&BitString, &[(f32, f32)], usize, &HashMap<&str, T>) -> Result<f32, GeneticAlgorithmError>,
    params: &GeneticAlgorithmParameters,
    settings: &HashMap<&str, T>,
    verbose: bool,
) -> Result<(BitString, f32, Vec<Vec<f32>>), GeneticAlgorithmError> {
    if params.n_pop == 0 || params.n_pop % 2 != 0 {
        return Err(GeneticAlgorithmError::InvalidPopulationSize);
    }

    let mut pop: Vec<BitString> = (0..params.n_pop)
        .map(|_| create_random_string(params.n_bits * params.bounds.len()))
        .collect();

    let mut best = pop[0].clone();
    let mut best_eval = f(&pop[0], &params.bounds, params.n_bits, settings)?;

    let mut all_scores = vec![];

    for gen in 0..params.n_iter {
        if verbose {
            println!("gen: {}", gen + 1);
        }

        let scores_results: Result<Vec<f32>, GeneticAlgorithmError> = pop
            .par_iter()
            .map(|p| f(p, &params.bounds, params.n_bits, settings))
            .collect();

        // check if objective failed anywhere
        let scores = scores_results?;

        all_scores.push(scores.clone());

        for i in 0..params.n_pop {
            if scores[i] < best_eval {
                best = pop[i].clone();
                best_eval = scores[i];

                if verbose {
                    println!("new string: {}, score: {}", &pop[i].string, &scores[i]);
                }
            }
        }

        let selected: Vec<BitString> = (0..params.n_pop)
            .map(|_| selection(&pop, &scores, params.k))
            .collect();

        let children = (0..params.n_pop)
            .step_by(2)
            .map(|i| crossover(&selected[i], &selected[i + 1], params.r_cross))
            .collect::<Result<Vec<(BitString, BitString)>, GeneticAlgorithmError>>()?
            .into_iter()
            .flat_map(|(child1, child2)| [child1, child2])
            .map(|mut child| {
                mutate(&mut child, params.r_mut);
                child
            })
            .collect();

        pop = children;
    }

    Ok((best, best_eval, all_scores))
}
