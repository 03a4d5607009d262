//! Voltage-gated ion channel kinetics, used to compute the net transmembrane
//! current produced by a fast transient and a delayed rectifier conductance
//! across a recorded or simulated voltage trace.

use std::result::Result;
use crate::error::ChannelModelError;


/// A gating variable with voltage dependent opening and closing rates
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicGatingVariable {
    /// Opening rate
    pub alpha: f32,
    /// Closing rate
    pub beta: f32,
    /// Fraction of open gates (0 to 1)
    pub state: f32,
}

impl BasicGatingVariable {
    /// Sets the gate to its steady state value given the current rates
    pub fn init_state(&mut self) {
        if self.alpha + self.beta != 0. {
            self.state = self.alpha / (self.alpha + self.beta);
        }
    }

    /// Advances the gate by one explicit Euler step, state is kept within [0, 1]
    pub fn update(&mut self, dt: f32) {
        let dstate = dt * (self.alpha * (1. - self.state) - self.beta * self.state);
        self.state = (self.state + dstate).clamp(0., 1.);
    }
}

// x / (1 - exp(-x)) with the removable singularity at x = 0 replaced
// by its first order expansion
fn rate_ratio(x: f32) -> f32 {
    if x.abs() < 1e-4 {
        1. + x / 2.
    } else {
        x / (1. - (-x).exp())
    }
}

/// Handles gating dynamics and current output of a voltage gated ion channel
pub trait IonChannel: Clone + Send + Sync {
    /// Advances gating variables by one timestep given a voltage (mV)
    fn update_gates(&mut self, voltage: f32, dt: f32);
    /// Updates the current output (nA) given a voltage (mV)
    fn update_current(&mut self, voltage: f32);
    /// Returns the current output (nA)
    fn get_current(&self) -> f32;
}

/// A fast transient sodium channel with activation and inactivation gates
#[derive(Debug, Clone, Copy)]
pub struct NaIonChannel {
    /// Maximal conductance (nS)
    pub g_na: f32,
    /// Reversal potential (mV)
    pub e_na: f32,
    /// Activation gate
    pub m: BasicGatingVariable,
    /// Inactivation gate
    pub h: BasicGatingVariable,
    /// Current output (nA)
    pub current: f32,
}

impl NaIonChannel {
    fn update_gating_variables(&mut self, voltage: f32) {
        self.m.alpha = rate_ratio((voltage + 40.) / 10.);
        self.m.beta = 4. * ((-(voltage + 65.)) / 18.).exp();
        self.h.alpha = 0.07 * ((-(voltage + 65.)) / 20.).exp();
        self.h.beta = 1. / (((-(voltage + 35.)) / 10.).exp() + 1.);
    }
}

impl IonChannel for NaIonChannel {
    fn update_gates(&mut self, voltage: f32, dt: f32) {
        self.update_gating_variables(voltage);

        self.m.update(dt);
        self.h.update(dt);
    }

    fn update_current(&mut self, voltage: f32) {
        self.current = self.g_na * self.m.state.powf(3.) * self.h.state * (voltage - self.e_na);
    }

    fn get_current(&self) -> f32 {
        self.current
    }
}

/// A delayed rectifier potassium channel with a single activation gate
#[derive(Debug, Clone, Copy)]
pub struct KIonChannel {
    /// Maximal conductance (nS)
    pub g_k: f32,
    /// Reversal potential (mV)
    pub e_k: f32,
    /// Activation gate
    pub n: BasicGatingVariable,
    /// Current output (nA)
    pub current: f32,
}

impl KIonChannel {
    fn update_gating_variables(&mut self, voltage: f32) {
        self.n.alpha = 0.1 * rate_ratio((voltage + 55.) / 10.);
        self.n.beta = 0.125 * ((-(voltage + 65.)) / 80.).exp();
    }
}

impl IonChannel for KIonChannel {
    fn update_gates(&mut self, voltage: f32, dt: f32) {
        self.update_gating_variables(voltage);

        self.n.update(dt);
    }

    fn update_current(&mut self, voltage: f32) {
        self.current = self.g_k * self.n.state.powf(4.) * (voltage - self.e_k);
    }

    fn get_current(&self) -> f32 {
        self.current
    }
}

/// Parameters for simulating channel currents across a voltage series,
/// both conductances deliberately share one maximal conductance and one
/// reversal potential
#[derive(Debug, Clone, Copy)]
pub struct ChannelSimulationParameters {
    /// Maximal conductance shared by both channels (nS)
    pub g_max: f32,
    /// Reversal potential shared by both channels (mV)
    pub e_rev: f32,
    /// Timestep (ms)
    pub dt: f32,
    /// Initial state of the fast transient activation gate
    pub m_init: f32,
    /// Initial state of the fast transient inactivation gate
    pub h_init: f32,
    /// Initial state of the delayed rectifier activation gate
    pub n_init: f32,
}

impl Default for ChannelSimulationParameters {
    fn default() -> Self {
        ChannelSimulationParameters {
            g_max: 120.,
            e_rev: -65.,
            dt: 0.01,
            m_init: 0.05,
            h_init: 0.6,
            n_init: 0.32,
        }
    }
}

/// Available ion channel kinetics models
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IonChannelModel {
    /// Fast transient and delayed rectifier conductances with
    /// Hodgkin-Huxley gating kinetics
    HodgkinHuxley,
}

impl IonChannelModel {
    /// Parses a model selector, any unrecognized selector errors
    /// with [`ChannelModelError::InvalidModel`]
    pub fn from_str(string: &str) -> Result<Self, ChannelModelError> {
        match string.to_ascii_lowercase().as_str() {
            "hodgkin_huxley" => Ok(IonChannelModel::HodgkinHuxley),
            _ => Err(ChannelModelError::InvalidModel(string.to_string())),
        }
    }
}

fn hodgkin_huxley_currents(voltages: &[f32], params: &ChannelSimulationParameters) -> Vec<f32> {
    let mut na_channel = NaIonChannel {
        g_na: params.g_max,
        e_na: params.e_rev,
        m: BasicGatingVariable { alpha: 0., beta: 0., state: params.m_init },
        h: BasicGatingVariable { alpha: 0., beta: 0., state: params.h_init },
        current: 0.,
    };
    let mut k_channel = KIonChannel {
        g_k: params.g_max,
        e_k: params.e_rev,
        n: BasicGatingVariable { alpha: 0., beta: 0., state: params.n_init },
        current: 0.,
    };

    let mut currents: Vec<f32> = Vec::with_capacity(voltages.len());

    for (i, voltage) in voltages.iter().enumerate() {
        // gating state at a given sample depends only on the state and
        // voltage at the previous sample, the first sample uses the
        // initial state directly
        if i > 0 {
            na_channel.update_gates(voltages[i - 1], params.dt);
            k_channel.update_gates(voltages[i - 1], params.dt);
        }

        na_channel.update_current(*voltage);
        k_channel.update_current(*voltage);

        currents.push(na_channel.get_current() + k_channel.get_current());
    }

    currents
}

/// Computes the net ionic current (nA) at each sample of a voltage series (mV)
/// given a kinetics model selector, output is the same length as the input,
/// errors with no output if the selector does not name a supported model
///
/// - `model` : kinetics model selector, currently only `"hodgkin_huxley"`
///
/// - `voltages` : ordered membrane potential samples (mV)
///
/// - `params` : conductance scale, reversal potential, timestep, and
///   initial gating state
pub fn channel_currents(
    model: &str,
    voltages: &[f32],
    params: &ChannelSimulationParameters,
) -> Result<Vec<f32>, ChannelModelError> {
    match IonChannelModel::from_str(model)? {
        IonChannelModel::HodgkinHuxley => Ok(hodgkin_huxley_currents(voltages, params)),
    }
}

/// Generates an inclusive voltage sweep (mV) from `start` to `end` in
/// increments of `step`, useful for building current-voltage curves
pub fn voltage_sweep(start: f32, end: f32, step: f32) -> Vec<f32> {
    let mut voltages = Vec::new();
    let mut v = start;

    while v <= end {
        voltages.push(v);
        v += step;
    }

    voltages
}
