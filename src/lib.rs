//! # Electrophysiology Analysis
//!
//! `ephys_analysis` is a package for analyzing in-vitro electrophysiology
//! recordings and simulating voltage gated ion channel kinetics. It covers
//! the analyses used across classic intracellular and multi-electrode array
//! experiments: computing the net ionic current produced by Hodgkin-Huxley
//! style conductances over a voltage trace, detecting action potentials and
//! interspike intervals, quantifying firing rate changes under
//! pharmacological treatment, fitting synaptic input/output and
//! dose-response curves, building correlation based connectivity graphs
//! with centrality metrics, and estimating power spectral density.
//!
//! ## Example Code
//!
//! ### Simulating channel currents over a voltage sweep
//!
//! ```rust
//! use ephys_analysis::channel::{
//!     ChannelSimulationParameters, channel_currents, voltage_sweep,
//! };
//!
//!
//! // current-voltage relationship of the fast transient and delayed
//! // rectifier conductances from rest up to spiking range
//! let voltages = voltage_sweep(-80., 59., 1.);
//! let params = ChannelSimulationParameters::default();
//!
//! let currents = channel_currents("hodgkin_huxley", &voltages, &params)
//!     .expect("Model selector is supported");
//!
//! assert_eq!(currents.len(), voltages.len());
//!
//! // unsupported kinetics models are rejected
//! assert!(channel_currents("markov_chain", &voltages, &params).is_err());
//! ```
//!
//! ### Detecting action potentials and interspike intervals
//!
//! ```rust
//! use ephys_analysis::trace::{detect_action_potentials, interspike_intervals};
//!
//!
//! let mut trace = vec![-65.; 3000];
//! // three depolarizations crossing threshold
//! for &spike_at in [500_usize, 1500, 2500].iter() {
//!     trace[spike_at] = 30.;
//! }
//!
//! let spike_times = detect_action_potentials(&trace, 10_000., -30.)
//!     .expect("Trace is non-empty");
//! let intervals = interspike_intervals(&spike_times);
//!
//! assert_eq!(spike_times.len(), 3);
//! assert_eq!(intervals.len(), 2);
//! ```
//!
//! ### Building a connectivity graph from recorded channels
//!
//! ```rust
//! use ephys_analysis::correlation::correlation_matrix;
//! use ephys_analysis::graph::{from_connectivity_matrix, node_degrees};
//!
//!
//! let channels = vec![
//!     vec![0., 1., 0., 1., 0., 1.],
//!     vec![0., 1., 0., 1., 0., 1.],
//!     vec![1., 0., 0., 1., 1., 0.],
//! ];
//!
//! let matrix = correlation_matrix(&channels).expect("Channels have equal lengths");
//! let graph = from_connectivity_matrix(&matrix, 0.5).expect("Matrix is square");
//!
//! let degrees = node_degrees(&graph).expect("Nodes are present");
//! assert_eq!(degrees[&0], 1);
//! assert_eq!(degrees[&2], 0);
//! ```

pub mod channel;
pub mod correlation;
pub mod distribution;
pub mod error;
pub mod fitting;
pub mod ga;
pub mod graph;
pub mod spectral;
pub mod trace;
