#[cfg(test)]
mod tests {
    use ephys_analysis::channel::{
        BasicGatingVariable, ChannelSimulationParameters, IonChannel, IonChannelModel,
        KIonChannel, NaIonChannel, channel_currents, voltage_sweep,
    };
    use ephys_analysis::error::ChannelModelError;

    #[test]
    pub fn test_output_length_matches_input() -> Result<(), ChannelModelError> {
        let params = ChannelSimulationParameters::default();

        for length in [1, 2, 140, 1000] {
            let voltages = vec![-65.; length];
            let currents = channel_currents("hodgkin_huxley", &voltages, &params)?;

            assert_eq!(currents.len(), length);
        }

        Ok(())
    }

    #[test]
    pub fn test_invalid_model_is_rejected() {
        let voltages = voltage_sweep(-80., 59., 1.);
        let params = ChannelSimulationParameters::default();

        let result = channel_currents("markov_chain", &voltages, &params);
        assert!(matches!(result, Err(ChannelModelError::InvalidModel(_))));

        assert!(IonChannelModel::from_str("hodgkin_huxley").is_ok());
        assert!(IonChannelModel::from_str("").is_err());
    }

    #[test]
    pub fn test_determinism() -> Result<(), ChannelModelError> {
        let voltages = voltage_sweep(-80., 59., 1.);
        let params = ChannelSimulationParameters::default();

        let first_run = channel_currents("hodgkin_huxley", &voltages, &params)?;
        let second_run = channel_currents("hodgkin_huxley", &voltages, &params)?;

        assert_eq!(first_run, second_run);

        Ok(())
    }

    #[test]
    pub fn test_current_voltage_curve_shape() -> Result<(), ChannelModelError> {
        let voltages = voltage_sweep(-80., 59., 1.);
        assert_eq!(voltages.len(), 140);

        let params = ChannelSimulationParameters {
            g_max: 120.,
            e_rev: -65.,
            dt: 0.01,
            ..ChannelSimulationParameters::default()
        };

        let currents = channel_currents("hodgkin_huxley", &voltages, &params)?;
        assert_eq!(currents.len(), 140);

        // inward (negative) below the reversal potential
        assert!(currents[0] < 0.);

        // zero crossing at the reversal potential, -65 mV is sample 15
        assert!(currents[15].abs() < 1e-3);

        // outward (positive) well above the reversal potential
        assert!(*currents.last().unwrap() > 0.);

        Ok(())
    }

    #[test]
    pub fn test_single_sample_uses_initial_state() -> Result<(), ChannelModelError> {
        let params = ChannelSimulationParameters::default();
        let voltage = -80.;

        let currents = channel_currents("hodgkin_huxley", &[voltage], &params)?;
        assert_eq!(currents.len(), 1);

        // no integration step occurs, only the fixed initial gating state
        let na_conductance = params.g_max * params.m_init.powf(3.) * params.h_init;
        let k_conductance = params.g_max * params.n_init.powf(4.);
        let expected = (na_conductance + k_conductance) * (voltage - params.e_rev);

        assert!((currents[0] - expected).abs() < 1e-3);

        Ok(())
    }

    #[test]
    pub fn test_gating_variables_stay_within_bounds() {
        let mut na_channel = NaIonChannel {
            g_na: 120.,
            e_na: -65.,
            m: BasicGatingVariable { alpha: 0., beta: 0., state: 0.05 },
            h: BasicGatingVariable { alpha: 0., beta: 0., state: 0.6 },
            current: 0.,
        };
        let mut k_channel = KIonChannel {
            g_k: 120.,
            e_k: -65.,
            n: BasicGatingVariable { alpha: 0., beta: 0., state: 0.32 },
            current: 0.,
        };

        // sweep across the physiological voltage range for many steps
        for i in 0..10_000 {
            let voltage = -80. + 140. * ((i % 100) as f32 / 100.);

            na_channel.update_gates(voltage, 0.01);
            k_channel.update_gates(voltage, 0.01);

            for state in [na_channel.m.state, na_channel.h.state, k_channel.n.state] {
                assert!((0. ..=1.).contains(&state));
            }
        }
    }

    #[test]
    pub fn test_steady_state_initialization() {
        let mut gate = BasicGatingVariable { alpha: 3., beta: 1., state: 0. };
        gate.init_state();

        assert!((gate.state - 0.75).abs() < 1e-6);

        // steady state is a fixed point of the update
        gate.update(0.01);
        assert!((gate.state - 0.75).abs() < 1e-6);
    }

    #[test]
    pub fn test_voltage_sweep_is_inclusive() {
        let voltages = voltage_sweep(-80., 59., 1.);

        assert_eq!(voltages.len(), 140);
        assert_eq!(voltages[0], -80.);
        assert_eq!(*voltages.last().unwrap(), 59.);
    }
}
