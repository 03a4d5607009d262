use std::{
    collections::HashMap,
    env,
    fs::{read_to_string, File},
    io::{BufWriter, Error, ErrorKind, Result, Write},
};
use toml::{from_str, Value};
use ephys_analysis::channel::{ChannelSimulationParameters, channel_currents, voltage_sweep};
use ephys_analysis::correlation::correlation_matrix;
use ephys_analysis::distribution::GaussianParameters;
use ephys_analysis::error::ElectrophysiologyError;
use ephys_analysis::fitting::{fit_sigmoid, fit_dose_response, sigmoid, hill};
use ephys_analysis::ga::GeneticAlgorithmParameters;
use ephys_analysis::graph::{
    from_connectivity_matrix, node_degrees, closeness_centrality, betweenness_centrality,
    detect_communities,
};
use ephys_analysis::spectral::{get_power_density, power_density_comparison};
use ephys_analysis::trace::{
    preprocess_trace, detect_action_potentials, interspike_intervals, detect_firing_rate_change,
};


fn parse_bool(value: &Value, field_name: &str) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| Error::new(ErrorKind::InvalidData, format!("Cannot parse {} as boolean", field_name)))
}

fn parse_usize(value: &Value, field_name: &str) -> Result<usize> {
    value
        .as_integer()
        .ok_or_else(|| Error::new(ErrorKind::InvalidData, format!("Cannot parse {} as unsigned integer", field_name)))
        .map(|v| v as usize)
}

fn parse_f64(value: &Value, field_name: &str) -> Result<f64> {
    value
        .as_float()
        .ok_or_else(|| Error::new(ErrorKind::InvalidData, format!("Cannot parse {} as float", field_name)))
}

fn parse_f32(value: &Value, field_name: &str) -> Result<f32> {
    parse_f64(value, field_name).map(|v| v as f32)
}

fn parse_string(value: &Value, field_name: &str) -> Result<String> {
    value
        .as_str()
        .ok_or_else(|| Error::new(ErrorKind::InvalidData, format!("Cannot parse {} as string", field_name)))
        .map(String::from)
}

fn parse_value_with_default<T>(
    table: &Value,
    key: &str,
    parser: impl Fn(&Value, &str) -> Result<T>,
    default: T,
) -> Result<T> {
    table
        .get(key)
        .map_or(Ok(default), |value| parser(value, key))
}

fn parse_required_string(table: &Value, key: &str) -> Result<String> {
    match table.get(key) {
        Some(value) => parse_string(value, key),
        None => Err(Error::new(ErrorKind::InvalidInput, format!("Requires '{}' argument", key))),
    }
}

fn convert_error(error: ElectrophysiologyError) -> Error {
    Error::new(ErrorKind::Other, format!("{}", error))
}

// reads a delimited file with a header row, returning the requested
// number of numeric columns
fn read_columns(file_path: &str, num_columns: usize) -> Result<Vec<Vec<f64>>> {
    let contents = read_to_string(file_path)?;
    let mut lines = contents.lines();

    // header
    lines.next();

    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); num_columns];
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < num_columns {
            return Err(
                Error::new(
                    ErrorKind::InvalidData,
                    format!("Expected at least {} columns in '{}'", num_columns, file_path)
                )
            );
        }

        for (column, field) in columns.iter_mut().zip(fields.iter()) {
            let parsed: f64 = field.trim().parse()
                .map_err(|_| Error::new(
                    ErrorKind::InvalidData,
                    format!("Cannot parse '{}' as float in '{}'", field, file_path)
                ))?;
            column.push(parsed);
        }
    }

    Ok(columns)
}

// reads every numeric column, one recorded channel per column
fn read_channels(file_path: &str) -> Result<Vec<Vec<f64>>> {
    let contents = read_to_string(file_path)?;
    let mut lines = contents.lines();

    let header = lines.next()
        .ok_or_else(|| Error::new(ErrorKind::InvalidData, format!("Empty file: '{}'", file_path)))?;
    let num_columns = header.split(',').count();

    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); num_columns];
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != num_columns {
            return Err(
                Error::new(
                    ErrorKind::InvalidData,
                    format!("Expected {} columns in '{}'", num_columns, file_path)
                )
            );
        }

        for (column, field) in columns.iter_mut().zip(fields.iter()) {
            let parsed: f64 = field.trim().parse()
                .map_err(|_| Error::new(
                    ErrorKind::InvalidData,
                    format!("Cannot parse '{}' as float in '{}'", field, file_path)
                ))?;
            column.push(parsed);
        }
    }

    Ok(columns)
}

// second column of a time/value file as f32
fn read_trace(file_path: &str) -> Result<Vec<f32>> {
    let columns = read_columns(file_path, 2)?;

    Ok(columns[1].iter().map(|&i| i as f32).collect())
}

fn get_ga_parameters(table: &Value) -> Result<GeneticAlgorithmParameters> {
    let defaults = GeneticAlgorithmParameters::default();

    Ok(
        GeneticAlgorithmParameters {
            bounds: vec![],
            n_bits: parse_value_with_default(table, "n_bits", parse_usize, defaults.n_bits)?,
            n_iter: parse_value_with_default(table, "n_iter", parse_usize, defaults.n_iter)?,
            n_pop: parse_value_with_default(table, "n_pop", parse_usize, defaults.n_pop)?,
            r_cross: parse_value_with_default(table, "r_cross", parse_f32, defaults.r_cross)?,
            r_mut: parse_value_with_default(table, "r_mut", parse_f32, defaults.r_mut)?,
            k: parse_value_with_default(table, "k", parse_usize, defaults.k)?,
        }
    )
}

fn run_channel_simulation(table: &Value) -> Result<()> {
    let tag = parse_required_string(table, "tag")?;
    println!("tag: {}", tag);

    let model = parse_value_with_default(
        table, "model", parse_string, String::from("hodgkin_huxley")
    )?;
    println!("model: {}", model);

    let voltages: Vec<f32> = match table.get("voltage_file") {
        Some(value) => read_trace(&parse_string(value, "voltage_file")?)?,
        None => {
            let v_start = parse_value_with_default(table, "v_start", parse_f32, -80.)?;
            let v_end = parse_value_with_default(table, "v_end", parse_f32, 59.)?;
            let v_step = parse_value_with_default(table, "v_step", parse_f32, 1.)?;

            voltage_sweep(v_start, v_end, v_step)
        },
    };

    let defaults = ChannelSimulationParameters::default();
    let params = ChannelSimulationParameters {
        g_max: parse_value_with_default(table, "g_max", parse_f32, defaults.g_max)?,
        e_rev: parse_value_with_default(table, "e_rev", parse_f32, defaults.e_rev)?,
        dt: parse_value_with_default(table, "dt", parse_f32, defaults.dt)?,
        m_init: parse_value_with_default(table, "m_init", parse_f32, defaults.m_init)?,
        h_init: parse_value_with_default(table, "h_init", parse_f32, defaults.h_init)?,
        n_init: parse_value_with_default(table, "n_init", parse_f32, defaults.n_init)?,
    };

    let noise_std = parse_value_with_default(table, "noise_std", parse_f32, 0.)?;
    let gaussian_params = GaussianParameters {
        std: noise_std,
        ..GaussianParameters::default()
    };

    let voltages: Vec<f32> = voltages.iter()
        .map(|&v| v * gaussian_params.get_factor())
        .collect();

    let currents = channel_currents(&model, &voltages, &params)
        .map_err(|e| convert_error(e.into()))?;

    let mut file = BufWriter::new(File::create(format!("{}_currents.csv", tag))?);
    writeln!(file, "voltage,current")?;
    for (voltage, current) in voltages.iter().zip(currents.iter()) {
        writeln!(file, "{},{}", voltage, current)?;
    }

    println!("Finished channel simulation");

    Ok(())
}

fn run_spike_analysis(table: &Value) -> Result<()> {
    let tag = parse_required_string(table, "tag")?;
    println!("tag: {}", tag);

    let trace_file = parse_required_string(table, "trace_file")?;
    let raw_trace = read_trace(&trace_file)?;

    let sampling_rate = parse_value_with_default(table, "sampling_rate", parse_f32, 10_000.)?;
    let threshold = parse_value_with_default(table, "threshold", parse_f32, -30.)?;

    let trace = if parse_value_with_default(table, "preprocess", parse_bool, false)? {
        let detrend_trace = parse_value_with_default(table, "detrend", parse_bool, true)?;
        let freq_min = parse_value_with_default(table, "freq_min", parse_f32, 1.)?;
        let freq_max = parse_value_with_default(table, "freq_max", parse_f32, 100.)?;

        preprocess_trace(&raw_trace, sampling_rate, detrend_trace, freq_min, freq_max)
    } else {
        raw_trace
    };

    let spike_times = detect_action_potentials(&trace, sampling_rate, threshold)
        .map_err(|e| convert_error(e.into()))?;
    let intervals = interspike_intervals(&spike_times);

    println!("Detected {} spikes", spike_times.len());

    if let (Some(baseline_end), Some(treatment_end)) = (table.get("baseline_end"), table.get("treatment_end")) {
        let baseline_end = parse_f32(baseline_end, "baseline_end")?;
        let treatment_end = parse_f32(treatment_end, "treatment_end")?;

        let (baseline_rate, treatment_rate) = detect_firing_rate_change(
            &trace,
            sampling_rate,
            (0., baseline_end),
            (baseline_end, treatment_end),
        )
            .map_err(|e| convert_error(e.into()))?;

        println!("Baseline firing rate: {} Hz", baseline_rate);
        println!("Treatment firing rate: {} Hz", treatment_rate);
    }

    let mut file = BufWriter::new(File::create(format!("{}_spikes.csv", tag))?);
    writeln!(file, "spike_time,isi")?;
    for (n, spike_time) in spike_times.iter().enumerate() {
        if n == 0 {
            writeln!(file, "{},", spike_time)?;
        } else {
            writeln!(file, "{},{}", spike_time, intervals[n - 1])?;
        }
    }

    println!("Finished spike analysis");

    Ok(())
}

fn run_input_output_fit(table: &Value) -> Result<()> {
    let tag = parse_required_string(table, "tag")?;
    println!("tag: {}", tag);

    let data_file = parse_required_string(table, "data_file")?;
    let columns = read_columns(&data_file, 2)?;
    let inputs: Vec<f32> = columns[0].iter().map(|&i| i as f32).collect();
    let outputs: Vec<f32> = columns[1].iter().map(|&i| i as f32).collect();

    let ga_params = get_ga_parameters(table)?;
    let verbose = parse_value_with_default(table, "verbose", parse_bool, false)?;

    let (fit, score) = fit_sigmoid(&inputs, &outputs, &ga_params, verbose)
        .map_err(|e| convert_error(e.into()))?;

    println!("midpoint: {}", fit.midpoint);
    println!("slope: {}", fit.slope);
    println!("max response: {}", fit.max_response);
    println!("residual score: {}", score);

    let mut file = BufWriter::new(File::create(format!("{}_fit.csv", tag))?);
    writeln!(file, "input,output,fitted")?;
    for (input, output) in inputs.iter().zip(outputs.iter()) {
        writeln!(file, "{},{},{}", input, output, sigmoid(*input, &fit))?;
    }

    println!("Finished input/output fit");

    Ok(())
}

fn run_dose_response_fit(table: &Value) -> Result<()> {
    let tag = parse_required_string(table, "tag")?;
    println!("tag: {}", tag);

    let data_file = parse_required_string(table, "data_file")?;
    let columns = read_columns(&data_file, 2)?;
    let doses: Vec<f32> = columns[0].iter().map(|&i| i as f32).collect();
    let responses: Vec<f32> = columns[1].iter().map(|&i| i as f32).collect();

    let ga_params = get_ga_parameters(table)?;
    let verbose = parse_value_with_default(table, "verbose", parse_bool, false)?;

    let (fit, score) = fit_dose_response(&doses, &responses, &ga_params, verbose)
        .map_err(|e| convert_error(e.into()))?;

    println!("ec50: {}", fit.ec50);
    println!("hill slope: {}", fit.hill_slope);
    println!("max response: {}", fit.max_response);
    println!("residual score: {}", score);

    let mut file = BufWriter::new(File::create(format!("{}_fit.csv", tag))?);
    writeln!(file, "dose,response,fitted")?;
    for (dose, response) in doses.iter().zip(responses.iter()) {
        writeln!(file, "{},{},{}", dose, response, hill(*dose, &fit))?;
    }

    println!("Finished dose-response fit");

    Ok(())
}

fn run_network_metrics(table: &Value) -> Result<()> {
    let tag = parse_required_string(table, "tag")?;
    println!("tag: {}", tag);

    let data_file = parse_required_string(table, "data_file")?;
    let channels = read_channels(&data_file)?;
    println!("channels: {}", channels.len());

    let threshold = parse_value_with_default(table, "threshold", parse_f64, 0.5)?;
    let normalized = parse_value_with_default(table, "normalized", parse_bool, true)?;

    let matrix = correlation_matrix(&channels)
        .map_err(|e| convert_error(e.into()))?;
    let graph = from_connectivity_matrix(&matrix, threshold)
        .map_err(|e| convert_error(e.into()))?;

    let degrees = node_degrees(&graph).map_err(|e| convert_error(e.into()))?;
    let closeness = closeness_centrality(&graph).map_err(|e| convert_error(e.into()))?;
    let betweenness = betweenness_centrality(&graph, normalized)
        .map_err(|e| convert_error(e.into()))?;

    let communities = detect_communities(&graph).map_err(|e| convert_error(e.into()))?;
    println!("communities: {}", communities.len());

    let mut community_of: HashMap<usize, usize> = HashMap::new();
    for (n, community) in communities.iter().enumerate() {
        for &node in community.iter() {
            community_of.insert(node, n);
        }
    }

    let mut file = BufWriter::new(File::create(format!("{}_metrics.csv", tag))?);
    writeln!(file, "node,degree,closeness,betweenness,community")?;

    let mut nodes: Vec<usize> = degrees.keys().cloned().collect();
    nodes.sort();
    for node in nodes {
        writeln!(
            file, "{},{},{},{},{}",
            node, degrees[&node], closeness[&node], betweenness[&node], community_of[&node],
        )?;
    }

    println!("Finished network metrics");

    Ok(())
}

fn run_power_density(table: &Value) -> Result<()> {
    let tag = parse_required_string(table, "tag")?;
    println!("tag: {}", tag);

    let trace_file = parse_required_string(table, "trace_file")?;
    let columns = read_columns(&trace_file, 2)?;
    let x = &columns[1];

    let dt = parse_value_with_default(table, "dt", parse_f64, 0.1)?;
    let total_time = parse_value_with_default(table, "total_time", parse_f64, dt * x.len() as f64)?;

    let (faxis, sxx) = get_power_density(x, dt, total_time)
        .map_err(|e| convert_error(e.into()))?;

    if let Some(value) = table.get("comparison_file") {
        let comparison_file = parse_string(value, "comparison_file")?;
        let comparison_columns = read_columns(&comparison_file, 2)?;

        let (_, comparison_sxx) = get_power_density(&comparison_columns[1], dt, total_time)
            .map_err(|e| convert_error(e.into()))?;

        let distance = power_density_comparison(&sxx, &comparison_sxx)
            .map_err(|e| convert_error(e.into()))?;
        println!("spectral distance: {}", distance);
    }

    let mut file = BufWriter::new(File::create(format!("{}_power.csv", tag))?);
    writeln!(file, "frequency,power")?;
    for (frequency, power) in faxis.iter().zip(sxx.iter()) {
        writeln!(file, "{},{}", frequency, power)?;
    }

    println!("Finished power density calculation");

    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Requires .toml argument file");
        return Err(Error::new(ErrorKind::InvalidInput, "Requires .toml argument file"));
    }

    let toml_content = read_to_string(&args[1])?;
    let config: Value = from_str(&toml_content)
        .map_err(|e| Error::new(ErrorKind::InvalidData, format!("Cannot read config: {}", e)))?;

    if let Some(table) = config.get("channel_simulation") {
        run_channel_simulation(table)?;
    } else if let Some(table) = config.get("spike_analysis") {
        run_spike_analysis(table)?;
    } else if let Some(table) = config.get("input_output_fit") {
        run_input_output_fit(table)?;
    } else if let Some(table) = config.get("dose_response_fit") {
        run_dose_response_fit(table)?;
    } else if let Some(table) = config.get("network_metrics") {
        run_network_metrics(table)?;
    } else if let Some(table) = config.get("power_density") {
        run_power_density(table)?;
    } else {
        return Err(Error::new(ErrorKind::InvalidInput, "Simulation config not found"));
    }

    Ok(())
}
