use ndarray::{Array1, ArrayView1, Axis, concatenate};


fn argsort(arr: &Array1<f64>) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..arr.len()).collect();
    indices.sort_by(|&i, &j| arr[i].total_cmp(&arr[j]));
    indices
}

fn diff(arr: &Array1<f64>) -> Array1<f64> {
    Array1::from_vec(
        (1..arr.len())
            .map(|i| arr[i] - arr[i - 1])
            .collect()
    )
}

fn searchsorted(a: &ArrayView1<f64>, v: &ArrayView1<f64>) -> Array1<usize> {
    v.map(|&x| a.iter().position(|&y| y > x).unwrap_or(a.len()))
}

fn cumsum(array: &Array1<f64>) -> Array1<f64> {
    let mut running_sum = 0.0;

    array.map(|&x| {
        running_sum += x;
        running_sum
    })
}

// cumulative distribution of the sorted weights evaluated at the given indices
fn get_cdf(weights: &Array1<f64>, sorter: &[usize], indices: &Array1<usize>) -> Vec<f64> {
    let sorted_cum_weights = concatenate![
        Axis(0),
        Array1::from_vec(vec![0.]),
        cumsum(&weights.select(Axis(0), sorter))
    ];

    let total = *sorted_cum_weights.last().unwrap_or(&1.);

    indices.iter()
        .map(|&i| sorted_cum_weights[i] / total)
        .collect::<Vec<f64>>()
}

/// Calculates the weighted earth mover's distance between two distributions,
/// made in reference to the scipy implementation of the Wasserstein distance
pub fn earth_movers_distance(
    u_values: Array1<f64>,
    v_values: Array1<f64>,
    u_weights: Array1<f64>,
    v_weights: Array1<f64>,
) -> f64 {
    let u_sorter = argsort(&u_values);
    let v_sorter = argsort(&v_values);

    let mut all_values: Vec<f64> = concatenate![Axis(0), u_values.view(), v_values.view()].to_vec();
    all_values.sort_by(|a, b| a.total_cmp(b));
    let all_values = Array1::from_vec(all_values);

    // differences between pairs of successive values of u and v
    let deltas = diff(&all_values);

    // respective positions of the values of u and v among the values
    // of both distributions
    let all_values_sliced = all_values.slice(ndarray::s![0..all_values.len() - 1]);
    let u_cdf_indices = searchsorted(&u_values.select(Axis(0), &u_sorter).view(), &all_values_sliced);
    let v_cdf_indices = searchsorted(&v_values.select(Axis(0), &v_sorter).view(), &all_values_sliced);

    let u_cdf = get_cdf(&u_weights, &u_sorter, &u_cdf_indices);
    let v_cdf = get_cdf(&v_weights, &v_sorter, &v_cdf_indices);

    u_cdf.iter()
        .zip(&v_cdf)
        .zip(deltas.iter())
        .map(|((uc, vc), delta)| (uc - vc).abs() * delta)
        .sum()
}
