//! Graph implementations and graph theoretic metrics for multi-electrode
//! network connectivity analysis.

use std::{
    collections::{HashMap, HashSet, VecDeque},
    result::Result,
    fmt::Debug,
    hash::Hash,
    cmp::Eq,
};
use crate::error::GraphError;


/// Implementation of a basic graph
pub trait Graph: Default {
    /// Node type
    type K: Debug + Hash + Eq + PartialEq + Clone + Copy;
    /// Weight type
    type V: Debug + Clone + Copy;
    /// Adds a new node to the graph, unconnected to other nodes, no change
    /// if the node is already in the graph
    fn add_node(&mut self, node: Self::K);
    /// Returns every node or vertex on the graph
    fn get_every_node(&self) -> HashSet<Self::K>;
    /// Gets the weight between two nodes, errors if either node is not in
    /// the graph and returns `None` if there is no connection between them
    fn lookup_weight(&self, from: &Self::K, to: &Self::K) -> Result<Option<Self::V>, GraphError>;
    /// Edits the weight between two nodes, errors if either node is not in
    /// the graph, `None` represents no connection while `Some(U)` represents
    /// some weight
    fn edit_weight(&mut self, from: &Self::K, to: &Self::K, weight: Option<Self::V>) -> Result<(), GraphError>;
    /// Returns all nodes with a connection into the given node
    fn get_incoming_connections(&self, node: &Self::K) -> Result<HashSet<Self::K>, GraphError>;
    /// Returns all nodes the given node connects out to
    fn get_outgoing_connections(&self, node: &Self::K) -> Result<HashSet<Self::K>, GraphError>;
}

/// A graph implemented as an adjacency matrix where the position of each node
/// is converted to a `usize` index in a 2-dimensional matrix
///
/// Example functionality:
/// ```rust
/// # use std::collections::HashSet;
/// use ephys_analysis::graph::{Graph, AdjacencyMatrix};
///
///
/// let mut adjacency_matrix = AdjacencyMatrix::<usize, f64>::default();
/// adjacency_matrix.add_node(0);
/// adjacency_matrix.add_node(1);
/// adjacency_matrix.add_node(2);
///
/// adjacency_matrix.edit_weight(&0, &1, Some(0.5));
/// adjacency_matrix.edit_weight(&2, &1, Some(1.));
/// assert!(adjacency_matrix.edit_weight(&1, &4, Some(1.)).is_err());
///
/// assert!(adjacency_matrix.lookup_weight(&0, &1) == Ok(Some(0.5)));
/// assert!(adjacency_matrix.lookup_weight(&1, &0) == Ok(None));
/// assert!(adjacency_matrix.lookup_weight(&3, &0).is_err());
///
/// assert!(adjacency_matrix.get_incoming_connections(&1) == Ok(HashSet::from([0, 2])));
/// assert!(adjacency_matrix.get_outgoing_connections(&2) == Ok(HashSet::from([1])));
///
/// adjacency_matrix.edit_weight(&0, &1, None);
/// assert!(adjacency_matrix.lookup_weight(&0, &1) == Ok(None));
/// assert!(adjacency_matrix.get_incoming_connections(&1) == Ok(HashSet::from([2])));
/// ```
#[derive(Clone, Debug)]
pub struct AdjacencyMatrix<T: Hash + Eq + PartialEq + Clone + Copy, U: Debug + Clone + Copy> {
    /// Converts a node to an index for the matrix
    pub position_to_index: HashMap<T, usize>,
    /// Converts the index back to a node
    pub index_to_position: HashMap<usize, T>,
    /// Matrix of weights
    pub matrix: Vec<Vec<Option<U>>>,
}

impl<
    T: Debug + Hash + Eq + PartialEq + Clone + Copy,
    U: Debug + Clone + Copy
> AdjacencyMatrix<T, U> {
    pub fn nodes_len(&self) -> usize {
        self.position_to_index.len()
    }
}

impl<
    T: Debug + Hash + Eq + PartialEq + Clone + Copy,
    U: Debug + Clone + Copy
> Graph for AdjacencyMatrix<T, U> {
    type K = T;
    type V = U;

    fn add_node(&mut self, node: T) {
        if self.position_to_index.contains_key(&node) {
            return;
        }

        let index = self.nodes_len();

        self.position_to_index.insert(node, index);
        self.index_to_position.insert(index, node);

        if index != 0 {
            self.matrix.push(vec![None; index]);
            for row in self.matrix.iter_mut() {
                row.push(None);
            }
        } else {
            self.matrix = vec![vec![None]];
        }
    }

    fn get_every_node(&self) -> HashSet<T> {
        self.position_to_index.keys().cloned().collect()
    }

    fn lookup_weight(&self, from: &T, to: &T) -> Result<Option<U>, GraphError> {
        if !self.position_to_index.contains_key(to) {
            return Err(GraphError::NodeNotFound(format!("{:#?}", to)));
        }
        if !self.position_to_index.contains_key(from) {
            return Err(GraphError::NodeNotFound(format!("{:#?}", from)));
        }

        Ok(self.matrix[self.position_to_index[from]][self.position_to_index[to]])
    }

    fn edit_weight(&mut self, from: &T, to: &T, weight: Option<U>) -> Result<(), GraphError> {
        if !self.position_to_index.contains_key(to) {
            return Err(GraphError::NodeNotFound(format!("{:#?}", to)));
        }
        if !self.position_to_index.contains_key(from) {
            return Err(GraphError::NodeNotFound(format!("{:#?}", from)));
        }

        self.matrix[self.position_to_index[from]][self.position_to_index[to]] = weight;

        Ok(())
    }

    fn get_incoming_connections(&self, node: &T) -> Result<HashSet<T>, GraphError> {
        if !self.position_to_index.contains_key(node) {
            return Err(GraphError::NodeNotFound(format!("{:#?}", node)));
        }

        Ok(
            self.matrix.iter()
                .enumerate()
                .filter_map(|(i, row)| {
                    if row[self.position_to_index[node]].is_some() {
                        Some(self.index_to_position[&i])
                    } else {
                        None
                    }
                })
                .collect()
        )
    }

    fn get_outgoing_connections(&self, node: &T) -> Result<HashSet<T>, GraphError> {
        if !self.position_to_index.contains_key(node) {
            return Err(GraphError::NodeNotFound(format!("{:#?}", node)));
        }

        let index = self.position_to_index[node];
        let outgoing_connections = self.matrix[index]
            .iter()
            .enumerate()
            .filter_map(|(n, &val)| {
                if val.is_some() {
                    Some(self.index_to_position[&n])
                } else {
                    None
                }
            })
            .collect::<HashSet<T>>();

        Ok(outgoing_connections)
    }
}

impl<T: Hash + Eq + PartialEq + Clone + Copy, U: Debug + Clone + Copy> Default for AdjacencyMatrix<T, U> {
    fn default() -> Self {
        AdjacencyMatrix {
            position_to_index: HashMap::new(),
            index_to_position: HashMap::new(),
            matrix: vec![vec![]],
        }
    }
}

/// Builds an electrode connectivity graph from a pairwise connectivity
/// matrix (e.g. from [`crate::correlation::correlation_matrix`]), connecting
/// any pair whose connectivity exceeds the threshold with a symmetric edge,
/// self connections are excluded, errors if the matrix is not square
pub fn from_connectivity_matrix(
    matrix: &[Vec<f64>],
    threshold: f64,
) -> Result<AdjacencyMatrix<usize, f64>, GraphError> {
    if matrix.iter().any(|row| row.len() != matrix.len()) {
        return Err(GraphError::MatrixIsNotSquare);
    }

    let mut graph = AdjacencyMatrix::<usize, f64>::default();

    for i in 0..matrix.len() {
        graph.add_node(i);
    }

    for i in 0..matrix.len() {
        for j in (i + 1)..matrix.len() {
            if matrix[i][j] > threshold {
                graph.edit_weight(&i, &j, Some(matrix[i][j]))?;
                graph.edit_weight(&j, &i, Some(matrix[j][i]))?;
            }
        }
    }

    Ok(graph)
}

fn sorted_nodes<T: Graph<K = usize>>(graph: &T) -> Vec<usize> {
    let mut nodes: Vec<usize> = graph.get_every_node().into_iter().collect();
    nodes.sort();

    nodes
}

/// Returns the number of connections out of each node
pub fn node_degrees<T: Graph<K = usize>>(graph: &T) -> Result<HashMap<usize, usize>, GraphError> {
    let mut degrees = HashMap::new();

    for node in sorted_nodes(graph) {
        degrees.insert(node, graph.get_outgoing_connections(&node)?.len());
    }

    Ok(degrees)
}

// breadth first search distances in hops from the given source
fn bfs_distances<T: Graph<K = usize>>(
    graph: &T,
    source: usize,
) -> Result<HashMap<usize, usize>, GraphError> {
    let mut distances: HashMap<usize, usize> = HashMap::from([(source, 0)]);
    let mut queue: VecDeque<usize> = VecDeque::from([source]);

    while let Some(current) = queue.pop_front() {
        let current_distance = distances[&current];

        for neighbor in graph.get_outgoing_connections(&current)? {
            if !distances.contains_key(&neighbor) {
                distances.insert(neighbor, current_distance + 1);
                queue.push_back(neighbor);
            }
        }
    }

    Ok(distances)
}

/// Calculates the closeness centrality of each node over unweighted hop
/// distances, scaled by the fraction of the graph each node can reach,
/// unreachable or isolated nodes score 0
pub fn closeness_centrality<T: Graph<K = usize>>(graph: &T) -> Result<HashMap<usize, f64>, GraphError> {
    let nodes = sorted_nodes(graph);
    let mut centralities = HashMap::new();

    for &node in nodes.iter() {
        let distances = bfs_distances(graph, node)?;

        let reachable = distances.len();
        let total_distance: usize = distances.values().sum();

        let centrality = if reachable > 1 && nodes.len() > 1 {
            let closeness = (reachable - 1) as f64 / total_distance as f64;
            closeness * (reachable - 1) as f64 / (nodes.len() - 1) as f64
        } else {
            0.
        };

        centralities.insert(node, centrality);
    }

    Ok(centralities)
}

/// Partitions the graph into communities by label propagation, each node
/// repeatedly adopts the most frequent label among its neighbors until the
/// labeling is stable, sweeping nodes in ascending order with ties resolved
/// toward the largest label so the result is deterministic, isolated nodes
/// form their own community
///
/// returns disjoint communities sorted by their smallest member
pub fn detect_communities<T: Graph<K = usize>>(graph: &T) -> Result<Vec<Vec<usize>>, GraphError> {
    let nodes = sorted_nodes(graph);
    let mut labels: HashMap<usize, usize> = nodes.iter().map(|&n| (n, n)).collect();

    for _ in 0..nodes.len() {
        let mut changed = false;

        for &node in nodes.iter() {
            let neighbors = graph.get_outgoing_connections(&node)?;
            if neighbors.is_empty() {
                continue;
            }

            let mut counts: HashMap<usize, usize> = HashMap::new();
            for neighbor in neighbors {
                *counts.entry(labels[&neighbor]).or_insert(0) += 1;
            }

            let max_count = counts.values().max().copied().unwrap_or(0);
            let new_label = counts.iter()
                .filter(|(_, &count)| count == max_count)
                .map(|(&label, _)| label)
                .max()
                .unwrap_or(labels[&node]);

            if new_label != labels[&node] {
                labels.insert(node, new_label);
                changed = true;
            }
        }

        if !changed {
            break;
        }
    }

    let mut by_label: HashMap<usize, Vec<usize>> = HashMap::new();
    for &node in nodes.iter() {
        by_label.entry(labels[&node]).or_default().push(node);
    }

    let mut communities: Vec<Vec<usize>> = by_label.into_values().collect();
    for community in communities.iter_mut() {
        community.sort();
    }
    communities.sort_by_key(|community| community[0]);

    Ok(communities)
}

/// Calculates the betweenness centrality of each node using Brandes'
/// algorithm over unweighted shortest paths, set `normalized` to `true`
/// to scale by the number of ordered node pairs `(n - 1)(n - 2)`
pub fn betweenness_centrality<T: Graph<K = usize>>(
    graph: &T,
    normalized: bool,
) -> Result<HashMap<usize, f64>, GraphError> {
    let nodes = sorted_nodes(graph);
    let mut centralities: HashMap<usize, f64> = nodes.iter().map(|&n| (n, 0.)).collect();

    for &source in nodes.iter() {
        let mut visit_order: Vec<usize> = Vec::new();
        let mut predecessors: HashMap<usize, Vec<usize>> = nodes.iter().map(|&n| (n, vec![])).collect();
        let mut num_paths: HashMap<usize, f64> = nodes.iter().map(|&n| (n, 0.)).collect();
        let mut distances: HashMap<usize, usize> = HashMap::from([(source, 0)]);

        num_paths.insert(source, 1.);

        let mut queue: VecDeque<usize> = VecDeque::from([source]);
        while let Some(current) = queue.pop_front() {
            visit_order.push(current);
            let current_distance = distances[&current];

            for neighbor in graph.get_outgoing_connections(&current)? {
                if !distances.contains_key(&neighbor) {
                    distances.insert(neighbor, current_distance + 1);
                    queue.push_back(neighbor);
                }

                // neighbor lies on a shortest path through the current node
                if distances[&neighbor] == current_distance + 1 {
                    let paths_through_current = num_paths[&current];
                    *num_paths.entry(neighbor).or_insert(0.) += paths_through_current;
                    if let Some(preds) = predecessors.get_mut(&neighbor) {
                        preds.push(current);
                    }
                }
            }
        }

        // accumulate dependencies in reverse visit order
        let mut dependencies: HashMap<usize, f64> = nodes.iter().map(|&n| (n, 0.)).collect();
        while let Some(node) = visit_order.pop() {
            for &predecessor in predecessors[&node].iter() {
                let contribution = num_paths[&predecessor] / num_paths[&node] * (1. + dependencies[&node]);
                *dependencies.entry(predecessor).or_insert(0.) += contribution;
            }

            if node != source {
                let dependency = dependencies[&node];
                *centralities.entry(node).or_insert(0.) += dependency;
            }
        }
    }

    if normalized && nodes.len() > 2 {
        let scale = 1. / ((nodes.len() - 1) as f64 * (nodes.len() - 2) as f64);
        for centrality in centralities.values_mut() {
            *centrality *= scale;
        }
    }

    Ok(centralities)
}
