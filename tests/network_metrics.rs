#[cfg(test)]
mod tests {
    use ephys_analysis::correlation::{correlation_matrix, pearsonr};
    use ephys_analysis::error::{GraphError, TimeSeriesProcessingError};
    use ephys_analysis::graph::{
        Graph, betweenness_centrality, closeness_centrality, detect_communities,
        from_connectivity_matrix, node_degrees,
    };

    // connectivity matrix for the path graph 0 - 1 - 2
    fn path_graph_matrix() -> Vec<Vec<f64>> {
        vec![
            vec![1., 0.9, 0.1],
            vec![0.9, 1., 0.9],
            vec![0.1, 0.9, 1.],
        ]
    }

    #[test]
    pub fn test_pearsonr() -> Result<(), TimeSeriesProcessingError> {
        let x = vec![0., 1., 0., 1., 0., 1.];
        let y: Vec<f64> = x.iter().map(|i| 1. - i).collect();

        assert!((pearsonr(&x, &x)? - 1.).abs() < 1e-6);
        assert!((pearsonr(&x, &y)? + 1.).abs() < 1e-6);

        // zero variance in either series has no defined coefficient
        assert!(pearsonr(&x, &[2.; 6])?.is_nan());

        assert!(matches!(
            pearsonr(&x, &[0., 1.]),
            Err(TimeSeriesProcessingError::SeriesAreNotSameLength)
        ));
        assert!(matches!(
            pearsonr(&[], &[]),
            Err(TimeSeriesProcessingError::SeriesIsEmpty)
        ));

        Ok(())
    }

    #[test]
    pub fn test_correlation_matrix() -> Result<(), TimeSeriesProcessingError> {
        let channels = vec![
            vec![0., 1., 0., 1., 0., 1.],
            vec![0., 1., 0., 1., 0., 1.],
            vec![1., 0., 1., 0., 1., 0.],
        ];

        let matrix = correlation_matrix(&channels)?;

        for i in 0..3 {
            assert!((matrix[i][i] - 1.).abs() < 1e-6);
            for j in 0..3 {
                assert_eq!(matrix[i][j], matrix[j][i]);
            }
        }

        assert!((matrix[0][1] - 1.).abs() < 1e-6);
        assert!((matrix[0][2] + 1.).abs() < 1e-6);

        Ok(())
    }

    #[test]
    pub fn test_from_connectivity_matrix() -> Result<(), GraphError> {
        let graph = from_connectivity_matrix(&path_graph_matrix(), 0.5)?;

        assert_eq!(graph.nodes_len(), 3);

        // edges are symmetric and the diagonal contributes no self loops
        assert_eq!(graph.lookup_weight(&0, &1)?, Some(0.9));
        assert_eq!(graph.lookup_weight(&1, &0)?, Some(0.9));
        assert_eq!(graph.lookup_weight(&0, &2)?, None);
        assert_eq!(graph.lookup_weight(&0, &0)?, None);

        Ok(())
    }

    #[test]
    pub fn test_from_connectivity_matrix_rejects_non_square() {
        let matrix = vec![vec![1., 0.5], vec![0.5, 1.], vec![0.1, 0.2]];

        let result = from_connectivity_matrix(&matrix, 0.5);
        assert!(matches!(result, Err(GraphError::MatrixIsNotSquare)));
    }

    #[test]
    pub fn test_node_degrees() -> Result<(), GraphError> {
        let graph = from_connectivity_matrix(&path_graph_matrix(), 0.5)?;

        let degrees = node_degrees(&graph)?;

        assert_eq!(degrees[&0], 1);
        assert_eq!(degrees[&1], 2);
        assert_eq!(degrees[&2], 1);

        Ok(())
    }

    #[test]
    pub fn test_closeness_centrality() -> Result<(), GraphError> {
        let graph = from_connectivity_matrix(&path_graph_matrix(), 0.5)?;

        let closeness = closeness_centrality(&graph)?;

        // the middle of a path graph reaches everything in one hop
        assert!((closeness[&1] - 1.).abs() < 1e-6);
        assert!((closeness[&0] - 2. / 3.).abs() < 1e-6);
        assert!((closeness[&2] - 2. / 3.).abs() < 1e-6);

        Ok(())
    }

    #[test]
    pub fn test_closeness_centrality_isolated_node() -> Result<(), GraphError> {
        // node 2 falls below threshold on every pairing
        let matrix = vec![
            vec![1., 0.9, 0.1],
            vec![0.9, 1., 0.1],
            vec![0.1, 0.1, 1.],
        ];

        let graph = from_connectivity_matrix(&matrix, 0.5)?;
        let closeness = closeness_centrality(&graph)?;

        assert_eq!(closeness[&2], 0.);
        // the connected pair only reaches half the graph
        assert!((closeness[&0] - 0.5).abs() < 1e-6);

        Ok(())
    }

    #[test]
    pub fn test_betweenness_centrality() -> Result<(), GraphError> {
        let graph = from_connectivity_matrix(&path_graph_matrix(), 0.5)?;

        let raw = betweenness_centrality(&graph, false)?;

        // both directed shortest paths between the endpoints pass through node 1
        assert!((raw[&1] - 2.).abs() < 1e-6);
        assert!(raw[&0].abs() < 1e-6);
        assert!(raw[&2].abs() < 1e-6);

        let normalized = betweenness_centrality(&graph, true)?;

        assert!((normalized[&1] - 1.).abs() < 1e-6);
        assert!(normalized[&0].abs() < 1e-6);

        Ok(())
    }

    #[test]
    pub fn test_detect_communities() -> Result<(), GraphError> {
        // two triangles joined by a single bridge edge
        let mut matrix = vec![vec![0.1; 6]; 6];
        for i in 0..6 {
            matrix[i][i] = 1.;
        }
        for &(i, j) in [(0, 1), (0, 2), (1, 2), (3, 4), (3, 5), (4, 5), (2, 3)].iter() {
            matrix[i][j] = 0.9;
            matrix[j][i] = 0.9;
        }

        let graph = from_connectivity_matrix(&matrix, 0.5)?;
        let communities = detect_communities(&graph)?;

        assert_eq!(communities, vec![vec![0, 1, 2], vec![3, 4, 5]]);

        // repeated runs partition identically
        assert_eq!(detect_communities(&graph)?, communities);

        Ok(())
    }

    #[test]
    pub fn test_detect_communities_isolated_node() -> Result<(), GraphError> {
        let matrix = vec![
            vec![1., 0.9, 0.1],
            vec![0.9, 1., 0.1],
            vec![0.1, 0.1, 1.],
        ];

        let graph = from_connectivity_matrix(&matrix, 0.5)?;
        let communities = detect_communities(&graph)?;

        assert_eq!(communities, vec![vec![0, 1], vec![2]]);

        Ok(())
    }
}
