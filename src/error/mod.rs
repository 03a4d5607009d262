use std::fmt::{Display, Debug, Formatter, Result};


/// Error set for ion channel simulation errors
pub enum ChannelModelError {
    /// Requested kinetics model is not supported
    InvalidModel(String),
}

impl Display for ChannelModelError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            ChannelModelError::InvalidModel(model) => write!(
                f, "Invalid ion channel model: '{}'", model
            ),
        }
    }
}

impl Debug for ChannelModelError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// Error set for potential time series processing errors
pub enum TimeSeriesProcessingError {
    /// Series must be the same length to be compared
    SeriesAreNotSameLength,
    /// Series must be non-empty
    SeriesIsEmpty,
    /// Requested time window falls outside of the series
    WindowOutOfBounds,
}

impl Display for TimeSeriesProcessingError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        let err_msg = match self {
            TimeSeriesProcessingError::SeriesAreNotSameLength => "Series must be the same length",
            TimeSeriesProcessingError::SeriesIsEmpty => "Series must be non-empty",
            TimeSeriesProcessingError::WindowOutOfBounds => "Time window falls outside of series",
        };

        write!(f, "{}", err_msg)
    }
}

impl Debug for TimeSeriesProcessingError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// Error set for potential genetic algorithm errors
pub enum GeneticAlgorithmError {
    /// Bitstring must only contain `0`s and `1`s
    NonBinaryInBitstring(String),
    /// Bounds length and number of bits do not match bitstring length
    InvalidBoundsLength,
    /// Bits per parameter must be between 1 and 31 and divide the
    /// bitstring length
    InvalidBitstringLength,
    /// Objective function could not be calculated
    ObjectiveFunctionFailure(String),
    /// Population size must be nonzero and even
    InvalidPopulationSize,
}

impl Display for GeneticAlgorithmError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            GeneticAlgorithmError::NonBinaryInBitstring(string) => write!(
                f, "Non binary found in bitstring: {}", string
            ),
            GeneticAlgorithmError::InvalidBoundsLength => write!(
                f, "Bounds length does not match bitstring length given bits per parameter"
            ),
            GeneticAlgorithmError::InvalidBitstringLength => write!(
                f, "Bitstring length is indivisible by bits per parameter"
            ),
            GeneticAlgorithmError::ObjectiveFunctionFailure(msg) => write!(
                f, "Objective function failure: {}", msg
            ),
            GeneticAlgorithmError::InvalidPopulationSize => write!(
                f, "Population size must be nonzero and even"
            ),
        }
    }
}

impl Debug for GeneticAlgorithmError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// Error set for potential curve fitting errors
pub enum FittingError {
    /// Input and output series must be the same length
    SeriesAreNotSameLength,
    /// Fit requires at least one data point
    EmptyData,
    /// Dose values must be positive for dose-response fitting
    NonPositiveDose,
    /// Errors related to the underlying genetic algorithm
    GeneticAlgorithmRelatedError(GeneticAlgorithmError),
}

impl Display for FittingError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            FittingError::SeriesAreNotSameLength => write!(
                f, "Input and output series must be the same length"
            ),
            FittingError::EmptyData => write!(f, "Fit requires at least one data point"),
            FittingError::NonPositiveDose => write!(
                f, "Dose values must be positive for dose-response fitting"
            ),
            FittingError::GeneticAlgorithmRelatedError(err) => write!(f, "{}", err),
        }
    }
}

impl Debug for FittingError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

impl From<GeneticAlgorithmError> for FittingError {
    fn from(err: GeneticAlgorithmError) -> FittingError {
        FittingError::GeneticAlgorithmRelatedError(err)
    }
}

/// Error set for potential graph errors
#[derive(PartialEq, Eq)]
pub enum GraphError {
    /// Node cannot be found
    NodeNotFound(String),
    /// Connectivity matrix must be square
    MatrixIsNotSquare,
}

impl Display for GraphError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            GraphError::NodeNotFound(node) => write!(f, "Node not found: {}", node),
            GraphError::MatrixIsNotSquare => write!(f, "Connectivity matrix must be square"),
        }
    }
}

impl Debug for GraphError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// A set of errors that may occur when using the library
pub enum ElectrophysiologyError {
    /// Errors related to ion channel simulation
    ChannelRelatedError(ChannelModelError),
    /// Errors related to time series processing
    TimeSeriesRelatedError(TimeSeriesProcessingError),
    /// Errors related to genetic algorithms
    GeneticAlgorithmRelatedError(GeneticAlgorithmError),
    /// Errors related to curve fitting
    FittingRelatedError(FittingError),
    /// Errors related to graph processing
    GraphRelatedError(GraphError),
}

impl Display for ElectrophysiologyError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            ElectrophysiologyError::ChannelRelatedError(err) => write!(f, "{}", err),
            ElectrophysiologyError::TimeSeriesRelatedError(err) => write!(f, "{}", err),
            ElectrophysiologyError::GeneticAlgorithmRelatedError(err) => write!(f, "{}", err),
            ElectrophysiologyError::FittingRelatedError(err) => write!(f, "{}", err),
            ElectrophysiologyError::GraphRelatedError(err) => write!(f, "{}", err),
        }
    }
}

impl Debug for ElectrophysiologyError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

impl From<ChannelModelError> for ElectrophysiologyError {
    fn from(err: ChannelModelError) -> ElectrophysiologyError {
        ElectrophysiologyError::ChannelRelatedError(err)
    }
}

impl From<TimeSeriesProcessingError> for ElectrophysiologyError {
    fn from(err: TimeSeriesProcessingError) -> ElectrophysiologyError {
        ElectrophysiologyError::TimeSeriesRelatedError(err)
    }
}

impl From<GeneticAlgorithmError> for ElectrophysiologyError {
    fn from(err: GeneticAlgorithmError) -> ElectrophysiologyError {
        ElectrophysiologyError::GeneticAlgorithmRelatedError(err)
    }
}

impl From<FittingError> for ElectrophysiologyError {
    fn from(err: FittingError) -> ElectrophysiologyError {
        ElectrophysiologyError::FittingRelatedError(err)
    }
}

impl From<GraphError> for ElectrophysiologyError {
    fn from(err: GraphError) -> ElectrophysiologyError {
        ElectrophysiologyError::GraphRelatedError(err)
    }
}
