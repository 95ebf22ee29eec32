// imports of other modules from this crate
mod geometry;
pub use geometry::Point2d;

mod network;
pub use network::{DemandSpec, FlowMatrix, LinkSpec, NetworkError, NodeSpec, OdPair,
                  RoadNetwork};

pub mod congestion;

pub mod shortest_path;
pub use shortest_path::{floyd_warshall, path_travel_time, shortest_path, ShortestPaths};

pub mod convergence;

pub mod assignment;
pub use assignment::{run, Algorithm, AssignmentError, AssignmentParams, EquilibriumOutcome};

pub mod report;

mod config_utils;

pub mod loaders;

mod scenario;
pub use scenario::{AlgorithmResult, GridCityConfig, NetworkSource, Scenario, ScenarioConfig};

#[cfg(test)]
mod test_utils;
