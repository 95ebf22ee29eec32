use std::error::Error;
use std::fmt;

use ndarray::Zip;
use rayon::prelude::*;

use super::convergence::{converged, relative_flow_change};
use super::network::{FlowMatrix, OdPair, RoadNetwork};
use super::shortest_path::{floyd_warshall, ShortestPaths};


pub const DEFAULT_INCREMENTS: usize = 4;
pub const DEFAULT_MAX_ITERATIONS: usize = 10;
pub const DEFAULT_CONVERGENCE_THRESHOLD: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AssignmentError {
    NoIncrements,
    NoIterations,
    BadThreshold(f64),
}

impl fmt::Display for AssignmentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AssignmentError::NoIncrements => write!(f, "increments must be at least 1"),
            AssignmentError::NoIterations => write!(f, "max_iterations must be at least 1"),
            AssignmentError::BadThreshold(threshold) =>
                write!(f, "convergence threshold must be positive, got {}", threshold),
        }
    }
}

impl Error for AssignmentError {}


#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignmentParams {
    pub increments: usize,
    pub max_iterations: usize,
    pub convergence_threshold: f64,
}

impl Default for AssignmentParams {
    fn default() -> AssignmentParams {
        AssignmentParams {
            increments: DEFAULT_INCREMENTS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            convergence_threshold: DEFAULT_CONVERGENCE_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Algorithm {
    /// Every demand goes on its free-flow shortest path in a single pass.
    AllOrNothing,
    /// Demands are split into equal slices, each routed on the shortest path under the
    /// congestion accumulated so far.
    Incremental { increments: usize },
    /// Repeated all-or-nothing loading against congested times, blended into the running
    /// flow with a fixed step size.
    Equilibrium { max_iterations: usize, convergence_threshold: f64 },
}

impl Algorithm {
    pub fn all_from_params(params: &AssignmentParams) -> Vec<Algorithm> {
        vec![
            Algorithm::AllOrNothing,
            Algorithm::Incremental { increments: params.increments },
            Algorithm::Equilibrium {
                max_iterations: params.max_iterations,
                convergence_threshold: params.convergence_threshold,
            },
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::AllOrNothing => "all-or-nothing",
            Algorithm::Incremental { .. } => "incremental",
            Algorithm::Equilibrium { .. } => "equilibrium",
        }
    }

    pub fn validate(&self) -> Result<(), AssignmentError> {
        match *self {
            Algorithm::AllOrNothing => Ok(()),
            Algorithm::Incremental { increments } if increments == 0 =>
                Err(AssignmentError::NoIncrements),
            Algorithm::Incremental { .. } => Ok(()),
            Algorithm::Equilibrium { max_iterations, .. } if max_iterations == 0 =>
                Err(AssignmentError::NoIterations),
            Algorithm::Equilibrium { convergence_threshold, .. }
            if !(convergence_threshold > 0.) =>
                Err(AssignmentError::BadThreshold(convergence_threshold)),
            Algorithm::Equilibrium { .. } => Ok(()),
        }
    }
}


#[derive(Debug, Clone)]
pub struct EquilibriumOutcome {
    pub flow: FlowMatrix,
    pub iterations: usize,
    pub converged: bool,
}

/// Runs one assignment policy on the network and returns the flow it produces.
pub fn run(network: &RoadNetwork, algorithm: &Algorithm) -> Result<FlowMatrix, AssignmentError> {
    algorithm.validate()?;
    log::info!("running {} assignment", algorithm.name());
    let flow = match *algorithm {
        Algorithm::AllOrNothing => all_or_nothing_assignment(network),
        Algorithm::Incremental { increments } => incremental_assignment(network, increments)?,
        Algorithm::Equilibrium { max_iterations, convergence_threshold } =>
            equilibrium_assignment(network, max_iterations, convergence_threshold)?.flow,
    };
    log::info!("{} assignment finished, total travel time {:.1} minutes", algorithm.name(),
               network.total_travel_time(&flow));
    Ok(flow)
}

pub fn all_or_nothing_assignment(network: &RoadNetwork) -> FlowMatrix {
    let shortest_paths = floyd_warshall(network.get_free_flow_times());
    let mut flow = network.empty_flow();
    load_all_or_nothing(network.get_od_pairs(), &shortest_paths, &mut flow);
    flow
}

/// Routes each OD pair's demand in `increments` equal slices, re-solving shortest paths under
/// the current congestion before every slice.  OD pairs are handled in their given order, and
/// all of one pair's slices are loaded before the next pair starts, so earlier pairs see less
/// congestion.
pub fn incremental_assignment(network: &RoadNetwork, increments: usize)
                              -> Result<FlowMatrix, AssignmentError> {
    Algorithm::Incremental { increments }.validate()?;
    let mut flow = network.empty_flow();
    for od in network.get_od_pairs() {
        let slice = od.demand / increments as f64;
        for inc in 0..increments {
            let congested_time = network.congested_time(&flow);
            let shortest_paths = floyd_warshall(&congested_time);
            let path = shortest_paths.path(od.origin, od.destination);
            if path.is_empty() {
                if inc == 0 {
                    log::warn!("no path from {} to {}, skipping its demand", od.origin,
                               od.destination);
                }
                continue;
            }
            log::debug!("slice {} of od {}->{} follows {:?}", inc, od.origin, od.destination,
                        path);
            add_flow_along_path(&mut flow, &path, slice);
        }
    }
    Ok(flow)
}

// not a line search: the step depends only on the number of OD pairs
pub fn equilibrium_step_size(num_od_pairs: usize) -> f64 {
    2. / (2. + num_od_pairs as f64)
}

pub fn equilibrium_assignment(network: &RoadNetwork, max_iterations: usize,
                              convergence_threshold: f64)
                              -> Result<EquilibriumOutcome, AssignmentError> {
    Algorithm::Equilibrium { max_iterations, convergence_threshold }.validate()?;
    let od_pairs = network.get_od_pairs();
    let step_size = equilibrium_step_size(od_pairs.len());
    let mut flow = network.empty_flow();

    for iteration in 0..max_iterations {
        let congested_time = network.congested_time(&flow);
        let shortest_paths = floyd_warshall(&congested_time);
        let mut auxiliary_flow = network.empty_flow();
        load_all_or_nothing(od_pairs, &shortest_paths, &mut auxiliary_flow);

        let new_flow = blend_flows(&flow, &auxiliary_flow, step_size);
        log::debug!("iteration {}: step size {:.4}, relative change {:?}", iteration + 1,
                    step_size, relative_flow_change(&flow, &new_flow));
        if converged(&flow, &new_flow, convergence_threshold) {
            log::info!("equilibrium iteration converged after {} iterations", iteration + 1);
            return Ok(EquilibriumOutcome {
                flow: new_flow,
                iterations: iteration + 1,
                converged: true,
            });
        }
        flow = new_flow;
    }

    log::warn!("equilibrium iteration did not converge within {} iterations", max_iterations);
    Ok(EquilibriumOutcome {
        flow,
        iterations: max_iterations,
        converged: false,
    })
}

/// (1 - step) * flow + step * auxiliary, cell by cell.
pub fn blend_flows(flow: &FlowMatrix, auxiliary_flow: &FlowMatrix, step_size: f64) -> FlowMatrix {
    Zip::from(flow).and(auxiliary_flow).map_collect(|current, auxiliary| {
        (1. - step_size) * current + step_size * auxiliary
    })
}

// paths are extracted in parallel but added to the flow in OD order
fn load_all_or_nothing(od_pairs: &[OdPair], shortest_paths: &ShortestPaths,
                       flow: &mut FlowMatrix) {
    let paths: Vec<Vec<usize>> = od_pairs.par_iter().
        map(|od| shortest_paths.path(od.origin, od.destination)).collect();
    for (od, path) in od_pairs.iter().zip(paths.iter()) {
        if path.is_empty() {
            log::warn!("no path from {} to {}, skipping its demand", od.origin, od.destination);
            continue;
        }
        add_flow_along_path(flow, path, od.demand);
    }
}

fn add_flow_along_path(flow: &mut FlowMatrix, path: &[usize], amount: f64) {
    for pair in path.windows(2) {
        flow[[pair[0], pair[1]]] += amount;
    }
}
