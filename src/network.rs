// this file defines the road network the assignment algorithms run on: node and link topology,
// capacities, free-flow times, and the origin-destination demand.
use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use ndarray::prelude::*;
use petgraph::algo::kosaraju_scc;
use petgraph::graphmap::DiGraphMap;

use super::congestion;
use super::geometry::{free_flow_minutes, Point2d};


/// Directed flow between every pair of nodes, in vehicles per hour.
pub type FlowMatrix = Array<f64, Ix2>;

#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    UnknownNode { name: String, context: &'static str },
    DuplicateNode(String),
    SelfLoop(String),
    InvalidLink { from: String, to: String, reason: String },
    InvalidDemand { from: String, to: String, amount: f64 },
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NetworkError::UnknownNode { name, context } =>
                write!(f, "unknown node '{}' referenced in {}", name, context),
            NetworkError::DuplicateNode(name) => write!(f, "node '{}' is defined twice", name),
            NetworkError::SelfLoop(name) => write!(f, "link connects node '{}' to itself", name),
            NetworkError::InvalidLink { from, to, reason } =>
                write!(f, "invalid link {}-{}: {}", from, to, reason),
            NetworkError::InvalidDemand { from, to, amount } =>
                write!(f, "invalid demand {} from {} to {}", amount, from, to),
        }
    }
}

impl Error for NetworkError {}


#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub name: String,
    pub position: Point2d,
}

impl NodeSpec {
    pub fn new(name: &str, x_coord: f64, y_coord: f64) -> NodeSpec {
        NodeSpec {
            name: String::from(name),
            position: Point2d::new(x_coord, y_coord),
        }
    }
}

/// An undirected road segment.  Capacity is in vehicles per hour and speed_max in distance units
/// per hour.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkSpec {
    pub from: String,
    pub to: String,
    pub capacity: f64,
    pub speed_max: f64,
}

impl LinkSpec {
    pub fn new(from: &str, to: &str, capacity: f64, speed_max: f64) -> LinkSpec {
        LinkSpec {
            from: String::from(from),
            to: String::from(to),
            capacity,
            speed_max,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DemandSpec {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

impl DemandSpec {
    pub fn new(from: &str, to: &str, amount: f64) -> DemandSpec {
        DemandSpec {
            from: String::from(from),
            to: String::from(to),
            amount,
        }
    }
}

/// A travel demand between two node indices.  Several pairs may share the same endpoints; each
/// is assigned on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OdPair {
    pub origin: usize,
    pub destination: usize,
    pub demand: f64,
}

impl OdPair {
    pub fn new(origin: usize, destination: usize, demand: f64) -> OdPair {
        OdPair {origin, destination, demand}
    }
}


pub struct RoadNetwork {
    node_names: Vec<String>,
    node_idxs_by_name: HashMap<String, usize>,
    node_positions: Vec<Point2d>,
    // each undirected link once, as (smaller index, larger index)
    links: Vec<(usize, usize)>,
    adjacency: Array<bool, Ix2>,
    // vehicles per hour; zero where there's no link
    capacity: Array<f64, Ix2>,
    // minutes; infinite where there's no link, zero on the diagonal
    free_flow_time: Array<f64, Ix2>,
    od_pairs: Vec<OdPair>,
}

impl RoadNetwork {
    /// Resolves all names to indices and derives the topology matrices.  Nodes are indexed in
    /// the order given.  Fails on the first unknown or duplicated name, before anything is
    /// computed.
    pub fn new(nodes: Vec<NodeSpec>, links: &[LinkSpec], demand: &[DemandSpec])
               -> Result<RoadNetwork, NetworkError> {
        let size = nodes.len();
        let mut node_idxs_by_name = HashMap::new();
        let mut node_names = Vec::with_capacity(size);
        let mut node_positions = Vec::with_capacity(size);
        for (idx, node) in nodes.into_iter().enumerate() {
            if node_idxs_by_name.insert(node.name.clone(), idx).is_some() {
                return Err(NetworkError::DuplicateNode(node.name));
            }
            node_names.push(node.name);
            node_positions.push(node.position);
        }

        let lookup = |name: &str, context: &'static str| -> Result<usize, NetworkError> {
            match node_idxs_by_name.get(name) {
                Some(idx) => Ok(*idx),
                None => Err(NetworkError::UnknownNode { name: String::from(name), context }),
            }
        };

        let mut adjacency = Array::from_elem((size, size), false);
        let mut capacity = Array::zeros((size, size));
        let mut free_flow_time = Array::from_elem((size, size), f64::INFINITY);
        for ii in 0..size {
            free_flow_time[[ii, ii]] = 0.;
        }

        let mut link_list = vec![];
        for link in links {
            let ii = lookup(&link.from, "link")?;
            let jj = lookup(&link.to, "link")?;
            if ii == jj {
                return Err(NetworkError::SelfLoop(link.from.clone()));
            }
            let invalid = |reason: &str| NetworkError::InvalidLink {
                from: link.from.clone(),
                to: link.to.clone(),
                reason: String::from(reason),
            };
            if !(link.speed_max > 0.) || !link.speed_max.is_finite() {
                return Err(invalid("speed limit must be positive"));
            }
            if !(link.capacity >= 0.) || !link.capacity.is_finite() {
                return Err(invalid("capacity must be non-negative"));
            }
            if link.capacity == 0. {
                log::warn!("link {}-{} has zero capacity and is impassable under congestion",
                           link.from, link.to);
            }
            if adjacency[[ii, jj]] {
                log::warn!("link {}-{} is defined more than once; keeping the last definition",
                           link.from, link.to);
            } else {
                link_list.push((ii.min(jj), ii.max(jj)));
            }

            let time = free_flow_minutes(&node_positions[ii], &node_positions[jj],
                                         link.speed_max);
            for &(aa, bb) in &[(ii, jj), (jj, ii)] {
                adjacency[[aa, bb]] = true;
                capacity[[aa, bb]] = link.capacity;
                free_flow_time[[aa, bb]] = time;
            }
        }

        let mut od_pairs = Vec::with_capacity(demand.len());
        for dmd in demand {
            let origin = lookup(&dmd.from, "demand")?;
            let destination = lookup(&dmd.to, "demand")?;
            if !(dmd.amount >= 0.) || !dmd.amount.is_finite() {
                return Err(NetworkError::InvalidDemand {
                    from: dmd.from.clone(),
                    to: dmd.to.clone(),
                    amount: dmd.amount,
                });
            }
            od_pairs.push(OdPair::new(origin, destination, dmd.amount));
        }

        let network = RoadNetwork {
            node_names,
            node_idxs_by_name,
            node_positions,
            links: link_list,
            adjacency,
            capacity,
            free_flow_time,
            od_pairs,
        };

        let comps = network.connected_components();
        if comps.len() > 1 {
            log::warn!("there are {} connected components", comps.len());
        }
        log::info!("built network with {} nodes, {} links, and {} od pairs",
                   network.get_num_nodes(), network.links.len(), network.od_pairs.len());
        Ok(network)
    }

    pub fn congested_time(&self, flow: &FlowMatrix) -> Array<f64, Ix2> {
        congestion::congested_times(&self.adjacency, &self.capacity, &self.free_flow_time, flow)
    }

    pub fn total_travel_time(&self, flow: &FlowMatrix) -> f64 {
        congestion::total_travel_time(&self.adjacency, &self.capacity, &self.free_flow_time,
                                      flow)
    }

    pub fn empty_flow(&self) -> FlowMatrix {
        Array::zeros((self.get_num_nodes(), self.get_num_nodes()))
    }

    pub fn connected_components(&self) -> Vec<Vec<usize>> {
        let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();
        for idx in 0..self.get_num_nodes() {
            graph.add_node(idx);
        }
        for &(ii, jj) in &self.links {
            graph.add_edge(ii, jj, ());
            graph.add_edge(jj, ii, ());
        }
        kosaraju_scc(&graph)
    }

    pub fn get_num_nodes(&self) -> usize {
        self.node_names.len()
    }

    pub fn get_node_idx_by_name(&self, name: &str) -> Option<usize> {
        self.node_idxs_by_name.get(name).copied()
    }

    pub fn get_node_name_by_idx(&self, idx: usize) -> Option<&str> {
        self.node_names.get(idx).map(|name| name.as_str())
    }

    pub fn get_node_names(&self) -> &Vec<String> {
        &self.node_names
    }

    pub fn get_node_positions(&self) -> &Vec<Point2d> {
        &self.node_positions
    }

    pub fn get_links(&self) -> &Vec<(usize, usize)> {
        &self.links
    }

    pub fn get_adjacency(&self) -> &Array<bool, Ix2> {
        &self.adjacency
    }

    pub fn get_capacity_matrix(&self) -> &Array<f64, Ix2> {
        &self.capacity
    }

    pub fn get_free_flow_times(&self) -> &Array<f64, Ix2> {
        &self.free_flow_time
    }

    pub fn get_od_pairs(&self) -> &Vec<OdPair> {
        &self.od_pairs
    }

    pub fn get_total_demand(&self) -> f64 {
        self.od_pairs.iter().map(|od| od.demand).sum()
    }
}
