use itertools::iproduct;

use super::network::{FlowMatrix, OdPair, RoadNetwork};
use super::shortest_path::{floyd_warshall, path_travel_time};


#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub origin: usize,
    pub destination: usize,
    pub path: Vec<usize>,
    pub travel_time: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteSummary {
    pub od: OdPair,
    pub route: Route,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkLoad {
    pub from: usize,
    pub to: usize,
    pub forward_flow: f64,
    pub backward_flow: f64,
    pub capacity: f64,
}

impl LinkLoad {
    pub fn total_flow(&self) -> f64 {
        self.forward_flow + self.backward_flow
    }

    pub fn volume_capacity_ratio(&self) -> f64 {
        if self.capacity > 0. {
            self.total_flow() / self.capacity
        } else if self.total_flow() > 0. {
            f64::INFINITY
        } else {
            0.
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Corridor {
    pub route: Route,
    pub link_flows: Vec<f64>,
}


pub fn free_flow_routes(network: &RoadNetwork) -> Vec<Route> {
    let cost = network.get_free_flow_times();
    let shortest_paths = floyd_warshall(cost);
    let size = network.get_num_nodes();
    iproduct!(0..size, 0..size).
        filter(|(ii, jj)| ii != jj).
        filter_map(|(ii, jj)| {
            let path = shortest_paths.path(ii, jj);
            if path.is_empty() {
                return None;
            }
            let travel_time = path_travel_time(cost, &path);
            Some(Route {origin: ii, destination: jj, path, travel_time})
        }).
        collect()
}

pub fn route_summaries(network: &RoadNetwork, flow: &FlowMatrix) -> Vec<RouteSummary> {
    let congested_time = network.congested_time(flow);
    let shortest_paths = floyd_warshall(&congested_time);
    network.get_od_pairs().iter().map(|od| {
        let path = shortest_paths.path(od.origin, od.destination);
        let travel_time = if path.is_empty() {
            f64::INFINITY
        } else {
            path_travel_time(&congested_time, &path)
        };
        RouteSummary {
            od: *od,
            route: Route {origin: od.origin, destination: od.destination, path, travel_time},
        }
    }).collect()
}

pub fn corridor(network: &RoadNetwork, flow: &FlowMatrix, origin: usize, destination: usize)
                -> Corridor {
    let congested_time = network.congested_time(flow);
    let path = floyd_warshall(&congested_time).path(origin, destination);
    let travel_time = if path.is_empty() {
        f64::INFINITY
    } else {
        path_travel_time(&congested_time, &path)
    };
    let link_flows = path.windows(2).map(|pair| flow[[pair[0], pair[1]]]).collect();
    Corridor {
        route: Route {origin, destination, path, travel_time},
        link_flows,
    }
}

pub fn link_loads(network: &RoadNetwork, flow: &FlowMatrix) -> Vec<LinkLoad> {
    let capacity = network.get_capacity_matrix();
    network.get_links().iter().map(|&(ii, jj)| {
        LinkLoad {
            from: ii,
            to: jj,
            forward_flow: flow[[ii, jj]],
            backward_flow: flow[[jj, ii]],
            capacity: capacity[[ii, jj]],
        }
    }).collect()
}

pub fn path_names<'a>(network: &'a RoadNetwork, path: &[usize]) -> Vec<&'a str> {
    path.iter().filter_map(|idx| network.get_node_name_by_idx(*idx)).collect()
}
