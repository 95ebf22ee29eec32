use itertools::iproduct;
use itertools::Itertools;
use ndarray::prelude::*;


/// All-pairs shortest path distances, along with the first hop of a shortest path from every
/// node towards every other node.
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    dist: Array<f64, Ix2>,
    // None when the pair is disconnected, or on the diagonal.
    next_hops: Array<Option<usize>, Ix2>,
}

impl ShortestPaths {
    pub fn get_distance(&self, origin: usize, destination: usize) -> f64 {
        self.dist[[origin, destination]]
    }

    pub fn get_distances(&self) -> &Array<f64, Ix2> {
        &self.dist
    }

    pub fn get_next_hop(&self, origin: usize, destination: usize) -> Option<usize> {
        self.next_hops[[origin, destination]]
    }

    /// Walks the next-hop matrix from origin to destination.  Returns the single-node path for
    /// origin == destination, and an empty path if the destination can't be reached.
    pub fn path(&self, origin: usize, destination: usize) -> Vec<usize> {
        if origin == destination {
            return vec![origin];
        }
        let mut current = match self.next_hops[[origin, destination]] {
            Some(hop) => hop,
            None => return vec![],
        };

        let mut path = vec![origin, current];
        while current != destination {
            current = match self.next_hops[[current, destination]] {
                Some(hop) => hop,
                None => {
                    log::error!("next-hop chain from {} to {} breaks at {}", origin,
                                destination, current);
                    return vec![];
                }
            };
            path.push(current);
            // a simple path never visits more than every node once
            if path.len() > self.dist.nrows() {
                log::error!("next-hop chain from {} to {} contains a cycle", origin, destination);
                return vec![];
            }
        }
        path
    }
}


/// Floyd-Warshall over a square matrix of non-negative edge costs.  Infinite entries mean there
/// is no edge; the diagonal is treated as zero whatever the matrix holds.  When two paths tie,
/// the first one found is kept.
pub fn floyd_warshall(cost: &Array<f64, Ix2>) -> ShortestPaths {
    let size = cost.nrows();
    let mut dist = Array::from_elem((size, size), f64::INFINITY);
    let mut next_hops = Array::from_elem((size, size), None);
    for (ii, jj) in iproduct!(0..size, 0..size) {
        if ii == jj {
            dist[[ii, jj]] = 0.;
        } else if cost[[ii, jj]] < f64::INFINITY {
            dist[[ii, jj]] = cost[[ii, jj]];
            next_hops[[ii, jj]] = Some(jj);
        }
    }

    for kk in 0..size {
        for ii in 0..size {
            let dist_ik = dist[[ii, kk]];
            if dist_ik == f64::INFINITY {
                continue;
            }
            for jj in 0..size {
                let through_k = dist_ik + dist[[kk, jj]];
                if through_k < dist[[ii, jj]] {
                    dist[[ii, jj]] = through_k;
                    next_hops[[ii, jj]] = next_hops[[ii, kk]];
                }
            }
        }
    }

    ShortestPaths {dist, next_hops}
}

pub fn shortest_path(cost: &Array<f64, Ix2>, origin: usize, destination: usize) -> Vec<usize> {
    floyd_warshall(cost).path(origin, destination)
}

pub fn path_travel_time(cost: &Array<f64, Ix2>, path: &[usize]) -> f64 {
    path.iter().tuple_windows().map(|(ii, jj)| cost[[*ii, *jj]]).sum()
}


#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use petgraph::algo::dijkstra;
    use petgraph::graph::{DiGraph, NodeIndex};
    use rand::Rng;
    use rand::SeedableRng;
    use rand_isaac::Isaac64Rng;

    use super::*;

    static INF: f64 = f64::INFINITY;

    fn line_costs() -> Array<f64, Ix2> {
        // 0 - 1 - 2, plus a slow direct edge 0 - 2
        array![[0., 1., 5.],
               [1., 0., 2.],
               [5., 2., 0.]]
    }

    fn random_costs(size: usize, density: f64, seed: u64) -> Array<f64, Ix2> {
        let mut rng = Isaac64Rng::seed_from_u64(seed);
        let mut cost = Array::from_elem((size, size), INF);
        for (ii, jj) in iproduct!(0..size, 0..size) {
            if ii == jj {
                cost[[ii, jj]] = 0.;
            } else if rng.gen::<f64>() < density {
                cost[[ii, jj]] = rng.gen_range(1.0..20.0);
            }
        }
        cost
    }

    #[test]
    fn test_simple_paths() {
        let sps = floyd_warshall(&line_costs());
        assert_eq!(sps.get_distance(0, 2), 3.);
        assert_eq!(sps.path(0, 2), vec![0, 1, 2]);
        assert_eq!(sps.path(2, 0), vec![2, 1, 0]);
        assert_eq!(sps.path(0, 1), vec![0, 1]);
        assert_eq!(sps.get_next_hop(0, 2), Some(1));
        assert_eq!(shortest_path(&line_costs(), 0, 2), vec![0, 1, 2]);
    }

    #[test]
    fn test_diagonal() {
        let mut cost = line_costs();
        // a non-zero self cost must not matter
        cost[[1, 1]] = 7.;
        let sps = floyd_warshall(&cost);
        for ii in 0..3 {
            assert_eq!(sps.get_distance(ii, ii), 0.);
            assert_eq!(sps.path(ii, ii), vec![ii]);
            assert_eq!(sps.get_next_hop(ii, ii), None);
        }
    }

    #[test]
    fn test_disconnected_pair() {
        let cost = array![[0., 1., INF],
                          [1., 0., INF],
                          [INF, INF, 0.]];
        let sps = floyd_warshall(&cost);
        assert_eq!(sps.get_distance(0, 2), INF);
        assert_eq!(sps.get_next_hop(0, 2), None);
        assert!(sps.path(0, 2).is_empty());
        assert!(sps.path(2, 1).is_empty());
        assert!(shortest_path(&cost, 1, 2).is_empty());
    }

    #[test]
    fn test_directed_costs() {
        // 0 -> 1 is cheap but 1 -> 0 must go around through 2
        let cost = array![[0., 1., INF],
                          [INF, 0., 1.],
                          [1., INF, 0.]];
        let sps = floyd_warshall(&cost);
        assert_eq!(sps.path(1, 0), vec![1, 2, 0]);
        assert_eq!(sps.get_distance(1, 0), 2.);
        assert_eq!(sps.path(0, 1), vec![0, 1]);
    }

    #[test]
    fn test_first_improvement_wins_ties() {
        // both 0-1-3 and 0-2-3 cost 2; only a strict improvement replaces the first one found
        let cost = array![[0., 1., 1., INF],
                          [1., 0., INF, 1.],
                          [1., INF, 0., 1.],
                          [INF, 1., 1., 0.]];
        let sps = floyd_warshall(&cost);
        assert_eq!(sps.get_distance(0, 3), 2.);
        assert_eq!(sps.path(0, 3), vec![0, 1, 3]);
    }

    #[test]
    fn test_triangle_inequality() {
        let cost = random_costs(12, 0.3, 42);
        let sps = floyd_warshall(&cost);
        let dist = sps.get_distances();
        for (ii, jj, kk) in iproduct!(0..12, 0..12, 0..12) {
            assert!(dist[[ii, jj]] <= dist[[ii, kk]] + dist[[kk, jj]] + 1e-9);
        }
    }

    #[test]
    fn test_paths_match_distances() {
        let cost = random_costs(15, 0.2, 7);
        let sps = floyd_warshall(&cost);
        for (ii, jj) in iproduct!(0..15, 0..15) {
            let path = sps.path(ii, jj);
            if sps.get_distance(ii, jj) == INF {
                assert!(path.is_empty());
                continue;
            }
            assert_eq!(path[0], ii);
            assert_eq!(*path.last().unwrap(), jj);
            // no node is visited twice
            assert_eq!(path.iter().unique().count(), path.len());
            assert_relative_eq!(path_travel_time(&cost, &path), sps.get_distance(ii, jj),
                                epsilon = 1e-9);
        }
    }

    #[test]
    fn test_distances_agree_with_dijkstra() {
        let size = 15;
        let cost = random_costs(size, 0.25, 1234);
        let mut graph: DiGraph<(), f64> = DiGraph::new();
        let nodes: Vec<NodeIndex> = (0..size).map(|_| graph.add_node(())).collect();
        for (ii, jj) in iproduct!(0..size, 0..size) {
            if ii != jj && cost[[ii, jj]] < INF {
                graph.add_edge(nodes[ii], nodes[jj], cost[[ii, jj]]);
            }
        }

        let sps = floyd_warshall(&cost);
        for ii in 0..size {
            let scores = dijkstra(&graph, nodes[ii], None, |edge| *edge.weight());
            for jj in 0..size {
                match scores.get(&nodes[jj]) {
                    Some(score) => assert_relative_eq!(sps.get_distance(ii, jj), *score,
                                                       epsilon = 1e-9),
                    None => assert_eq!(sps.get_distance(ii, jj), INF),
                }
            }
        }
    }

    #[test]
    fn test_path_travel_time() {
        let cost = line_costs();
        assert_eq!(path_travel_time(&cost, &[0, 1, 2]), 3.);
        assert_eq!(path_travel_time(&cost, &[0, 2]), 5.);
        assert_eq!(path_travel_time(&cost, &[1]), 0.);
        assert_eq!(path_travel_time(&cost, &[]), 0.);
    }
}
