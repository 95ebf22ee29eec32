use super::network::{DemandSpec, LinkSpec, NodeSpec, RoadNetwork};


/// Two nodes ten units apart, joined by a link with a 60 unit/hour limit, so the free-flow time
/// is 10 minutes.  All demand goes from A to B.
pub fn two_node_network(capacity: f64, demand: f64) -> RoadNetwork {
    let nodes = vec![NodeSpec::new("A", 0., 0.), NodeSpec::new("B", 10., 0.)];
    let links = vec![LinkSpec::new("A", "B", capacity, 60.)];
    let demand = vec![DemandSpec::new("A", "B", demand)];
    RoadNetwork::new(nodes, &links, &demand).unwrap()
}

/// A 3-4-5 triangle.  The direct A-C link takes 6 minutes but only has capacity 100; going
/// through B takes 5 + 5 minutes on links with capacity 1000.
pub fn triangle_network(demand: Vec<DemandSpec>) -> RoadNetwork {
    let nodes = vec![NodeSpec::new("A", 0., 0.), NodeSpec::new("B", 3., 4.),
                     NodeSpec::new("C", 6., 0.)];
    let links = vec![LinkSpec::new("A", "B", 1000., 60.),
                     LinkSpec::new("B", "C", 1000., 60.),
                     LinkSpec::new("A", "C", 100., 60.)];
    RoadNetwork::new(nodes, &links, &demand).unwrap()
}

/// A grid of one-minute links with capacity 2000.  Nodes are named "n{x}_{y}".
pub fn grid_network(num_x: usize, num_y: usize, demand: Vec<DemandSpec>) -> RoadNetwork {
    let mut nodes = vec![];
    let mut links = vec![];
    for xx in 0..num_x {
        for yy in 0..num_y {
            let name = format!("n{}_{}", xx, yy);
            nodes.push(NodeSpec::new(&name, xx as f64, yy as f64));
            if xx > 0 {
                links.push(LinkSpec::new(&format!("n{}_{}", xx - 1, yy), &name, 2000., 60.));
            }
            if yy > 0 {
                links.push(LinkSpec::new(&format!("n{}_{}", xx, yy - 1), &name, 2000., 60.));
            }
        }
    }
    RoadNetwork::new(nodes, &links, &demand).unwrap()
}
