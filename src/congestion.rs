use itertools::iproduct;
use ndarray::prelude::*;


/// Quadratic volume-delay curve: t = t0 * (1 + q / c)^2, infinite for a link with no capacity.
pub fn volume_delay(free_flow_time: f64, flow: f64, capacity: f64) -> f64 {
    if capacity <= 0. {
        return f64::INFINITY;
    }
    let ratio = flow / capacity;
    free_flow_time * (1. + ratio).powi(2)
}

pub fn congested_times(adjacency: &Array<bool, Ix2>, capacity: &Array<f64, Ix2>,
                       free_flow_time: &Array<f64, Ix2>, flow: &Array<f64, Ix2>)
                       -> Array<f64, Ix2> {
    Array::from_shape_fn(adjacency.dim(), |(ii, jj)| {
        if adjacency[[ii, jj]] {
            volume_delay(free_flow_time[[ii, jj]], flow[[ii, jj]], capacity[[ii, jj]])
        } else {
            f64::INFINITY
        }
    })
}

pub fn total_travel_time(adjacency: &Array<bool, Ix2>, capacity: &Array<f64, Ix2>,
                         free_flow_time: &Array<f64, Ix2>, flow: &Array<f64, Ix2>) -> f64 {
    let (nrows, ncols) = adjacency.dim();
    let mut total = 0.;
    for (ii, jj) in iproduct!(0..nrows, 0..ncols) {
        let link_flow = flow[[ii, jj]];
        if adjacency[[ii, jj]] && link_flow > 0. {
            let time = volume_delay(free_flow_time[[ii, jj]], link_flow, capacity[[ii, jj]]);
            total += time * link_flow;
        }
    }
    total
}


#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use super::*;

    fn two_node_matrices() -> (Array<bool, Ix2>, Array<f64, Ix2>, Array<f64, Ix2>) {
        let adjacency = array![[false, true], [true, false]];
        let capacity = array![[0., 1000.], [1000., 0.]];
        let free_flow_time = array![[0., 10.], [10., 0.]];
        (adjacency, capacity, free_flow_time)
    }

    #[test]
    fn test_volume_delay() {
        assert_eq!(volume_delay(10., 0., 1000.), 10.);
        assert_relative_eq!(volume_delay(10., 100., 1000.), 12.1, epsilon = 1e-9);
        // at capacity the time is quadrupled
        assert_relative_eq!(volume_delay(10., 1000., 1000.), 40.);
    }

    #[test]
    fn test_volume_delay_zero_capacity() {
        assert_eq!(volume_delay(10., 0., 0.), f64::INFINITY);
        assert_eq!(volume_delay(10., 50., 0.), f64::INFINITY);
    }

    #[test]
    fn test_congested_times() {
        let (adjacency, capacity, free_flow_time) = two_node_matrices();
        let flow = array![[0., 100.], [0., 0.]];
        let times = congested_times(&adjacency, &capacity, &free_flow_time, &flow);
        assert_relative_eq!(times[[0, 1]], 12.1, epsilon = 1e-9);
        assert_eq!(times[[1, 0]], 10.);
        assert_eq!(times[[0, 0]], f64::INFINITY);
        assert_eq!(times[[1, 1]], f64::INFINITY);
    }

    #[test]
    fn test_congested_times_zero_capacity_link() {
        let (adjacency, mut capacity, free_flow_time) = two_node_matrices();
        capacity[[0, 1]] = 0.;
        capacity[[1, 0]] = 0.;
        let flow = Array::zeros((2, 2));
        let times = congested_times(&adjacency, &capacity, &free_flow_time, &flow);
        assert!(times.iter().all(|tt| tt.is_infinite()));
    }

    #[test]
    fn test_total_travel_time() {
        let (adjacency, capacity, free_flow_time) = two_node_matrices();
        let flow = array![[0., 100.], [0., 0.]];
        let total = total_travel_time(&adjacency, &capacity, &free_flow_time, &flow);
        assert_relative_eq!(total, 1210., epsilon = 1e-9);

        let empty = Array::zeros((2, 2));
        assert_eq!(total_travel_time(&adjacency, &capacity, &free_flow_time, &empty), 0.);
    }
}
