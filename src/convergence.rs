use ndarray::prelude::*;
use ndarray::Zip;


/// Total absolute change between two flow states, relative to the total of the new one.
/// Returns None when the new state carries no flow at all.
pub fn relative_flow_change(old_flow: &Array<f64, Ix2>, new_flow: &Array<f64, Ix2>)
                            -> Option<f64> {
    let mut total_diff = 0.;
    Zip::from(old_flow).and(new_flow).for_each(|old, new| {
        total_diff += (new - old).abs();
    });
    let total_flow = new_flow.sum();
    if total_flow == 0. {
        return None;
    }
    Some(total_diff / total_flow)
}

pub fn converged(old_flow: &Array<f64, Ix2>, new_flow: &Array<f64, Ix2>, threshold: f64) -> bool {
    match relative_flow_change(old_flow, new_flow) {
        Some(change) => change < threshold,
        None => true,
    }
}
