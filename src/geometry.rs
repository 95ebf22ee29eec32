#[derive(PartialEq, Debug, Clone)]
pub struct Point2d {
    pub x_coord: f64,
    pub y_coord: f64,
}

impl Point2d {
    pub fn new(x_coord: f64, y_coord: f64) -> Point2d {
        Point2d{x_coord, y_coord}
    }

    pub fn as_array(&self) -> [f64; 2] {
        [self.x_coord, self.y_coord]
    }

    pub fn minus(&self, other: &Point2d) -> Point2d {
        Point2d::new(self.x_coord - other.x_coord, self.y_coord - other.y_coord)
    }

    pub fn euclidean_distance(&self, other: &Point2d) -> f64 {
        let diff = self.minus(other);
        (diff.x_coord.powi(2) + diff.y_coord.powi(2)).sqrt()
    }
}


/// Free-flow travel time in minutes over a straight segment between two points, with distance
/// in the same units as the speed's numerator (e.g. km and km/h).
pub fn free_flow_minutes(pos1: &Point2d, pos2: &Point2d, speed_max: f64) -> f64 {
    60. * pos1.euclidean_distance(pos2) / speed_max
}
