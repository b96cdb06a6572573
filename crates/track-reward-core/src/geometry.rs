//! Track geometry helpers shared by every reward variant

/// A point on the track plane, `[x, y]`
pub type Point = [f64; 2];

/// Waypoint at `index`, treating the list as a closed loop.
///
/// Negative indices count back from the end, and indices past the end wrap to
/// the start, so `-1` is the last waypoint and `len` is the first.
///
/// # Panics
///
/// Panics if `waypoints` is empty. [`Observation`](crate::Observation)
/// rejects empty waypoint lists at parse time.
pub fn waypoint_at(waypoints: &[Point], index: i64) -> Point {
    let len = waypoints.len() as i64;
    waypoints[index.rem_euclid(len) as usize]
}

/// Bearing in degrees of the vector from `from` to `to`, in -180..=180
pub fn bearing(from: Point, to: Point) -> f64 {
    (to[1] - from[1]).atan2(to[0] - from[0]).to_degrees()
}

/// Bearing from the previous closest waypoint to the next one
pub fn track_direction(waypoints: &[Point], prev: i64, next: i64) -> f64 {
    bearing(waypoint_at(waypoints, prev), waypoint_at(waypoints, next))
}

/// Absolute difference between track direction and vehicle heading.
///
/// Not wrapped into 0..=180: a car heading -170 on a track pointing 170 reads
/// as 340 degrees off. The heuristics were tuned against this raw value.
pub fn heading_error(track_direction: f64, heading: f64) -> f64 {
    (track_direction - heading).abs()
}

/// Signed change of bearing across the current waypoint segment.
///
/// Compares the bearing just ahead (`next` to `next + 1`) against the bearing
/// just behind (`prev - 1` to `prev`).
pub fn turn_angle(waypoints: &[Point], prev: i64, next: i64, wrap: f64) -> f64 {
    // Reduce first so the neighbour offsets cannot overflow
    let len = waypoints.len() as i64;
    let (prev, next) = (prev.rem_euclid(len), next.rem_euclid(len));

    let behind = bearing(waypoint_at(waypoints, prev - 1), waypoint_at(waypoints, prev));
    let ahead = bearing(waypoint_at(waypoints, next), waypoint_at(waypoints, next + 1));

    let mut diff = ahead - behind;
    // The first condition can never hold (nothing is both above `wrap` and
    // below `-wrap`), so differences above `wrap` are left unwrapped. Kept
    // as-is: rewards were tuned with this normalization.
    if diff > wrap && diff < -wrap {
        diff -= 2.0 * wrap;
    } else if diff < -wrap {
        diff += 2.0 * wrap;
    }
    diff
}
