use geo::{Coord, CoordFloat};
use num_traits::AsPrimitive;

/// Mean earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Returns the great-circle (haversine) distance in meters between
/// `a` and `b`.
///
/// Identical points yield exactly zero, and the result does not
/// depend on argument order.
pub fn distance<T>(a: Coord<T>, b: Coord<T>) -> T
where
    T: CoordFloat + 'static,
    f64: AsPrimitive<T>,
{
    let one = T::one();
    let two = one + one;

    let lat1 = a.y.to_radians();
    let lat2 = b.y.to_radians();
    let dlat = (b.y - a.y).to_radians();
    let dlon = (b.x - a.x).to_radians();

    let h = (dlat / two).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / two).sin().powi(2);
    // Rounding can push `h` just past 1 for antipodal points. NaN
    // must pass through untouched.
    let h = if h > one { one } else { h };
    let c = two * h.sqrt().atan2((one - h).sqrt());

    let earth_radius: T = EARTH_RADIUS_M.as_();
    earth_radius * c
}

/// Returns the planar bearing, in radians, from `a` to `b`.
///
/// This is `atan2(Δlon, Δlat)` on raw degrees: 0 points north and
/// π/2 points east. It is not a true initial great-circle course.
pub fn bearing<T: CoordFloat>(a: Coord<T>, b: Coord<T>) -> T {
    (b.x - a.x).atan2(b.y - a.y)
}
