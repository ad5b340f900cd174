use geo::{Coord, CoordFloat};
use num_traits::AsPrimitive;

/// Approximate length of one degree of latitude, in meters.
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Converts a distance in meters to a degree offset near
/// `ref_lat_deg`, treating the earth as locally flat.
///
/// Returns `x` as degrees of longitude and `y` as degrees of
/// latitude. Longitude degrees grow without bound toward the poles.
/// At ±90° the cosine rounds to about 6e-17 rather than zero, so the
/// result is enormous but usually finite; callers must check its
/// magnitude as well as finiteness before use.
pub fn meters_to_degrees<T>(meters: T, ref_lat_deg: T) -> Coord<T>
where
    T: CoordFloat + 'static,
    f64: AsPrimitive<T>,
{
    let m_per_deg: T = METERS_PER_DEGREE.as_();
    Coord {
        x: meters / (m_per_deg * ref_lat_deg.to_radians().cos()),
        y: meters / m_per_deg,
    }
}
