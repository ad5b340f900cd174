//! Fresnel zone envelope polygons.
//!
//! The envelope is the 1st fresnel zone's footprint seen from above:
//! each centerline sample is pushed perpendicular to the link by its
//! (scaled) radius, once to either side. The upper side is walked
//! forward and the lower side backward so the result is a single
//! ring suitable for one fill polygon.

use crate::{
    error::RfGeoError,
    fresnel::{max_radius, radius_at_samples},
    geodesy::{bearing, distance},
    projection::meters_to_degrees,
    sample::sample_points,
};
use geo::{Coord, CoordFloat, LineString, Polygon};
use log::debug;
use num_traits::AsPrimitive;
use std::f64::consts::FRAC_PI_2;

/// Number of intervals along the link used to build an envelope.
pub const DEFAULT_SAMPLES: usize = 50;

/// Largest usable offsets, in degrees. Anything wider, or not
/// finite, collapses onto the centerline.
const MAX_LON_OFFSET_DEG: f64 = 180.0;
const MAX_LAT_OFFSET_DEG: f64 = 90.0;

/// Default rendered half-width of the envelope as a fraction of the
/// link length.
pub const DEFAULT_SCALE_FRACTION: f64 = 0.02;

/// Returns the envelope ring for a link from `a` to `b` at `f_ghz`,
/// with radii multiplied by `scale`.
///
/// The ring holds `2 * (DEFAULT_SAMPLES + 1)` points.
pub fn build_envelope<T>(a: Coord<T>, b: Coord<T>, f_ghz: T, scale: T) -> Vec<Coord<T>>
where
    T: CoordFloat + 'static,
    f64: AsPrimitive<T>,
    usize: AsPrimitive<T>,
{
    let centerline = sample_points(a, b, DEFAULT_SAMPLES);
    let radii_m = radius_at_samples(&centerline, a, b, f_ghz);
    offset_ring(a, b, &centerline, &radii_m, scale)
}

/// Returns the factor which widens an envelope so its largest
/// half-width is `fraction` of the link length.
///
/// Never less than 1, so true geometry is only ever exaggerated.
/// Returns 1 when `max_radius_m` is zero or the ratio is not finite.
pub fn scale_factor<T>(distance_m: T, max_radius_m: T, fraction: T) -> T
where
    T: CoordFloat,
{
    let one = T::one();
    if !(max_radius_m > T::zero()) {
        return one;
    }
    let scale = fraction * distance_m / max_radius_m;
    if scale.is_finite() {
        scale.max(one)
    } else {
        one
    }
}

/// A link's envelope along with the values used to build it.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T: CoordFloat = f64> {
    /// Great-circle length of the link.
    pub distance_m: T,

    /// Widest 1st fresnel zone radius, unscaled.
    pub max_radius_m: T,

    /// Multiplier applied to every radius before offsetting.
    pub scale: T,

    /// Evenly spaced points on the straight line from start to end.
    pub centerline: Vec<Coord<T>>,

    /// Unscaled 1st fresnel zone radius at each centerline point.
    pub radii_m: Vec<T>,

    /// Upper boundary followed by the reversed lower boundary.
    pub ring: Vec<Coord<T>>,
}

impl<T> Envelope<T>
where
    T: CoordFloat + 'static,
    f64: AsPrimitive<T>,
{
    pub fn builder() -> EnvelopeBuilder<T> {
        EnvelopeBuilder {
            start: None,
            end: None,
            freq_ghz: None,
            samples: DEFAULT_SAMPLES,
            scale: None,
            scale_fraction: DEFAULT_SCALE_FRACTION.as_(),
        }
    }

    /// Returns the upper boundary, from start to end.
    pub fn upper(&self) -> &[Coord<T>] {
        &self.ring[..self.centerline.len()]
    }

    /// Returns the lower boundary, from end to start.
    pub fn lower(&self) -> &[Coord<T>] {
        &self.ring[self.centerline.len()..]
    }

    /// Returns the ring as a polygon.
    ///
    /// The ring already starts and ends on the link's start point
    /// unless that point was collapsed, in which case `geo` closes it.
    pub fn polygon(&self) -> Polygon<T> {
        Polygon::new(LineString::from(self.ring.clone()), vec![])
    }
}

pub struct EnvelopeBuilder<T: CoordFloat = f64> {
    /// Start of the link (required).
    start: Option<Coord<T>>,

    /// End of the link (required).
    end: Option<Coord<T>>,

    /// Link frequency in GHz (required).
    freq_ghz: Option<T>,

    /// Intervals along the link (defaults to `DEFAULT_SAMPLES`).
    samples: usize,

    /// Fixed radius multiplier (defaults to `scale_factor`).
    scale: Option<T>,

    /// Target half-width fraction used when `scale` is not set.
    scale_fraction: T,
}

impl<T> EnvelopeBuilder<T>
where
    T: CoordFloat + 'static,
    f64: AsPrimitive<T>,
    usize: AsPrimitive<T>,
{
    /// Start of the link (required).
    #[must_use]
    pub fn start(mut self, coord: Coord<T>) -> Self {
        self.start = Some(coord);
        self
    }

    /// End of the link (required).
    #[must_use]
    pub fn end(mut self, coord: Coord<T>) -> Self {
        self.end = Some(coord);
        self
    }

    /// Link frequency (GHz, required).
    #[must_use]
    pub fn freq_ghz(mut self, f_ghz: T) -> Self {
        self.freq_ghz = Some(f_ghz);
        self
    }

    /// Number of intervals along the link (defaults to 50).
    #[must_use]
    pub fn samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// Fixed radius multiplier (defaults to an automatic factor, see
    /// [`scale_factor`]).
    #[must_use]
    pub fn scale(mut self, scale: T) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Target half-width as a fraction of link length (defaults to
    /// 0.02; has no effect if `scale` is set).
    #[must_use]
    pub fn scale_fraction(mut self, fraction: T) -> Self {
        self.scale_fraction = fraction;
        self
    }

    pub fn build(&self) -> Result<Envelope<T>, RfGeoError> {
        let start = self.start.ok_or(RfGeoError::Builder("start"))?;
        let end = self.end.ok_or(RfGeoError::Builder("end"))?;
        let freq_ghz = self.freq_ghz.ok_or(RfGeoError::Builder("freq_ghz"))?;

        let distance_m = distance(start, end);
        let max_radius_m = max_radius(distance_m, freq_ghz);
        let scale = self
            .scale
            .unwrap_or_else(|| scale_factor(distance_m, max_radius_m, self.scale_fraction));

        let centerline = sample_points(start, end, self.samples);
        let radii_m = radius_at_samples(&centerline, start, end, freq_ghz);
        let ring = offset_ring(start, end, &centerline, &radii_m, scale);

        debug!(
            "envelope; len: {}, distance_m: {distance_m:?}, max_radius_m: {max_radius_m:?}, scale: {scale:?}",
            ring.len(),
        );

        Ok(Envelope {
            distance_m,
            max_radius_m,
            scale,
            centerline,
            radii_m,
            ring,
        })
    }
}

fn offset_ring<T>(
    a: Coord<T>,
    b: Coord<T>,
    centerline: &[Coord<T>],
    radii_m: &[T],
    scale: T,
) -> Vec<Coord<T>>
where
    T: CoordFloat + 'static,
    f64: AsPrimitive<T>,
{
    let quarter_turn: T = FRAC_PI_2.as_();
    let max_dx: T = MAX_LON_OFFSET_DEG.as_();
    let max_dy: T = MAX_LAT_OFFSET_DEG.as_();
    let (sin_perp, cos_perp) = (bearing(a, b) + quarter_turn).sin_cos();

    let mut upper = Vec::with_capacity(centerline.len() * 2);
    let mut lower = Vec::with_capacity(centerline.len());

    for (idx, (&point, &radius_m)) in centerline.iter().zip(radii_m).enumerate() {
        if radius_m == T::zero() {
            upper.push(point);
            lower.push(point);
            continue;
        }

        let deg = meters_to_degrees(radius_m * scale, point.y);
        let dx = sin_perp * deg.x;
        let dy = cos_perp * deg.y;

        // Near the poles the projection blows up without necessarily
        // reaching infinity.
        if !(dx.abs() <= max_dx && dy.abs() <= max_dy) {
            debug!("envelope; collapsing sample {idx} at {point:?}, offset: ({dx:?}, {dy:?})");
            upper.push(point);
            lower.push(point);
            continue;
        }

        upper.push(Coord {
            x: point.x + dx,
            y: point.y + dy,
        });
        lower.push(Coord {
            x: point.x - dx,
            y: point.y - dy,
        });
    }

    upper.extend(lower.into_iter().rev());
    upper
}
