use crate::geodesy::distance;
use geo::{Coord, CoordFloat};
use num_traits::AsPrimitive;
use std::{iter::Iterator, ops::Range};

/// Speed of light in m/s, rounded the way link budgets usually do.
const C: f64 = 3.0e8;

const HZ_PER_GHZ: f64 = 1.0e9;

/// Returns the wavelength, in meters, of a `f_ghz` signal.
pub fn wavelength<T>(f_ghz: T) -> T
where
    T: CoordFloat + 'static,
    f64: AsPrimitive<T>,
{
    let c: T = C.as_();
    let hz_per_ghz: T = HZ_PER_GHZ.as_();
    c / (f_ghz * hz_per_ghz)
}

/// Returns the 1st fresnel zone radius, in meters, at the midpoint
/// of a `distance_m` long link.
///
/// A distance or frequency which is zero, negative or NaN yields
/// zero rather than an error.
pub fn max_radius<T>(distance_m: T, f_ghz: T) -> T
where
    T: CoordFloat + 'static,
    f64: AsPrimitive<T>,
{
    if !(distance_m > T::zero() && f_ghz > T::zero()) {
        return T::zero();
    }
    let four: T = 4.0_f64.as_();
    (wavelength(f_ghz) * distance_m / four).sqrt()
}

/// Returns the 1st fresnel zone radius for each of `samples`, which
/// are assumed to be evenly spaced from `a` to `b` inclusive.
///
/// The first and last radii are always exactly zero.
pub fn radius_at_samples<T>(samples: &[Coord<T>], a: Coord<T>, b: Coord<T>, f_ghz: T) -> Vec<T>
where
    T: CoordFloat + 'static,
    f64: AsPrimitive<T>,
    usize: AsPrimitive<T>,
{
    FresnelZone::new(1, f_ghz, distance(a, b))
        .iter(samples.len())
        .collect()
}

/// Represents the nth fresnel zone of a radio link.
#[derive(Debug, Clone, Copy)]
pub struct FresnelZone<T> {
    /// Which fresnel zone we're interested in.
    zone: u8,
    wavelength: T,
    distance_m: T,
}

impl<T> FresnelZone<T>
where
    T: CoordFloat + 'static,
    f64: AsPrimitive<T>,
{
    /// Returns a new FresnelZone object.
    pub fn new(zone: u8, f_ghz: T, distance_m: T) -> Self {
        Self {
            zone,
            wavelength: wavelength(f_ghz),
            distance_m,
        }
    }

    /// Returns the zone's radius, in meters, `fraction` of the way
    /// along the link.
    ///
    /// The zone pinches to zero at both antennas, and is zero
    /// everywhere for a zero length link or an unusable frequency.
    pub fn radius_at(&self, fraction: T) -> T {
        let zero = T::zero();
        let one = T::one();
        if fraction <= zero
            || fraction >= one
            || !(self.distance_m > zero)
            || !(self.wavelength > zero && self.wavelength.is_finite())
        {
            return zero;
        }
        let d1 = fraction * self.distance_m;
        let d2 = (one - fraction) * self.distance_m;
        let zone: T = f64::from(self.zone).as_();
        (zone * self.wavelength * d1 * d2 / (d1 + d2)).sqrt()
    }

    /// Returns a new FresnelZoneIter of length `len`.
    pub fn iter(&self, len: usize) -> FresnelZoneIter<T> {
        FresnelZoneIter {
            zone: *self,
            range: 0..len,
        }
    }
}

/// An iterator over evenly spaced radii of a fresnel zone, from one
/// end of the link to the other.
#[derive(Debug)]
pub struct FresnelZoneIter<T> {
    zone: FresnelZone<T>,
    range: Range<usize>,
}

impl<T> Iterator for FresnelZoneIter<T>
where
    T: CoordFloat + 'static,
    f64: AsPrimitive<T>,
    usize: AsPrimitive<T>,
{
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        let last = self.range.end.saturating_sub(1);
        self.range.next().map(|n| {
            if n == 0 || n == last {
                T::zero()
            } else {
                let n: T = n.as_();
                let last: T = last.as_();
                self.zone.radius_at(n / last)
            }
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl<T> ExactSizeIterator for FresnelZoneIter<T>
where
    T: CoordFloat + 'static,
    f64: AsPrimitive<T>,
    usize: AsPrimitive<T>,
{
}
