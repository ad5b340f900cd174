use geo::{Coord, CoordFloat};
use num_traits::AsPrimitive;

/// Number of intervals `sample_points` callers use when they have no
/// better idea.
pub const DEFAULT_COUNT: usize = 30;

/// Returns `n` evenly spaced values from `start` to `end` inclusive.
pub fn linspace<T>(start: T, end: T, n: usize) -> impl Iterator<Item = T>
where
    T: CoordFloat + 'static,
    usize: AsPrimitive<T>,
{
    let intervals: T = n.saturating_sub(1).max(1).as_();
    let step = (end - start) / intervals;
    (0..n).map(move |i| {
        let i: T = i.as_();
        start + i * step
    })
}

/// Returns `count + 1` points linearly interpolated from `a` to `b`.
///
/// Latitude and longitude are interpolated independently, so the
/// result is a straight line in degree space rather than a great
/// circle. A `count` of zero yields `[a]`.
pub fn sample_points<T>(a: Coord<T>, b: Coord<T>, count: usize) -> Vec<Coord<T>>
where
    T: CoordFloat + 'static,
    usize: AsPrimitive<T>,
{
    if count == 0 {
        return vec![a];
    }
    let n = count.saturating_add(1);
    linspace(a.x, b.x, n)
        .zip(linspace(a.y, b.y, n))
        .map(|(x, y)| Coord { x, y })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{linspace, sample_points, DEFAULT_COUNT};
    use approx::assert_relative_eq;
    use geo::coord;

    #[test]
    fn test_linspace() {
        let values: Vec<f64> = linspace(0.0, 1.0, 5).collect();
        assert_eq!(values, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(3.0, 7.0, 1).collect::<Vec<f64>>(), vec![3.0]);
        assert_eq!(linspace(3.0, 7.0, 0).count(), 0);

        // Lazy, so a huge `n` is only as costly as what's taken.
        let head: Vec<f64> = linspace(0.0, 1.0, usize::MAX).take(2).collect();
        assert_eq!(head[0], 0.0);
        assert!(head[1] > 0.0 && head[1] < 1e-18);
    }

    #[test]
    fn test_sample_points() {
        let a = coord! { x: -71.308_307_164_413_69, y: 44.283_098_066_031_65 };
        let b = coord! { x: -71.297_207_328_376_8, y: 44.256_280_984_242_78 };
        let points = sample_points(a, b, DEFAULT_COUNT);
        assert_eq!(points.len(), DEFAULT_COUNT + 1);
        assert_eq!(points[0], a);
        assert_relative_eq!(points[30].x, b.x, epsilon = 1e-12);
        assert_relative_eq!(points[30].y, b.y, epsilon = 1e-12);

        let mid = points[15];
        assert_relative_eq!(mid.x, (a.x + b.x) / 2.0, epsilon = 1e-12);
        assert_relative_eq!(mid.y, (a.y + b.y) / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sample_points_zero_count() {
        let a = coord! { x: 1.0, y: 2.0 };
        let b = coord! { x: 3.0, y: 4.0 };
        assert_eq!(sample_points(a, b, 0), vec![a]);
    }

    #[test]
    fn test_sample_points_coincident() {
        let a = coord! { x: 1.0_f32, y: 2.0 };
        let points = sample_points(a, a, 4);
        assert_eq!(points, vec![a; 5]);
    }
}
