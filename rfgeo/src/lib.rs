//! # Radio Link Geometry
//!
//! `rfgeo` computes great-circle distances, first Fresnel zone radii
//! and the 2-D envelope polygon of a point-to-point radio link.
//!
//! All points are [`geo::Coord`]s where `x` is longitude and `y` is
//! latitude, both in degrees.

mod error;
pub mod envelope;
pub mod fresnel;
pub mod geodesy;
pub mod projection;
pub mod sample;

pub use {
    crate::{
        envelope::{build_envelope, scale_factor, Envelope, EnvelopeBuilder},
        error::RfGeoError,
        fresnel::{max_radius, radius_at_samples, FresnelZone},
        geodesy::{bearing, distance},
        projection::meters_to_degrees,
        sample::sample_points,
    },
    geo,
};
