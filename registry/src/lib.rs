//! # Tower and Link Registry
//!
//! `registry` owns the towers and links of a radio link plan, tracks
//! what is selected, and runs the two-click "link mode" protocol
//! used to pair towers into links.

mod entity;
mod error;
mod id;
mod link_mode;
mod store;

pub use crate::{
    entity::{Link, Tower, MAX_FREQ_GHZ},
    error::RegistryError,
    id::{generate_id, LinkId, TowerId},
    link_mode::{LinkMode, LinkModeEvent, Rejection},
    store::{Registry, Selection},
};
pub use rfgeo;
