use crate::id::{LinkId, TowerId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("no tower with id {0}")]
    UnknownTower(TowerId),

    #[error("no link with id {0}")]
    UnknownLink(LinkId),

    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),

    #[error("frequency {0} GHz is outside (0, 100]")]
    Frequency(f64),

    #[error("tower name is empty")]
    EmptyName,
}
