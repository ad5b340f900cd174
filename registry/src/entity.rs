use crate::{
    error::RegistryError,
    id::{LinkId, TowerId},
};
use geo::Coord;

/// Highest frequency, in GHz, a tower may operate at.
pub const MAX_FREQ_GHZ: f64 = 100.0;

/// A fixed site.
///
/// Position is fixed at creation; only name and frequency may change.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Tower {
    id: TowerId,
    name: String,
    lat: f64,
    lon: f64,
    freq_ghz: f64,
}

impl Tower {
    pub fn new(
        id: TowerId,
        name: &str,
        lat: f64,
        lon: f64,
        freq_ghz: f64,
    ) -> Result<Self, RegistryError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(RegistryError::Latitude(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(RegistryError::Longitude(lon));
        }
        Ok(Self {
            id,
            name: check_name(name)?,
            lat,
            lon,
            freq_ghz: check_freq(freq_ghz)?,
        })
    }

    pub fn id(&self) -> &TowerId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn freq_ghz(&self) -> f64 {
        self.freq_ghz
    }

    /// Returns the tower's position with `x` as longitude.
    pub fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.lon,
            y: self.lat,
        }
    }

    pub(crate) fn edit(&mut self, name: &str, freq_ghz: f64) -> Result<(), RegistryError> {
        let name = check_name(name)?;
        let freq_ghz = check_freq(freq_ghz)?;
        self.name = name;
        self.freq_ghz = freq_ghz;
        Ok(())
    }
}

/// A pairing of two towers which shared a frequency when the link
/// was made.
///
/// Endpoints are looked up in the owning
/// [`Registry`](crate::Registry) and may briefly dangle while towers
/// are being removed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Link {
    id: LinkId,
    tower_a: TowerId,
    tower_b: TowerId,
    freq_ghz: f64,
}

impl Link {
    pub(crate) fn new(id: LinkId, tower_a: TowerId, tower_b: TowerId, freq_ghz: f64) -> Self {
        Self {
            id,
            tower_a,
            tower_b,
            freq_ghz,
        }
    }

    pub fn id(&self) -> &LinkId {
        &self.id
    }

    pub fn tower_a(&self) -> &TowerId {
        &self.tower_a
    }

    pub fn tower_b(&self) -> &TowerId {
        &self.tower_b
    }

    pub fn freq_ghz(&self) -> f64 {
        self.freq_ghz
    }

    /// Returns true if `tower` is either endpoint.
    pub fn touches(&self, tower: &TowerId) -> bool {
        &self.tower_a == tower || &self.tower_b == tower
    }

    /// Returns true if this link joins `a` and `b`, in either order.
    pub fn joins(&self, a: &TowerId, b: &TowerId) -> bool {
        (&self.tower_a == a && &self.tower_b == b) || (&self.tower_a == b && &self.tower_b == a)
    }
}

fn check_name(name: &str) -> Result<String, RegistryError> {
    let name = name.trim();
    if name.is_empty() {
        Err(RegistryError::EmptyName)
    } else {
        Ok(name.to_owned())
    }
}

fn check_freq(freq_ghz: f64) -> Result<f64, RegistryError> {
    if freq_ghz > 0.0 && freq_ghz <= MAX_FREQ_GHZ {
        Ok(freq_ghz)
    } else {
        Err(RegistryError::Frequency(freq_ghz))
    }
}
