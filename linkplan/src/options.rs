use anyhow::{anyhow, Error as AnyError};
use clap::{builder::RangedU64ValueParser, Args, Parser, ValueEnum};
use geo::geometry::Coord;
use rfgeo::envelope::DEFAULT_SAMPLES;
use std::str::FromStr;

/// Most intervals accepted along a single link.
const MAX_SAMPLES: u64 = 10_000;

/// Plan point-to-point radio links and their fresnel zones.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub enum Cli {
    /// Print the 1st fresnel zone envelope of a single link.
    Envelope(Envelope),

    /// Place towers, link them, and report on each link.
    Plan(Plan),
}

#[derive(Debug, Clone, Args)]
pub struct Envelope {
    /// Start "lat,lon".
    #[arg(long)]
    pub start: LatLon,

    /// End "lat,lon".
    #[arg(long)]
    pub end: LatLon,

    /// Link frequency in GHz.
    #[arg(short, long)]
    pub frequency: f64,

    /// Intervals along the link.
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_SAMPLES,
        value_parser = RangedU64ValueParser::<usize>::new().range(0..=MAX_SAMPLES),
    )]
    pub samples: usize,

    /// Radius multiplier. Defaults to widening the envelope to 2% of
    /// the link length.
    #[arg(long)]
    pub scale: Option<f64>,

    #[arg(long, value_enum, default_value_t = EnvelopeFormat::Csv)]
    pub format: EnvelopeFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EnvelopeFormat {
    /// Per-sample centerline, radius and boundary points.
    Csv,

    /// The envelope ring as `[lon, lat]` pairs.
    Json,

    /// Plot radius along the link to the terminal.
    Plot,
}

#[derive(Debug, Clone, Args)]
pub struct Plan {
    /// Tower "name@lat,lon,GHz". May be repeated.
    #[arg(short, long = "tower", required = true)]
    pub towers: Vec<TowerSpec>,

    /// Link "name,name" between two towers. May be repeated.
    #[arg(short, long = "link")]
    pub links: Vec<LinkSpec>,

    /// Intervals along each link.
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_SAMPLES,
        value_parser = RangedU64ValueParser::<usize>::new().range(0..=MAX_SAMPLES),
    )]
    pub samples: usize,

    #[arg(long, value_enum, default_value_t = PlanFormat::Summary)]
    pub format: PlanFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlanFormat {
    /// One line per tower and link.
    Summary,

    /// Towers, links and envelope rings.
    Json,
}

#[derive(Clone, Debug, Copy, PartialEq)]
pub struct LatLon(pub Coord<f64>);

impl FromStr for LatLon {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, AnyError> {
        let (lat_str, lon_str) = s
            .split_once(',')
            .ok_or_else(|| anyhow!("not a valid lat,lon pair"))?;
        let lat = f64::from_str(lat_str.trim())?;
        let lon = f64::from_str(lon_str.trim())?;
        if !(lat.is_finite() && lon.is_finite()) {
            return Err(anyhow!("lat,lon must be finite numbers"));
        }
        Ok(Self(Coord { y: lat, x: lon }))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TowerSpec {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub freq_ghz: f64,
}

impl FromStr for TowerSpec {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, AnyError> {
        let (name, rest) = s
            .split_once('@')
            .ok_or_else(|| anyhow!("not a valid name@lat,lon,GHz"))?;
        let (lat_lon, freq_str) = rest
            .rsplit_once(',')
            .ok_or_else(|| anyhow!("not a valid name@lat,lon,GHz"))?;
        let LatLon(coord) = LatLon::from_str(lat_lon)?;
        Ok(Self {
            name: name.to_owned(),
            lat: coord.y,
            lon: coord.x,
            freq_ghz: f64::from_str(freq_str.trim())?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkSpec(pub String, pub String);

impl FromStr for LinkSpec {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, AnyError> {
        let (a, b) = s
            .split_once(',')
            .ok_or_else(|| anyhow!("not a valid name,name pair"))?;
        Ok(Self(a.trim().to_owned(), b.trim().to_owned()))
    }
}
