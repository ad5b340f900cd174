use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RfGeoError {
    #[error("missing required parameter '{0}'")]
    Builder(&'static str),
}
