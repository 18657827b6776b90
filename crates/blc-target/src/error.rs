//! Error type for target lookup.
//!
//! Assembling/linking is the driver's job (`blc-drv::DrvError`), so this
//! only covers resolving a `-t` name to a backend.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TargetError {
    #[error("unknown target '{0}'")]
    Unknown(String),

    #[error("target '{0}' is not available on this host")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, TargetError>;
