#![warn(missing_docs)]
//! OptiSim specific error structures
use std::{error::Error, fmt::Display};

/// OptiSim application specific Result type
pub type OptiResult<T> = std::result::Result<T, OptiSimError>;

/// Errors that can be returned by the functions of an [`OpticalSystem`](crate::OpticalSystem).
///
/// All variants are recoverable. A failed operation never leaves a partially modified system behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptiSimError {
    /// an optical element with the same name already exists
    DuplicateName(String),
    /// reference to an optical element which does not exist
    UnknownElement(String),
    /// the given field name does not exist for the light source or the given element type
    InvalidField(String),
    /// a value violates a domain constraint (zero focal length, non-physical index, overlapping elements, ...)
    InvalidParameter(String),
    /// the system cannot produce an image (e.g. it does not contain any element)
    NoConvergence(String),
    /// malformed content of a system file
    FileFormat(String),
    /// errors while reading or writing files
    Io(String),
    /// errors in connection with the command line interface
    Console(String),
    /// errors not falling in one of the categories above
    Other(String),
}

impl Display for OptiSimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateName(m) => {
                write!(f, "DuplicateName:{m}")
            }
            Self::UnknownElement(m) => {
                write!(f, "UnknownElement:{m}")
            }
            Self::InvalidField(m) => {
                write!(f, "InvalidField:{m}")
            }
            Self::InvalidParameter(m) => {
                write!(f, "InvalidParameter:{m}")
            }
            Self::NoConvergence(m) => {
                write!(f, "NoConvergence:{m}")
            }
            Self::FileFormat(m) => {
                write!(f, "FileFormat:{m}")
            }
            Self::Io(m) => write!(f, "Io:{m}"),
            Self::Console(m) => write!(f, "Console:{m}"),
            Self::Other(m) => write!(f, "OptiSim Error:Other:{m}"),
        }
    }
}
impl Error for OptiSimError {}

impl std::convert::From<String> for OptiSimError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}
