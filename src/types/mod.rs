//! Core types shared by the pipeline stages.

pub mod error;
pub mod result_set;

pub use error::{Error, Result};
pub use result_set::{ResultSet, Row, Value};
