//! Parameter management types and utilities
//!
//! This module provides the parameter store and the health self-test
//! parameter definitions. Persisting values is left to the platform.

pub mod error;
pub mod health;
pub mod storage;

pub use error::ParameterError;
pub use health::{HealthParams, HealthTriggers};
pub use storage::{ParamFlags, ParamMetadata, ParamValue, ParameterStore, MAX_PARAMS, PARAM_NAME_LEN};
