//! Parameter error types
//!
//! Provides error types for parameter store operations.

/// Errors from parameter store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterError {
    /// Invalid configuration (unknown parameter, name too long, value out of range)
    InvalidConfig,
    /// Store is full
    StoreFull,
    /// Read-only parameter cannot be modified
    ReadOnly,
    /// Value type differs from the registered type
    TypeMismatch,
}

impl ParameterError {
    /// Static description, usable where `Display` is not (defmt)
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterError::InvalidConfig => "invalid parameter configuration",
            ParameterError::StoreFull => "parameter store full",
            ParameterError::ReadOnly => "parameter is read-only",
            ParameterError::TypeMismatch => "parameter type mismatch",
        }
    }
}

impl core::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::format;

    use super::*;

    #[test]
    fn test_parameter_error_display() {
        assert_eq!(format!("{}", ParameterError::ReadOnly), "parameter is read-only");
        assert_eq!(
            format!("{}", ParameterError::TypeMismatch),
            "parameter type mismatch"
        );
    }
}
