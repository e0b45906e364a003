//! Parameter Storage Types
//!
//! Provides the `ParameterStore` holding externally settable configuration.
//! Values written by a ground station or telemetry link land here; the
//! health runner reads them once per tick. Entries flagged `PERSISTENT`
//! are listed by [`ParameterStore::iter_persistent`] for the platform's
//! Flash writer.

use super::error::ParameterError;
use bitflags::bitflags;
use heapless::index_map::FnvIndexMap;
use heapless::String;

/// Maximum parameter name length
pub const PARAM_NAME_LEN: usize = 16;

/// Maximum number of parameters
pub const MAX_PARAMS: usize = 32;

bitflags! {
    /// Parameter flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ParamFlags: u8 {
        /// Parameter is read-only (cannot be modified externally)
        const READ_ONLY = 0b00000010;
        /// Parameter survives restarts (saved to Flash)
        const PERSISTENT = 0b00000100;
    }
}

/// Parameter value types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    /// Boolean parameter
    Bool(bool),
    /// 32-bit signed integer (also carries u8/u16 parameters)
    Int(i32),
    /// 32-bit floating point
    Float(f32),
}

impl ParamValue {
    /// Get type discriminant for serialization
    pub fn type_id(&self) -> u8 {
        match self {
            ParamValue::Bool(_) => 1,
            ParamValue::Int(_) => 2,
            ParamValue::Float(_) => 3,
        }
    }

    /// Whether the value is nonzero / true
    pub fn is_set(&self) -> bool {
        match self {
            ParamValue::Bool(v) => *v,
            ParamValue::Int(v) => *v != 0,
            ParamValue::Float(v) => *v != 0.0,
        }
    }

    /// Numeric view as f32
    pub fn as_f32(&self) -> f32 {
        match self {
            ParamValue::Bool(v) => *v as u8 as f32,
            ParamValue::Int(v) => *v as f32,
            ParamValue::Float(v) => *v,
        }
    }
}

/// Parameter metadata
#[derive(Debug, Clone)]
pub struct ParamMetadata {
    /// Parameter flags
    pub flags: ParamFlags,
    /// Inclusive numeric bounds accepted by [`ParameterStore::set`]
    pub min: f32,
    pub max: f32,
}

impl ParamMetadata {
    fn accepts(&self, value: &ParamValue) -> bool {
        let v = value.as_f32();
        v >= self.min && v <= self.max
    }
}

/// Parameter store for configuration management
///
/// Stores parameters as key-value pairs with metadata (flags). A value can
/// only be replaced by a value of the same variant.
pub struct ParameterStore {
    /// Parameter values
    parameters: FnvIndexMap<String<PARAM_NAME_LEN>, ParamValue, MAX_PARAMS>,
    /// Parameter metadata
    metadata: FnvIndexMap<String<PARAM_NAME_LEN>, ParamMetadata, MAX_PARAMS>,
    /// Dirty flag (a persistent parameter needs a Flash write)
    dirty: bool,
}

fn make_key(name: &str) -> Result<String<PARAM_NAME_LEN>, ParameterError> {
    let mut key = String::<PARAM_NAME_LEN>::new();
    key.push_str(name)
        .map_err(|_| ParameterError::InvalidConfig)?;
    Ok(key)
}

impl ParameterStore {
    /// Create a new empty parameter store
    pub fn new() -> Self {
        Self {
            parameters: FnvIndexMap::new(),
            metadata: FnvIndexMap::new(),
            dirty: false,
        }
    }

    /// Get parameter value
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        let key = make_key(name).ok()?;
        self.parameters.get(&key)
    }

    /// Set parameter value from an external writer
    ///
    /// Rejects unknown names, read-only parameters, type changes and
    /// values outside the registered bounds; the previous value is kept.
    /// Marks the store dirty when a persistent parameter changes.
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<(), ParameterError> {
        let key = make_key(name)?;

        let current = self
            .parameters
            .get(&key)
            .ok_or(ParameterError::InvalidConfig)?;
        if current.type_id() != value.type_id() {
            return Err(ParameterError::TypeMismatch);
        }

        let meta = self.metadata.get(&key).ok_or(ParameterError::InvalidConfig)?;
        if meta.flags.contains(ParamFlags::READ_ONLY) {
            return Err(ParameterError::ReadOnly);
        }
        if !meta.accepts(&value) {
            return Err(ParameterError::InvalidConfig);
        }

        let flags = meta.flags;
        self.store_value(key, value, flags);
        Ok(())
    }

    /// Overwrite a value from the owning subsystem
    ///
    /// Unlike [`set`](Self::set), read-only parameters may be updated;
    /// used to reset edge-trigger parameters after they are consumed.
    pub fn update_internal(&mut self, name: &str, value: ParamValue) -> Result<(), ParameterError> {
        let key = make_key(name)?;
        let flags = self
            .metadata
            .get(&key)
            .map(|meta| meta.flags)
            .ok_or(ParameterError::InvalidConfig)?;
        self.store_value(key, value, flags);
        Ok(())
    }

    fn store_value(&mut self, key: String<PARAM_NAME_LEN>, value: ParamValue, flags: ParamFlags) {
        if let Some(slot) = self.parameters.get_mut(&key) {
            if *slot != value && flags.contains(ParamFlags::PERSISTENT) {
                self.dirty = true;
            }
            *slot = value;
        }
    }

    /// Register a new parameter with default value and flags
    ///
    /// If the parameter already exists, this is a no-op (idempotent).
    pub fn register(
        &mut self,
        name: &str,
        default_value: ParamValue,
        flags: ParamFlags,
    ) -> Result<(), ParameterError> {
        self.register_bounded(name, default_value, flags, f32::NEG_INFINITY, f32::INFINITY)
    }

    /// Register a parameter whose external writes must lie in `min..=max`
    pub fn register_bounded(
        &mut self,
        name: &str,
        default_value: ParamValue,
        flags: ParamFlags,
        min: f32,
        max: f32,
    ) -> Result<(), ParameterError> {
        let key = make_key(name)?;

        if self.parameters.contains_key(&key) {
            // Already exists, don't overwrite
            return Ok(());
        }

        self.parameters
            .insert(key.clone(), default_value)
            .map_err(|_| ParameterError::StoreFull)?;
        self.metadata
            .insert(key, ParamMetadata { flags, min, max })
            .map_err(|_| ParameterError::StoreFull)?;
        Ok(())
    }

    /// Iterate over persistent parameters as (name, value) pairs
    ///
    /// Used by Flash persistence for serialization.
    pub fn iter_persistent(&self) -> impl Iterator<Item = (&String<PARAM_NAME_LEN>, &ParamValue)> {
        self.parameters.iter().filter(|(name, _)| {
            self.metadata
                .get(*name)
                .map(|meta| meta.flags.contains(ParamFlags::PERSISTENT))
                .unwrap_or(false)
        })
    }

    /// Check if store has unsaved persistent changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear dirty flag (called after successful flash save)
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_store_register_and_get() {
        let mut store = ParameterStore::new();
        store
            .register("TEST", ParamValue::Int(42), ParamFlags::empty())
            .unwrap();
        assert_eq!(store.get("TEST"), Some(&ParamValue::Int(42)));
    }

    #[test]
    fn test_parameter_store_set_unknown() {
        let mut store = ParameterStore::new();
        assert_eq!(
            store.set("UNKNOWN", ParamValue::Int(1)),
            Err(ParameterError::InvalidConfig)
        );
    }

    #[test]
    fn test_parameter_store_name_too_long() {
        let mut store = ParameterStore::new();
        assert_eq!(
            store.register("A_VERY_LONG_PARAMETER", ParamValue::Int(1), ParamFlags::empty()),
            Err(ParameterError::InvalidConfig)
        );
        assert_eq!(store.get("A_VERY_LONG_PARAMETER"), None);
    }

    #[test]
    fn test_parameter_store_type_mismatch() {
        let mut store = ParameterStore::new();
        store
            .register("THR", ParamValue::Float(1.0), ParamFlags::empty())
            .unwrap();
        assert_eq!(
            store.set("THR", ParamValue::Int(2)),
            Err(ParameterError::TypeMismatch)
        );
        assert_eq!(store.get("THR"), Some(&ParamValue::Float(1.0)));
    }

    #[test]
    fn test_parameter_store_register_idempotent() {
        let mut store = ParameterStore::new();
        store
            .register("TEST", ParamValue::Int(42), ParamFlags::empty())
            .unwrap();
        store.set("TEST", ParamValue::Int(100)).unwrap();
        // Re-register should not overwrite
        store
            .register("TEST", ParamValue::Int(42), ParamFlags::empty())
            .unwrap();
        assert_eq!(store.get("TEST"), Some(&ParamValue::Int(100)));
    }

    #[test]
    fn test_dirty_only_for_persistent_changes() {
        let mut store = ParameterStore::new();
        store
            .register("VOLATILE", ParamValue::Int(0), ParamFlags::empty())
            .unwrap();
        store
            .register("SAVED", ParamValue::Float(1.0), ParamFlags::PERSISTENT)
            .unwrap();
        assert!(!store.is_dirty());

        store.set("VOLATILE", ParamValue::Int(1)).unwrap();
        assert!(!store.is_dirty());

        // Same value is not a change
        store.set("SAVED", ParamValue::Float(1.0)).unwrap();
        assert!(!store.is_dirty());

        store.set("SAVED", ParamValue::Float(2.0)).unwrap();
        assert!(store.is_dirty());
        store.clear_dirty();
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_iter_persistent() {
        let mut store = ParameterStore::new();
        store
            .register("A", ParamValue::Int(1), ParamFlags::PERSISTENT)
            .unwrap();
        store
            .register("B", ParamValue::Int(2), ParamFlags::empty())
            .unwrap();
        let names: heapless::Vec<_, MAX_PARAMS> =
            store.iter_persistent().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names.as_slice(), &["A"]);
    }

    #[test]
    fn test_bounded_set_keeps_previous_value() {
        let mut store = ParameterStore::new();
        store
            .register_bounded("PWM", ParamValue::Int(0), ParamFlags::PERSISTENT, 0.0, 65535.0)
            .unwrap();
        store.set("PWM", ParamValue::Int(30000)).unwrap();
        store.clear_dirty();

        assert_eq!(
            store.set("PWM", ParamValue::Int(70000)),
            Err(ParameterError::InvalidConfig)
        );
        assert_eq!(
            store.set("PWM", ParamValue::Int(-1)),
            Err(ParameterError::InvalidConfig)
        );
        assert_eq!(store.get("PWM"), Some(&ParamValue::Int(30000)));
        assert!(!store.is_dirty());

        // Bounds are inclusive
        store.set("PWM", ParamValue::Int(65535)).unwrap();
        assert_eq!(store.get("PWM"), Some(&ParamValue::Int(65535)));
    }

    #[test]
    fn test_parameter_read_only() {
        let mut store = ParameterStore::new();
        store
            .register("READONLY", ParamValue::Int(42), ParamFlags::READ_ONLY)
            .unwrap();
        assert_eq!(
            store.set("READONLY", ParamValue::Int(100)),
            Err(ParameterError::ReadOnly)
        );

        store
            .update_internal("READONLY", ParamValue::Int(100))
            .unwrap();
        assert_eq!(store.get("READONLY"), Some(&ParamValue::Int(100)));
    }

    #[test]
    fn test_param_value_helpers() {
        assert!(ParamValue::Int(1).is_set());
        assert!(!ParamValue::Int(0).is_set());
        assert!(ParamValue::Bool(true).is_set());
        assert!(!ParamValue::Float(0.0).is_set());
        assert_eq!(ParamValue::Int(3).as_f32(), 3.0);
        assert_eq!(ParamValue::Bool(true).as_f32(), 1.0);
    }
}
