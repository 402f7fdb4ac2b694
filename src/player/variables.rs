//! Exported variable table.
//!
//! Four parallel fixed-capacity arrays (boolean, integer, real, string),
//! each slot addressed by a small-integer value reference. Batch accessors
//! process references left to right and fail the whole call on the first
//! out-of-range reference; effects for earlier indices stand, which is the
//! documented contract (the host treats any batch failure as fatal anyway).
//!
//! Fixed slot meanings live in [`crate::utils::config`].

use std::fmt;

use crate::utils::config::{
    BOOLEAN_VAR_COUNT, INTEGER_VAR_COUNT, REAL_VAR_COUNT, STRING_VAR_COUNT,
};
use crate::utils::error::PlayerError;

/// Variable category, for out-of-range diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarCategory {
    Boolean,
    Integer,
    Real,
    String,
}

impl fmt::Display for VarCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VarCategory::Boolean => "boolean",
            VarCategory::Integer => "integer",
            VarCategory::Real => "real",
            VarCategory::String => "string",
        };
        f.write_str(label)
    }
}

fn check_ref(category: VarCategory, vr: usize, capacity: usize) -> Result<(), PlayerError> {
    if vr < capacity {
        Ok(())
    } else {
        Err(PlayerError::InvalidReference {
            category,
            reference: vr,
            capacity,
        })
    }
}

pub struct VariableTable {
    pub(crate) booleans: [bool; BOOLEAN_VAR_COUNT],
    pub(crate) integers: [i32; INTEGER_VAR_COUNT],
    pub(crate) reals: [f64; REAL_VAR_COUNT],
    pub(crate) strings: [String; STRING_VAR_COUNT],
}

impl VariableTable {
    pub fn new() -> Self {
        Self {
            booleans: [false; BOOLEAN_VAR_COUNT],
            integers: [0; INTEGER_VAR_COUNT],
            reals: [0.0; REAL_VAR_COUNT],
            strings: std::array::from_fn(|_| String::new()),
        }
    }

    /// Restore all four arrays to their zero values.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn get_booleans(&self, refs: &[usize], out: &mut [bool]) -> Result<(), PlayerError> {
        debug_assert_eq!(refs.len(), out.len());
        for (i, &vr) in refs.iter().enumerate() {
            check_ref(VarCategory::Boolean, vr, BOOLEAN_VAR_COUNT)?;
            out[i] = self.booleans[vr];
        }
        Ok(())
    }

    pub fn set_booleans(&mut self, refs: &[usize], values: &[bool]) -> Result<(), PlayerError> {
        debug_assert_eq!(refs.len(), values.len());
        for (i, &vr) in refs.iter().enumerate() {
            check_ref(VarCategory::Boolean, vr, BOOLEAN_VAR_COUNT)?;
            self.booleans[vr] = values[i];
        }
        Ok(())
    }

    pub fn get_integers(&self, refs: &[usize], out: &mut [i32]) -> Result<(), PlayerError> {
        debug_assert_eq!(refs.len(), out.len());
        for (i, &vr) in refs.iter().enumerate() {
            check_ref(VarCategory::Integer, vr, INTEGER_VAR_COUNT)?;
            out[i] = self.integers[vr];
        }
        Ok(())
    }

    pub fn set_integers(&mut self, refs: &[usize], values: &[i32]) -> Result<(), PlayerError> {
        debug_assert_eq!(refs.len(), values.len());
        for (i, &vr) in refs.iter().enumerate() {
            check_ref(VarCategory::Integer, vr, INTEGER_VAR_COUNT)?;
            self.integers[vr] = values[i];
        }
        Ok(())
    }

    pub fn get_reals(&self, refs: &[usize], out: &mut [f64]) -> Result<(), PlayerError> {
        debug_assert_eq!(refs.len(), out.len());
        for (i, &vr) in refs.iter().enumerate() {
            check_ref(VarCategory::Real, vr, REAL_VAR_COUNT)?;
            out[i] = self.reals[vr];
        }
        Ok(())
    }

    pub fn set_reals(&mut self, refs: &[usize], values: &[f64]) -> Result<(), PlayerError> {
        debug_assert_eq!(refs.len(), values.len());
        for (i, &vr) in refs.iter().enumerate() {
            check_ref(VarCategory::Real, vr, REAL_VAR_COUNT)?;
            self.reals[vr] = values[i];
        }
        Ok(())
    }

    pub fn get_strings(&self, refs: &[usize], out: &mut [String]) -> Result<(), PlayerError> {
        debug_assert_eq!(refs.len(), out.len());
        for (i, &vr) in refs.iter().enumerate() {
            check_ref(VarCategory::String, vr, STRING_VAR_COUNT)?;
            out[i].clone_from(&self.strings[vr]);
        }
        Ok(())
    }

    pub fn set_strings(&mut self, refs: &[usize], values: &[&str]) -> Result<(), PlayerError> {
        debug_assert_eq!(refs.len(), values.len());
        for (i, &vr) in refs.iter().enumerate() {
            check_ref(VarCategory::String, vr, STRING_VAR_COUNT)?;
            self.strings[vr] = values[i].to_string();
        }
        Ok(())
    }
}

impl Default for VariableTable {
    fn default() -> Self {
        Self::new()
    }
}
