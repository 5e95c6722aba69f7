/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! Process-wide configuration registry.
//!
//! `spec.md` §9 calls for "a `Flags` keyed-double store and default
//! eigensolver selection", modeled as process-wide configuration with
//! explicit get/set; it documents the registry as not thread-isolated and
//! asks callers who need isolation to snapshot before and restore after.
//! This mirrors the original `tensor::flags` global table
//! (`examples/original_source/include/tensor/flags.h`) without attempting to
//! reproduce its C++ singleton machinery.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

fn registry() -> &'static Mutex<HashMap<String, f64>> {
    static REGISTRY: OnceLock<Mutex<HashMap<String, f64>>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut defaults = HashMap::new();
        // The façade bypasses the Arnoldi-style iterative eigensolver for
        // matrices at or below this size; see spec.md §4.5/§9.
        defaults.insert("eigensolver.bypass_threshold".to_string(), 4.0);
        defaults.insert("svd.econ_default".to_string(), 0.0);
        Mutex::new(defaults)
    })
}

/// Read a flag, falling back to `default` if it was never set.
pub fn get(key: &str, default: f64) -> f64 {
    registry()
        .lock()
        .expect("flags registry poisoned")
        .get(key)
        .copied()
        .unwrap_or(default)
}

/// Set a flag's value, returning the previous one if any.
pub fn set(key: &str, value: f64) -> Option<f64> {
    registry()
        .lock()
        .expect("flags registry poisoned")
        .insert(key.to_string(), value)
}

/// Snapshot the whole table, for callers who need isolation around a call
/// and must restore afterwards (per spec.md §9).
pub fn snapshot() -> HashMap<String, f64> {
    registry().lock().expect("flags registry poisoned").clone()
}

/// Restore a previously taken snapshot verbatim.
pub fn restore(snapshot: HashMap<String, f64>) {
    *registry().lock().expect("flags registry poisoned") = snapshot;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bypass_threshold_is_four() {
        assert_eq!(get("eigensolver.bypass_threshold", -1.0), 4.0);
    }

    #[test]
    fn set_then_get_round_trips() {
        let saved = snapshot();
        set("a.custom.flag", 42.0);
        assert_eq!(get("a.custom.flag", 0.0), 42.0);
        restore(saved);
        assert_eq!(get("a.custom.flag", 0.0), 0.0);
    }
}
