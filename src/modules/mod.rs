//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the object-storage client and its adapters.

pub mod storage;
