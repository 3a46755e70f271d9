//! Bindery: Incremental Document Rendering
//!
//! A content-addressed staleness tracker layered over a directory scan and a
//! delegated conversion step. Bindery discovers document sources, compares
//! them against a persisted checksum ledger, and re-invokes an external
//! renderer only for files that are new, missing their output, or changed
//! since the last successful render.

pub mod cli;
pub mod config;
pub mod discover;
pub mod error;
pub mod hasher;
pub mod ledger;
pub mod logging;
pub mod orchestrator;
pub mod renderer;
pub mod types;
pub mod verify;
