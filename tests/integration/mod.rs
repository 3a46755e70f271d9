//! Integration tests for the Bindery incremental rendering system

mod ledger_format;
mod render_pass;
mod staleness;
