//! Observability subsystem.
//!
//! Only structured logging; the fixture has no metrics or trace export.

pub mod logging;
