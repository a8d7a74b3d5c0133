//! Export core modules shared across CLI and renderers.

pub mod pdf_core;
