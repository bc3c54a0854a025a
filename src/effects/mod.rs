pub(crate) mod clip_reveal;
pub(crate) mod config;
pub(crate) mod engine;
pub(crate) mod line_scan;
pub(crate) mod matrix;
pub(crate) mod pattern;
pub(crate) mod serpentine;
