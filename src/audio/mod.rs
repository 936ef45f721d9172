//! The real-time analysis pipeline.
//!
//! Sample blocks arrive from a tapped [`source`], accumulate in the
//! [`ring_buffer`], and on each tick boundary the [`analyzer`] runs one
//! pass of [`window_functions`] → [`spectrum`] → [`bands`] alongside
//! [`meter`] and [`stereo`], writing results into the shared [`tables`].

pub mod analyzer;
pub mod bands;
pub mod config;
pub mod constants;
pub mod meter;
pub mod ring_buffer;
pub mod source;
pub mod spectrum;
pub mod stereo;
pub mod tables;
pub mod window_functions;
