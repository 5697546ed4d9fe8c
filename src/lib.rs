//! Test-fixture utilities for raw video frames: generate synthetic
//! gradient frames into a file, or stream frames to a single TCP client
//! at a fixed frame rate.

pub mod frame;
pub mod gradient;
pub mod log;
pub mod serve;
pub mod source;
