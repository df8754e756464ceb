#![warn(missing_docs)]

//! Read FLAC metadata blocks and frame headers.
//!
//! Start with [`flac::AudioStream::open`], which indexes and decodes
//! every metadata block. Frame headers are only walked when
//! [`flac::AudioStream::scan_frames`] is called.

pub mod common;
pub mod flac;
