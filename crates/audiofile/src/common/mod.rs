//! Components that aren't tied to the FLAC container

pub mod cursor;
pub mod picturetype;
pub mod vorbiscomment;
