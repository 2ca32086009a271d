//! Streaming analytics over published level series

mod streaming;

pub use streaming::SlopeOf;
