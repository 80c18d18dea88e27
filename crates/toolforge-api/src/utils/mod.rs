pub mod artifact;
pub mod blocking;
pub mod upload;
