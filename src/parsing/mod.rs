pub mod builder;
pub mod extractors;
pub mod normalizer;

pub use builder::parse_signal;
pub use normalizer::normalize;
