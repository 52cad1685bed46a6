pub mod acquisition;
pub mod links;

pub use acquisition::{AcquisitionOutcome, AcquisitionRequest, FallbackChoice};
pub use links::{ParsedVideo, ShortLink};
