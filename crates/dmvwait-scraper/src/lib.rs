pub mod client;
pub mod crawl;
pub mod error;
pub mod normalize;
pub mod parse;
pub mod sample;
pub mod types;

pub use client::PortalClient;
pub use crawl::crawl_directory;
pub use error::ScraperError;
pub use normalize::normalize_directory;
pub use sample::{sample_facilities, RunStamp};
pub use types::{FacilityCard, FacilityRow, WaitSample};
