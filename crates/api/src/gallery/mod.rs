//! Hosting of gallery instances for API clients.

pub mod registry;

pub use registry::{GalleryRegistry, HostedGallery, SessionSnapshot};
