mod metadata;

pub use metadata::{Metadata, MetadataErr};
