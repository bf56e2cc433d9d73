pub mod known;
pub mod token;

pub use known::KnownVersions;
pub use token::{compare_components, compare_version_labels, Version, VersionKind, ALL_LABEL, PREVIEW_LABEL};
