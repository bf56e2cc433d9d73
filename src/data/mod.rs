pub mod normalizer;
pub mod policy;
pub mod primary;
pub mod reference;
pub mod secondary;

pub use normalizer::SupportDataNormalizer;
pub use policy::NormalizationPolicy;
pub use primary::{PrimaryDataset, PrimaryFeature};
pub use reference::{DataError, FeatureSource, ReferenceData};
pub use secondary::{AddedThreshold, SecondaryDataset, SecondaryFeature, SupportRecord, SupportStatement, VersionValue};
