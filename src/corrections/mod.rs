pub mod overlay;
pub mod table;

pub use overlay::{apply, compile, expand_range, BrowserCorrections, Correction};
pub use table::{CorrectionRule, CorrectionTable, FeatureCorrections, PartialSupportAllowance};
