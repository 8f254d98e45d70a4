pub mod batch;
pub mod language;
pub mod loaders;

pub use batch::{AnalysisReport, BatchItem, BatchRun, Outcome, OutcomeStatus};
pub use language::Language;
pub use loaders::{load_all_images, load_image_from_file};
