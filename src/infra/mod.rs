pub mod notam_file_adapter;
pub mod silver_dataset_adapter;

pub use notam_file_adapter::{FilterFileOutput, NotamFileSource};
pub use silver_dataset_adapter::JsonLinesDataset;
