pub mod ports;
pub mod filter_use_case;
pub mod fix_labels_use_case;
