pub mod files;
pub mod store;
pub mod transfer;

pub use files::{
    atomic_write, data_file, ensure_dir, export_file_name, get_data_dir, init_local_data_dir,
    log_file, read_file, DATA_DIR_ENV, DATA_DIR_NAME,
};
pub use store::{load_document, save_document, DocumentStore};
pub use transfer::{export_document, export_to, import_file, import_into, parse_import, ImportError};
