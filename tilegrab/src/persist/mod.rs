//! Output naming and atomic commits.

mod gate;
mod naming;

pub use gate::{PersistError, PersistenceGate};
pub use naming::{archive_id, output_file_name, sanitize_label, MAX_LABEL_LEN};
