pub mod edit_buffer;

pub use edit_buffer::{BlockBucket, CommuneSelectError, EditBuffer};
