pub mod storage;
pub mod types;

pub use storage::load_semester;
pub use types::Semester;
