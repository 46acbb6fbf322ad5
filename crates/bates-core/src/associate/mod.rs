pub mod flat;
pub mod structured;

pub use flat::{associate_flat, associate_flat_bytes, FLAT_PAGE_NUMBER};
pub use structured::PageAssociator;
