mod packer;
mod utils;
mod writer;

pub use packer::Packer;
pub use utils::{write_count, write_description, SeekGuard};
pub use writer::{ContainerWriter, ContainerWriterBuilder};
