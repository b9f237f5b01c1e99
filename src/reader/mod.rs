mod reader;
mod utils;

pub use reader::ContainerReader;
pub use utils::fill_buffer;
