mod block;
mod decoder;
mod encoder;
mod galois;

pub use block::Block;
pub use decoder::rectify_info;
