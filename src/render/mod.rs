pub mod cpu;
pub mod frame;
pub mod surface;
pub(crate) mod text;
