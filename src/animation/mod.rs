pub mod ease;
pub mod step;
