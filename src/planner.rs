mod constraints;
mod sipp;

pub use sipp::Sipp;
