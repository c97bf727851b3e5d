pub mod alignment;
pub mod mindset;
pub mod risk;
