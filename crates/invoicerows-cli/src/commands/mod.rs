pub mod rows;
pub mod xml;
