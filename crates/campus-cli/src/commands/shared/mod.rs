pub mod limit;
pub mod rows;
