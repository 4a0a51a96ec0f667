pub mod dispatch;
pub mod domains;
pub mod quiz;
pub mod results;
pub mod schema;
pub mod shared;
