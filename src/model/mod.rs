pub mod results;
pub mod series;
