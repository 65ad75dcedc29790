pub mod enhance;
pub mod export;
pub mod plan;
pub mod refine;
pub mod research;
pub mod worksheet;
