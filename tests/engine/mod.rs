pub mod concurrency;
pub mod expansion;
pub mod filters;
pub mod pagination;
pub mod projection;
