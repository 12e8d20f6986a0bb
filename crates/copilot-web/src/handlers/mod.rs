pub mod analyze;
pub mod page;
pub mod prevalence;
