pub mod analyze;
pub mod health;
pub mod image;
pub mod metrics;
pub mod run;
