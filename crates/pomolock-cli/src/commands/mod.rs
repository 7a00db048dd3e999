pub mod config;
pub mod phrases;
pub mod run;
pub mod status;
