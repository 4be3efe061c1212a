pub mod checklist;
pub mod config;
pub mod run;
