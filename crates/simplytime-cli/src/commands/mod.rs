pub mod breathe;
pub mod run;
