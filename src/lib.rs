pub mod checker;
pub mod cli;
pub mod input;
pub mod model;
pub mod output;
pub mod probe;
