// Core modules: value decoding, shell rendering, line extraction and errors.
pub mod command;
pub mod dispatch;
pub mod error;
pub mod legacy;
pub mod scan;
pub mod shell;
pub mod skip;
pub mod structured;
pub mod value;
