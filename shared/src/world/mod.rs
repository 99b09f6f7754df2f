pub mod host;
pub mod object;
