pub mod datablock;
pub mod kinds;
pub mod replicate;
