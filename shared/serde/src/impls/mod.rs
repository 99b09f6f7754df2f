mod bool;
mod scalars;
