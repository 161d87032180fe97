pub mod file;
mod png;
