pub mod config;
pub mod error;
pub mod size;

#[cfg(test)]
pub mod test_utils;
