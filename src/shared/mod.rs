pub mod constants;
pub mod types;

#[cfg(test)]
pub mod test_helpers;
