//! Helper functions shared by several modules
#[cfg(test)]
pub mod test_helper;
