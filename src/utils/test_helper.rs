//! various helper functions used to simplify unit tests.
//!
//! **Note**: This module is only compiled and used during testing.
use log::Level;

/// Assert that exactly the given warnings (in this order) were logged since `testing_logger::setup()`.
pub fn check_warnings(expected_warnings: Vec<&str>) {
    testing_logger::validate(|captured_logs| {
        let warnings: Vec<_> = captured_logs
            .iter()
            .filter(|l| l.level == Level::Warn)
            .map(|l| l.body.as_str())
            .collect();
        assert_eq!(warnings, expected_warnings);
    });
}
