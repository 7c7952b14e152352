mod permission_test_handler;

pub use permission_test_handler::*;
