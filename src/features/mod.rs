pub mod permission_test;
