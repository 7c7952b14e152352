mod permission_test_service;

pub use permission_test_service::PermissionTestService;
