//! Object-storage permission probes.
//!
//! Each endpoint runs one operation against a fixed key so an operator can
//! see which calls the configured credentials are allowed to make.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/weatherforecast/get` | No | List objects under `PERMISSION-TEST` |
//! | GET | `/weatherforecast/upload` | No | Write `sample text` to the fixed key |
//! | GET | `/weatherforecast/copy` | No | Copy the fixed key to `file-copied.txt` |
//! | GET | `/weatherforecast/download` | No | Read the fixed key as text |
//! | GET | `/weatherforecast/delete` | No | Delete the fixed key |

pub mod handlers;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::PermissionTestService;
