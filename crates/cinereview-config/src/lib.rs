pub mod config;
pub mod paths;
pub mod session;

pub use config::{BackendConfig, Config, DeleteCategoryPolicy, ReviewOptions};
pub use paths::{PathManager, container_base_path};
pub use session::{SessionStore, StoredSession};
