//! Configuration Resolver
//!
//! 사용자 옵션 → 검증된 세션 설정.

pub mod nodes;
pub mod options;
pub mod session;

pub use nodes::{parse_node_list, BootstrapNodeSpec};
pub use options::{ProxyType, SessionOptions};
pub use session::{ProxyConfig, ProxyServer, SessionConfig};
