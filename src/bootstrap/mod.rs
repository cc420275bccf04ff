//! Bootstrap Orchestrator
//!
//! 부트스트랩 노드를 DHT/TCP 릴레이/어니언 경로 서브시스템에 등록합니다.

pub mod dht;
pub mod onion;
pub mod relay;
pub mod stats;
pub mod service;

pub use dht::{DhtBootstrap, DhtCommand, DhtHandle, DhtPeerTable};
pub use onion::{OnionHandle, OnionPaths};
pub use relay::{RelayCandidate, RelayRegistry, TcpRelays};
pub use service::BootstrapService;
pub use stats::{BootstrapStats, StatsCollector};
