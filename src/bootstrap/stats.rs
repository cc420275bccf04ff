//! 부트스트랩 통계 수집

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// 통계 수집기
#[derive(Debug)]
pub struct StatsCollector {
    /// 세션 생성 시간
    started_at: Instant,

    /// bootstrap 호출 수
    pub bootstrap_calls: u64,

    /// add_tcp_relay 호출 수
    pub relay_calls: u64,

    /// TCP 릴레이 등록 수 (secondary 포함)
    pub relays_registered: u64,

    /// 어니언 경로 노드 등록 수
    pub onion_paths_registered: u64,

    /// DHT 부트스트랩 등록 성공 수
    pub dht_nodes_registered: u64,

    /// DHT 등록 거부 수
    pub dht_rejections: u64,

    /// 주소 해석 실패 수
    pub resolution_failures: u64,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            bootstrap_calls: 0,
            relay_calls: 0,
            relays_registered: 0,
            onion_paths_registered: 0,
            dht_nodes_registered: 0,
            dht_rejections: 0,
            resolution_failures: 0,
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn snapshot(&self) -> BootstrapStats {
        BootstrapStats {
            uptime_secs: self.uptime_secs(),
            bootstrap_calls: self.bootstrap_calls,
            relay_calls: self.relay_calls,
            relays_registered: self.relays_registered,
            onion_paths_registered: self.onion_paths_registered,
            dht_nodes_registered: self.dht_nodes_registered,
            dht_rejections: self.dht_rejections,
            resolution_failures: self.resolution_failures,
        }
    }
}

impl Default for StatsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// 통계 스냅샷
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapStats {
    pub uptime_secs: u64,
    pub bootstrap_calls: u64,
    pub relay_calls: u64,
    pub relays_registered: u64,
    pub onion_paths_registered: u64,
    pub dht_nodes_registered: u64,
    pub dht_rejections: u64,
    pub resolution_failures: u64,
}
