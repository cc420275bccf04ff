//! 연결 상태 집계
//!
//! 어니언 경로 유무와 DHT의 LAN 밖 피어 유무로 하나의 연결 상태를 계산합니다.
//! 상태는 저장하지 않고 조회할 때마다 새로 계산합니다.

use crate::bootstrap::{DhtBootstrap, OnionPaths};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityStatus {
    /// 동작하는 어니언 경로 없음
    None,
    /// 릴레이를 통해서만 연결됨
    TcpRelay,
    /// LAN 밖 DHT 피어와 UDP로 직접 연결됨
    UdpDirect,
}

impl ConnectivityStatus {
    /// 우선순위: 어니언 경로 없음 → None, LAN 밖 DHT 피어 → UdpDirect, 그 외 TcpRelay
    pub const fn derive(onion_connected: bool, dht_nonlocal_peer: bool) -> Self {
        if !onion_connected {
            ConnectivityStatus::None
        } else if dht_nonlocal_peer {
            ConnectivityStatus::UdpDirect
        } else {
            ConnectivityStatus::TcpRelay
        }
    }

    /// 외부 서비스 상태 조회 (어니언 경로가 없으면 DHT는 조회하지 않음)
    pub fn query(onion: &dyn OnionPaths, dht: &dyn DhtBootstrap) -> Self {
        if !onion.is_connected() {
            return ConnectivityStatus::None;
        }
        Self::derive(true, dht.has_nonlocal_peer())
    }

    pub fn is_connected(&self) -> bool {
        *self != ConnectivityStatus::None
    }
}

impl fmt::Display for ConnectivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectivityStatus::None => write!(f, "none"),
            ConnectivityStatus::TcpRelay => write!(f, "tcp"),
            ConnectivityStatus::UdpDirect => write!(f, "udp"),
        }
    }
}
