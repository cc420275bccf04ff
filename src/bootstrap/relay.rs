//! TCP 릴레이 후보 관리
//!
//! UDP 직접 연결이 불가능할 때 트래픽을 중계할 TCP 릴레이 후보를 보관합니다.
//! 같은 릴레이를 여러 번 추가해도 에러가 아니며, 중복 제거는 이 레지스트리가 담당합니다.

use crate::key::PublicKey;
use crate::net::Endpoint;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// TCP 릴레이 서브시스템 (실패를 보고하지 않음)
pub trait TcpRelays: Send + Sync {
    fn add_tcp_relay(&self, endpoint: Endpoint, public_key: &PublicKey);
}

/// 릴레이 후보 정보
#[derive(Debug, Clone)]
pub struct RelayCandidate {
    pub endpoint: Endpoint,
    pub public_key: PublicKey,
    pub added_at: Instant,
    pub last_added: Instant,
    /// 같은 후보가 추가된 횟수
    pub times_added: u32,
}

/// 메모리 기반 릴레이 레지스트리
#[derive(Debug, Clone, Default)]
pub struct RelayRegistry {
    relays: Arc<DashMap<(Endpoint, PublicKey), RelayCandidate>>,
}

impl RelayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn relay_count(&self) -> usize {
        self.relays.len()
    }

    pub fn candidates(&self) -> Vec<RelayCandidate> {
        let mut all: Vec<_> = self.relays.iter().map(|r| r.value().clone()).collect();
        all.sort_by_key(|r| r.added_at);
        all
    }

    pub fn contains(&self, endpoint: &Endpoint, public_key: &PublicKey) -> bool {
        self.relays.contains_key(&(*endpoint, *public_key))
    }

    pub fn remove(&self, endpoint: &Endpoint, public_key: &PublicKey) -> bool {
        let removed = self.relays.remove(&(*endpoint, *public_key)).is_some();
        if removed {
            info!("👋 TCP 릴레이 제거: {}", endpoint);
        }
        removed
    }
}

impl TcpRelays for RelayRegistry {
    fn add_tcp_relay(&self, endpoint: Endpoint, public_key: &PublicKey) {
        let now = Instant::now();
        let mut entry = self
            .relays
            .entry((endpoint, *public_key))
            .or_insert_with(|| {
                info!("📡 TCP 릴레이 추가: {} ({:?})", endpoint, public_key);
                RelayCandidate {
                    endpoint,
                    public_key: *public_key,
                    added_at: now,
                    last_added: now,
                    times_added: 0,
                }
            });

        entry.times_added += 1;
        entry.last_added = now;
        if entry.times_added > 1 {
            debug!("TCP 릴레이 중복 추가: {} (x{})", endpoint, entry.times_added);
        }
    }
}
