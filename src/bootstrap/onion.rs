//! 어니언 경로 부트스트랩 연동

use crate::key::PublicKey;
use crate::net::Endpoint;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// 어니언 라우팅 서비스
pub trait OnionPaths: Send + Sync {
    /// 경로 구성용 부트스트랩 노드 추가 (실패를 보고하지 않음)
    fn add_bootstrap_path(&self, endpoint: Endpoint, public_key: &PublicKey);

    /// 동작하는 경로가 하나라도 있는지
    fn is_connected(&self) -> bool;
}

/// 경로 노드 목록과 연결 플래그를 공유하는 핸들
#[derive(Debug, Clone, Default)]
pub struct OnionHandle {
    path_nodes: Arc<RwLock<Vec<(Endpoint, PublicKey)>>>,
    connected: Arc<AtomicBool>,
}

impl OnionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// 어니언 엔진이 경로 상태를 갱신할 때 호출
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub fn path_nodes(&self) -> Vec<(Endpoint, PublicKey)> {
        self.path_nodes.read().clone()
    }
}

impl OnionPaths for OnionHandle {
    fn add_bootstrap_path(&self, endpoint: Endpoint, public_key: &PublicKey) {
        let mut nodes = self.path_nodes.write();
        if !nodes.iter().any(|(e, k)| *e == endpoint && k == public_key) {
            nodes.push((endpoint, *public_key));
            debug!("🧅 어니언 부트스트랩 경로 노드 추가: {}", endpoint);
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
