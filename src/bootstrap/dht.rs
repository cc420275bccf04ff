//! DHT 부트스트랩 연동
//!
//! DHT 엔진 자체는 외부 서비스입니다. 세션은 명령 채널로 부트스트랩 노드를 넘기고,
//! 엔진이 갱신하는 피어 테이블로 LAN 밖 피어 연결 여부를 확인합니다.

use crate::error::RegistrationError;
use crate::key::PublicKey;
use crate::net::Endpoint;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

/// DHT 부트스트랩 서비스
pub trait DhtBootstrap: Send + Sync {
    /// 부트스트랩 노드 등록 (전송 계층에서 거부되면 에러)
    fn add_bootstrap_node(
        &self,
        endpoint: Endpoint,
        public_key: &PublicKey,
    ) -> Result<(), RegistrationError>;

    /// 로컬/사설 네트워크 밖의 피어와 연결되어 있는지
    fn has_nonlocal_peer(&self) -> bool;
}

/// DHT 엔진으로 보내는 명령
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DhtCommand {
    AddBootstrapNode {
        endpoint: Endpoint,
        public_key: PublicKey,
    },
    Shutdown,
}

/// 엔진이 관리하는 연결 피어 테이블
#[derive(Debug, Clone, Default)]
pub struct DhtPeerTable {
    peers: Arc<RwLock<HashMap<PublicKey, Endpoint>>>,
}

impl DhtPeerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_connected(&self, public_key: PublicKey, endpoint: Endpoint) {
        self.peers.write().insert(public_key, endpoint);
    }

    pub fn mark_disconnected(&self, public_key: &PublicKey) {
        self.peers.write().remove(public_key);
    }

    pub fn peer_count(&self) -> usize {
        self.peers.read().len()
    }

    pub fn has_nonlocal_peer(&self) -> bool {
        self.peers.read().values().any(|ep| !ep.is_lan())
    }
}

/// DHT 엔진 핸들
#[derive(Clone)]
pub struct DhtHandle {
    command_tx: mpsc::Sender<DhtCommand>,
    peers: DhtPeerTable,
}

impl DhtHandle {
    /// 핸들과 엔진 쪽 명령 수신기 생성
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<DhtCommand>) {
        let (command_tx, command_rx) = mpsc::channel(capacity.max(1));
        let handle = Self {
            command_tx,
            peers: DhtPeerTable::new(),
        };
        (handle, command_rx)
    }

    /// 엔진이 연결 상태를 기록할 피어 테이블
    pub fn peer_table(&self) -> DhtPeerTable {
        self.peers.clone()
    }

    pub fn shutdown(&self) -> Result<(), RegistrationError> {
        self.send(DhtCommand::Shutdown)
    }

    fn send(&self, command: DhtCommand) -> Result<(), RegistrationError> {
        self.command_tx.try_send(command).map_err(|e| match e {
            TrySendError::Full(_) => RegistrationError::new("DHT command queue is full"),
            TrySendError::Closed(_) => RegistrationError::new("DHT engine is not running"),
        })
    }
}

impl DhtBootstrap for DhtHandle {
    fn add_bootstrap_node(
        &self,
        endpoint: Endpoint,
        public_key: &PublicKey,
    ) -> Result<(), RegistrationError> {
        if endpoint.port() == 0 || endpoint.ip().is_unspecified() {
            return Err(RegistrationError::new(format!(
                "unusable bootstrap endpoint {}",
                endpoint
            )));
        }

        self.send(DhtCommand::AddBootstrapNode {
            endpoint,
            public_key: *public_key,
        })
        .map_err(|e| {
            warn!("DHT 부트스트랩 노드 등록 실패 {}: {}", endpoint, e);
            e
        })?;

        debug!("🌐 DHT 부트스트랩 노드 등록: {} ({:?})", endpoint, public_key);
        Ok(())
    }

    fn has_nonlocal_peer(&self) -> bool {
        self.peers.has_nonlocal_peer()
    }
}
