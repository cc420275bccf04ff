//! P2P 암호화 메신저 네트워크의 세션 부트스트랩 및 연결 상태 계층
//!
//! - 세션 옵션 검증 (IPv6/UDP, HTTP/SOCKS5 프록시)
//! - 부트스트랩 주소 해석 (리터럴 우선, UDP가 켜진 경우에만 DNS, 듀얼 스택)
//! - DHT/TCP 릴레이/어니언 경로 등록
//! - 하위 계층 신호로부터 단일 연결 상태 계산

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod key;
pub mod net;
pub mod session;
pub mod status;
pub mod version;

pub use config::{ProxyType, SessionOptions};
pub use error::{BootstrapError, ErrorKind, NewSessionError, RegistrationError, ResolveError};
pub use key::PublicKey;
pub use session::{Services, Session, SessionStatus};
pub use status::ConnectivityStatus;
pub use version::{version_is_compatible, VERSION_MAJOR, VERSION_MINOR, VERSION_PATCH};

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 로깅 초기화
///
/// `TOX_SESSION_LOG=1` 또는 `RUST_LOG`가 설정되면 활성화됩니다. 디버그 빌드는 기본 ON.
pub fn init_logging() {
    let enabled = std::env::var("TOX_SESSION_LOG")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(cfg!(debug_assertions))
        || std::env::var("RUST_LOG").is_ok();

    if !enabled {
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // 이미 초기화된 경우 무시
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// 환경 변수 설정으로 세션을 만들고 `TOX_BOOTSTRAP_NODES`의 노드에 부트스트랩
pub fn run() -> anyhow::Result<()> {
    init_logging();
    info!("🚀 tox-session {} 시작 중...", version::version_string());

    let options = SessionOptions::from_env()?;
    let (services, mut handles) = Services::local(64);
    let mut session = Session::new(Some(&options), None, services)?;

    let nodes = config::parse_node_list(&std::env::var("TOX_BOOTSTRAP_NODES").unwrap_or_default())?;
    if nodes.is_empty() {
        warn!("TOX_BOOTSTRAP_NODES 비어 있음, 부트스트랩 생략");
    }

    for node in &nodes {
        match session.bootstrap(&node.host, node.port, node.public_key.as_bytes()) {
            Ok(()) => info!("🔗 부트스트랩: {}:{}", node.host, node.port),
            Err(e) => warn!("부트스트랩 실패 {}:{}: {} ({:?})", node.host, node.port, e, e.kind()),
        }
    }

    let mut queued = 0usize;
    while handles.dht_commands.try_recv().is_ok() {
        queued += 1;
    }
    info!(
        "DHT 명령 {}개, TCP 릴레이 후보 {}개",
        queued,
        handles.relays.relay_count()
    );

    println!("{}", serde_json::to_string_pretty(&session.status())?);

    handles.dht.shutdown()?;
    info!("🛑 DHT 엔진 종료 요청");
    Ok(())
}
