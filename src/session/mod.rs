//! 세션 핸들
//!
//! 설정 해석이 성공해야만 세션이 존재하며, 부트스트랩/상태 조회는 세션 메서드로만 가능합니다.

pub mod handle;

#[cfg(test)]
mod tests;

pub use handle::{LocalHandles, Services, Session, SessionStatus, StateLoader, ENCRYPTED_SAVE_MAGIC};
