//! 라이브러리 버전 및 호환성 검사

pub const VERSION_MAJOR: u32 = 0;
pub const VERSION_MINOR: u32 = 1;
pub const VERSION_PATCH: u32 = 0;

/// 요청한 버전의 API를 이 라이브러리가 제공하는지
///
/// major가 같고, 요청한 (minor, patch)가 라이브러리보다 새롭지 않으면 호환됩니다.
pub fn version_is_compatible(major: u32, minor: u32, patch: u32) -> bool {
    major == VERSION_MAJOR
        && (minor < VERSION_MINOR || (minor == VERSION_MINOR && patch <= VERSION_PATCH))
}

pub fn version_string() -> String {
    format!("{}.{}.{}", VERSION_MAJOR, VERSION_MINOR, VERSION_PATCH)
}
