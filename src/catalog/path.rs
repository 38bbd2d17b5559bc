use thiserror::Error;

pub const DEFAULT_UPGRADES_PATH: &str = "scripts/items/mvm_upgrades.txt";

/// Why an upgrades file path was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathRejection {
    #[error("contains a parent directory reference")]
    Traversal,
    #[error("contains whitespace or a control character")]
    Whitespace,
    #[error("contains ':'")]
    Colon,
    #[error("contains a double backslash")]
    DoubleBackslash,
    #[error("is absolute")]
    Absolute,
    #[error("has no file extension")]
    MissingExtension,
    #[error("has extension '{0}', expected 'txt'")]
    WrongExtension(String),
}

fn extension(path: &str) -> Option<&str> {
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    file_name.rsplit_once('.').map(|(_, ext)| ext)
}

fn is_absolute(path: &str) -> bool {
    let bytes = path.as_bytes();
    let drive_prefix = bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':';
    path.starts_with(['/', '\\']) || drive_prefix
}

/// Accepts relative `.txt` paths with no traversal, drive components, whitespace or
/// control characters.
pub fn validate_upgrades_path(path: &str) -> Result<(), PathRejection> {
    if path.contains("..") {
        return Err(PathRejection::Traversal);
    }
    if path.chars().any(|ch| ch.is_whitespace() || ch.is_control()) {
        return Err(PathRejection::Whitespace);
    }
    if is_absolute(path) {
        return Err(PathRejection::Absolute);
    }
    if path.contains(':') {
        return Err(PathRejection::Colon);
    }
    if path.contains("\\\\") {
        return Err(PathRejection::DoubleBackslash);
    }
    match extension(path) {
        None => Err(PathRejection::MissingExtension),
        Some("txt") => Ok(()),
        Some(other) => Err(PathRejection::WrongExtension(other.to_string())),
    }
}
