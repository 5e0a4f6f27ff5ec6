//! Path helpers for config resolution.
//!
//! Everything here except [`program_dir`] is pure path manipulation with no
//! filesystem I/O.

use std::path::{Component, Path, PathBuf};

/// Directory containing the running executable.
///
/// Falls back to the working directory, then to `.`, when it cannot be
/// determined.
pub fn program_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Make `path` absolute against `cwd` and fold `.` and `..` components.
pub fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_path_components(path)
    } else {
        normalize_path_components(&cwd.join(path))
    }
}

/// Express `path` relative to `cwd`.
///
/// Returns `.` when both name the same directory. A path on a different
/// root or drive prefix is returned absolute.
pub fn relative_to(path: &Path, cwd: &Path) -> PathBuf {
    let target = absolutize(path, cwd);
    let base = absolutize(cwd, cwd);

    let target_parts: Vec<Component> = target.components().collect();
    let base_parts: Vec<Component> = base.components().collect();

    if target_parts.first() != base_parts.first() {
        return target;
    }

    let common = target_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for component in &target_parts[common..] {
        relative.push(component.as_os_str());
    }

    if relative.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        relative
    }
}

/// Normalize path components (resolve `.` and `..`) without touching the filesystem.
fn normalize_path_components(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::Prefix(p) => {
                // Windows drive prefix (e.g., C:)
                components.push(Component::Prefix(p));
            }
            Component::RootDir => {
                components.push(Component::RootDir);
            }
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                // `..` at the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => components.push(Component::ParentDir),
            },
            Component::Normal(name) => {
                components.push(Component::Normal(name));
            }
        }
    }

    components.iter().collect()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_absolutize_relative() {
        assert_eq!(
            absolutize(Path::new("./music/../songs"), Path::new("/home/user")),
            PathBuf::from("/home/user/songs")
        );
    }

    #[test]
    fn test_absolutize_keeps_absolute() {
        assert_eq!(
            absolutize(Path::new("/srv/./music"), Path::new("/home/user")),
            PathBuf::from("/srv/music")
        );
    }

    #[test]
    fn test_parent_at_root_is_dropped() {
        assert_eq!(
            absolutize(Path::new("/../etc"), Path::new("/")),
            PathBuf::from("/etc")
        );
    }

    #[test]
    fn test_relative_child() {
        assert_eq!(
            relative_to(Path::new("/opt/app/Music"), Path::new("/opt/app")),
            PathBuf::from("Music")
        );
    }

    #[test]
    fn test_relative_sibling() {
        assert_eq!(
            relative_to(Path::new("/opt/app/Music"), Path::new("/home/user")),
            PathBuf::from("../../opt/app/Music")
        );
    }

    #[test]
    fn test_relative_same_dir() {
        assert_eq!(
            relative_to(Path::new("/home/user/"), Path::new("/home/user")),
            PathBuf::from(".")
        );
    }

    #[test]
    fn test_relative_input_is_normalized() {
        assert_eq!(
            relative_to(Path::new("./downloads/../Music"), Path::new("/home/user")),
            PathBuf::from("Music")
        );
    }

    #[test]
    fn test_relative_parent() {
        assert_eq!(
            relative_to(Path::new(".."), Path::new("/home/user")),
            PathBuf::from("..")
        );
    }
}
