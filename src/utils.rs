use std::io;
use std::path::{Path, PathBuf};

/// Home directory, if the platform can tell us.
pub fn home_dir() -> Option<PathBuf> {
    dirs::home_dir()
}

/// True when listing `path` yields no entries. Only the immediate listing is
/// considered: a directory holding an empty subdirectory is not empty.
pub fn is_empty_dir(path: &Path) -> io::Result<bool> {
    let mut entries = std::fs::read_dir(path)?;
    match entries.next() {
        None => Ok(true),
        Some(Ok(_)) => Ok(false),
        Some(Err(e)) => Err(e),
    }
}

/// Shorten a path for display by replacing the home dir with ~.
pub fn display_path(path: &Path) -> String {
    match home_dir() {
        Some(home) => shorten_under(path, &home),
        None => path.display().to_string(),
    }
}

fn shorten_under(path: &Path, home: &Path) -> String {
    match path.strip_prefix(home) {
        Ok(relative) if !relative.as_os_str().is_empty() => {
            format!("~/{}", relative.display())
        }
        _ => path.display().to_string(),
    }
}

/// Drop a trailing `\n` or `\r\n`, leaving all other whitespace alone.
pub fn strip_line_ending(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_dir_detection_is_shallow() {
        let tmp = tempfile::tempdir().unwrap();
        let outer = tmp.path().join("outer");
        std::fs::create_dir_all(outer.join("inner")).unwrap();

        assert!(is_empty_dir(&outer.join("inner")).unwrap());
        assert!(!is_empty_dir(&outer).unwrap());
    }

    #[test]
    fn missing_dir_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = is_empty_dir(&tmp.path().join("gone")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn shortens_paths_under_home() {
        let home = Path::new("/home/someone");
        assert_eq!(
            shorten_under(Path::new("/home/someone/a/b"), home),
            "~/a/b"
        );
        assert_eq!(shorten_under(Path::new("/srv/data"), home), "/srv/data");
        assert_eq!(shorten_under(home, home), "/home/someone");
    }

    #[test]
    fn strips_only_the_line_ending() {
        assert_eq!(strip_line_ending("yes\n"), "yes");
        assert_eq!(strip_line_ending("yes\r\n"), "yes");
        assert_eq!(strip_line_ending(" yes \n"), " yes ");
        assert_eq!(strip_line_ending("yes"), "yes");
    }
}
