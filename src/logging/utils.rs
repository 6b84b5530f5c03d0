//! Log file location, colour stripping and timestamps.
use std::fs;
use std::path::PathBuf;

/// Directory name under the user cache directory.
const CACHE_SUBDIR: &str = "modblur";

/// Remove terminal escape sequences so coloured result lines land in the
/// log file as plain text.
///
/// A CSI sequence (`ESC [` ... final byte in `@`..=`~`) is dropped whole;
/// any other escape drops only the byte that follows `ESC`.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find('\x1b') {
        let (head, tail) = rest.split_at(start);
        out.push_str(head);
        let after = tail.get(1..).unwrap_or_default();
        rest = match after.strip_prefix('[') {
            Some(csi) => csi
                .find(|c: char| ('@'..='~').contains(&c))
                .and_then(|end| csi.get(end + 1..))
                .unwrap_or_default(),
            None => {
                let mut chars = after.chars();
                chars.next();
                chars.as_str()
            }
        };
    }
    out.push_str(rest);
    out
}

/// `$XDG_CACHE_HOME/modblur`, falling back to `~/.cache/modblur`, created
/// on demand.
fn cache_dir() -> Option<PathBuf> {
    let base = match std::env::var_os("XDG_CACHE_HOME") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map_or_else(|| PathBuf::from("."), PathBuf::from)
            .join(".cache"),
    };
    let dir = base.join(CACHE_SUBDIR);
    fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Log file for one command, e.g. `~/.cache/modblur/update.log`.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(format!("{command}.log")))
}

/// Current UTC time rendered with a `chrono` format string.
pub(super) fn utc_now(format: &str) -> String {
    chrono::Utc::now().format(format).to_string()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::logging::TEST_ENV_MUTEX;

    #[test]
    fn strip_ansi_keeps_plain_text() {
        assert_eq!(strip_ansi(""), "");
        assert_eq!(strip_ansi("Selection unchanged."), "Selection unchanged.");
    }

    #[test]
    fn strip_ansi_removes_result_line_colours() {
        assert_eq!(
            strip_ansi("\x1b[32m[+] 'Round' was successfully installed!\x1b[0m"),
            "[+] 'Round' was successfully installed!"
        );
        assert_eq!(
            strip_ansi("\x1b[1;34m==>\x1b[0m \x1b[1mUpdating\x1b[0m"),
            "==> Updating"
        );
    }

    #[test]
    fn strip_ansi_handles_other_escapes() {
        assert_eq!(strip_ansi("\x1b[2Jclear"), "clear");
        assert_eq!(strip_ansi("\x1bMup"), "up");
        assert_eq!(strip_ansi("cut\x1b[3"), "cut");
        assert_eq!(strip_ansi("tail\x1b"), "tail");
    }

    #[test]
    #[allow(unsafe_code)]
    fn log_file_path_honours_xdg_cache_home() {
        let tmp = tempfile::tempdir().unwrap();
        let _lock = TEST_ENV_MUTEX
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        // SAFETY: Protected by TEST_ENV_MUTEX; restored before lock is released.
        unsafe {
            std::env::set_var("XDG_CACHE_HOME", tmp.path());
        }
        let path = log_file_path("theme");
        // SAFETY: As above.
        unsafe {
            std::env::remove_var("XDG_CACHE_HOME");
        }
        assert_eq!(path, Some(tmp.path().join("modblur").join("theme.log")));
    }

    #[test]
    fn utc_now_follows_format() {
        let stamp = utc_now("%Y-%m-%d %H:%M:%S");
        assert_eq!(stamp.len(), 19);
        assert!(chrono::NaiveDateTime::parse_from_str(&stamp, "%Y-%m-%d %H:%M:%S").is_ok());
    }
}
