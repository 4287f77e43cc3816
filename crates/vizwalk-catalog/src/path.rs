//! Asset and launch reference resolution
//!
//! Decides how a stored reference (thumbnail, video, executable, URL) is
//! handed to a renderer. The execution context is always passed in; nothing
//! here probes the environment.

use once_cell::sync::Lazy;
use regex::Regex;

static SCHEME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(https?://|blob:|data:|file://)").expect("static regex")
});

static DRIVE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^[a-z]:\\").expect("static regex"));

/// Capabilities of the environment the catalog runs in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Local filesystem access is available
    pub privileged: bool,
    /// Host can launch local executables
    pub can_launch_executables: bool,
    /// Host can hand videos to an external media player
    pub can_open_media_player: bool,
}

impl ExecutionContext {
    /// Sandboxed browser: no local files, no process launch
    #[inline]
    #[must_use]
    pub fn browser() -> Self {
        Self::default()
    }

    /// Privileged host with every launch capability
    #[inline]
    #[must_use]
    pub fn host() -> Self {
        Self {
            privileged: true,
            can_launch_executables: true,
            can_open_media_player: true,
        }
    }

    /// Privileged host that exposes no launch capabilities
    #[inline]
    #[must_use]
    pub fn host_without_launchers() -> Self {
        Self {
            privileged: true,
            ..Self::default()
        }
    }

    /// Whether an executable reference can actually be started here
    #[inline]
    #[must_use]
    pub fn can_start_executables(&self) -> bool {
        self.privileged && self.can_launch_executables
    }
}

/// Shape of a stored reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// Blank
    Empty,
    /// `http(s)://`, `blob:`, `data:` or `file://`
    Qualified,
    /// Drive-letter or UNC path
    LocalPath,
    /// Anything else, e.g. a relative route
    Other,
}

/// Classify a reference without resolving it
#[must_use]
pub fn classify(reference: &str) -> ReferenceKind {
    if reference.is_empty() {
        ReferenceKind::Empty
    } else if SCHEME_RE.is_match(reference) {
        ReferenceKind::Qualified
    } else if is_local_path(reference) {
        ReferenceKind::LocalPath
    } else {
        ReferenceKind::Other
    }
}

/// Drive-letter (`C:\`) or UNC (`\\server`) prefix
#[must_use]
pub fn is_local_path(reference: &str) -> bool {
    DRIVE_RE.is_match(reference) || reference.starts_with(r"\\")
}

/// Resolve a reference for the given context
///
/// Local paths become `file://` URLs only in a privileged context. Outside
/// one they are returned unchanged.
#[must_use]
pub fn resolve(reference: &str, ctx: &ExecutionContext) -> String {
    match classify(reference) {
        ReferenceKind::LocalPath if ctx.privileged => {
            format!("file:///{}", reference.replace('\\', "/"))
        }
        ReferenceKind::LocalPath => {
            tracing::debug!(reference, "local path left unresolved outside privileged context");
            reference.to_string()
        }
        ReferenceKind::Empty | ReferenceKind::Qualified | ReferenceKind::Other => {
            reference.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stays_empty() {
        assert_eq!(resolve("", &ExecutionContext::host()), "");
        assert_eq!(classify(""), ReferenceKind::Empty);
    }

    #[test]
    fn qualified_urls_pass_through() {
        for reference in [
            "https://cdn.example.com/a.png",
            "HTTP://cdn.example.com/a.png",
            "blob:http://localhost/1234",
            "data:image/png;base64,AAAA",
            "file:///C:/a/b.png",
        ] {
            assert_eq!(classify(reference), ReferenceKind::Qualified);
            assert_eq!(resolve(reference, &ExecutionContext::host()), reference);
            assert_eq!(resolve(reference, &ExecutionContext::browser()), reference);
        }
    }

    #[test]
    fn drive_path_only_converted_when_privileged() {
        let path = r"C:\a\b.png";
        assert_eq!(resolve(path, &ExecutionContext::browser()), path);
        assert_eq!(resolve(path, &ExecutionContext::host()), "file:///C:/a/b.png");
        assert_eq!(
            resolve(path, &ExecutionContext::host_without_launchers()),
            "file:///C:/a/b.png"
        );
    }

    #[test]
    fn unc_path() {
        let path = r"\\server\share\walk.mp4";
        assert_eq!(classify(path), ReferenceKind::LocalPath);
        assert_eq!(
            resolve(path, &ExecutionContext::host()),
            "file://///server/share/walk.mp4"
        );
        assert_eq!(resolve(path, &ExecutionContext::browser()), path);
    }

    #[test]
    fn relative_routes_pass_through() {
        let route = "/experience?project=tower";
        assert_eq!(classify(route), ReferenceKind::Other);
        assert_eq!(resolve(route, &ExecutionContext::host()), route);
        assert_eq!(classify("C:/forward/slashes.png"), ReferenceKind::Other);
    }

    #[test]
    fn launch_capability_requires_privilege() {
        let ctx = ExecutionContext {
            privileged: false,
            can_launch_executables: true,
            can_open_media_player: false,
        };
        assert!(!ctx.can_start_executables());
        assert!(ExecutionContext::host().can_start_executables());
        assert!(!ExecutionContext::host_without_launchers().can_start_executables());
    }
}
