use std::borrow::Cow;
use std::fmt::Display;

/// Path conventions used to decide whether a reference is rooted and how to
/// join relative ones. Chosen by the caller, never inferred from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathStyle {
    #[default]
    Posix,
    Windows,
}

impl PathStyle {
    /// Style matching the platform this was compiled for.
    pub const fn native() -> Self {
        if cfg!(windows) {
            PathStyle::Windows
        } else {
            PathStyle::Posix
        }
    }

    pub const fn separator(self) -> char {
        match self {
            PathStyle::Posix => '/',
            PathStyle::Windows => '\\',
        }
    }

    /// Directory part of `location`: everything before its last separator,
    /// empty when `location` has no separator at all.
    pub fn parent(self, location: &str) -> &str {
        let cut = match self {
            PathStyle::Posix => location.rfind('/'),
            PathStyle::Windows => location.rfind('\\').or_else(|| location.rfind('/')),
        };
        cut.map_or("", |cut| &location[..cut])
    }
}

impl Display for PathStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathStyle::Posix => write!(f, "posix"),
            PathStyle::Windows => write!(f, "windows"),
        }
    }
}

/// Resolves candidate references against the directory of the playlist.
///
/// # Example
///
/// ```rust
/// use metademux::process::resolve::{PathStyle, Resolver};
///
/// let resolver = Resolver::new("/a/b/list.m3u", PathStyle::Posix);
/// assert_eq!(resolver.resolve("song.mp3"), "/a/b/song.mp3");
/// assert_eq!(resolver.resolve("http://host/x.mp3"), "http://host/x.mp3");
///
/// let resolver = Resolver::new("C:\\music\\list.m3u", PathStyle::Windows);
/// assert_eq!(resolver.resolve("song.mp3"), "C:\\music\\song.mp3");
/// assert_eq!(resolver.resolve("D:song.mp3"), "D:song.mp3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolver {
    style: PathStyle,
    base_dir: Option<String>,
}

impl Resolver {
    /// # Arguments
    ///
    /// * `location` - Location of the playlist itself
    /// * `style` - Path conventions to apply
    pub fn new(location: &str, style: PathStyle) -> Self {
        Self {
            style,
            base_dir: Some(style.parent(location).to_owned()),
        }
    }

    /// Resolver for a playlist with no known location. Every candidate is
    /// returned unchanged.
    pub fn detached(style: PathStyle) -> Self {
        Self {
            style,
            base_dir: None,
        }
    }

    pub fn base_dir(&self) -> Option<&str> {
        self.base_dir.as_deref()
    }

    /// A `:` outside a drive-letter prefix marks a URL or MRL scheme.
    fn has_scheme(&self, candidate: &str) -> bool {
        let Some(colon) = candidate.find(':') else {
            return false;
        };
        match self.style {
            PathStyle::Posix => true,
            // "c:/x", "c:\x" and "c:x" are drive paths, "c://x" is a scheme
            PathStyle::Windows if colon == 1 => candidate[2..].starts_with("//"),
            PathStyle::Windows => true,
        }
    }

    fn is_rooted(&self, candidate: &str) -> bool {
        match self.style {
            PathStyle::Posix => candidate.starts_with('/'),
            PathStyle::Windows => {
                candidate.starts_with(['/', '\\']) || candidate.as_bytes().get(1) == Some(&b':')
            }
        }
    }

    /// Returns `true` if `candidate` is used as-is.
    pub fn is_absolute(&self, candidate: &str) -> bool {
        self.has_scheme(candidate) || self.is_rooted(candidate)
    }

    /// Joins a relative candidate onto the playlist directory. Absolute
    /// candidates come back unchanged, as does everything when the location
    /// is unknown.
    ///
    /// An empty directory still joins under POSIX conventions, so
    /// `song.mp3` next to `list.m3u` becomes `/song.mp3`. Windows
    /// conventions leave the candidate alone instead.
    pub fn resolve<'c>(&self, candidate: &'c str) -> Cow<'c, str> {
        let Some(dir) = &self.base_dir else {
            return Cow::Borrowed(candidate);
        };
        if self.is_absolute(candidate) || (dir.is_empty() && self.style == PathStyle::Windows) {
            return Cow::Borrowed(candidate);
        }
        Cow::Owned(format!("{dir}{}{candidate}", self.style.separator()))
    }
}
