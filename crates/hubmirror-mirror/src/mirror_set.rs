//! Pure expansion of a canonical GitHub URL into its mirror candidates.

use crate::data::CandidateMirror;

/// Canonical host prefix the rewrites apply to.
pub const GITHUB_PREFIX: &str = "https://github.com/";

/// Number of candidates every mirror set has.
pub const MIRROR_COUNT: usize = 3;

const REWRITES: [&str; MIRROR_COUNT - 1] = [
    "https://ghfast.top/https://github.com/",
    "https://gh-proxy.com/github.com/",
];

/// Deterministic mirror list for a URL.
///
/// Entry 0 is the URL itself; the other entries substitute every occurrence
/// of [`GITHUB_PREFIX`] with a proxy prefix. A URL without the prefix
/// yields three identical entries, which are probed as-is.
///
/// # Examples
///
/// ```
/// use hubmirror_mirror::MirrorSet;
///
/// let mirrors = MirrorSet::mirrors("https://github.com/o/r/archive/main.zip");
/// assert_eq!(mirrors[0], "https://github.com/o/r/archive/main.zip");
/// assert_eq!(mirrors[1], "https://ghfast.top/https://github.com/o/r/archive/main.zip");
/// assert_eq!(mirrors[2], "https://gh-proxy.com/github.com/o/r/archive/main.zip");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MirrorSet;

impl MirrorSet {
    pub fn mirrors(url: &str) -> [String; MIRROR_COUNT] {
        [
            url.to_string(),
            url.replace(GITHUB_PREFIX, REWRITES[0]),
            url.replace(GITHUB_PREFIX, REWRITES[1]),
        ]
    }

    /// The mirrors of `url`, numbered by position.
    pub fn candidates(url: &str) -> Vec<CandidateMirror> {
        Self::mirrors(url)
            .into_iter()
            .enumerate()
            .map(|(index, url)| CandidateMirror { index, url })
            .collect()
    }
}

/// Shorthand for [`MirrorSet::mirrors`].
pub fn get_mirrors(url: &str) -> [String; MIRROR_COUNT] {
    MirrorSet::mirrors(url)
}
