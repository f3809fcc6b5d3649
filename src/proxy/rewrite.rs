//! Playlist URL rewriting.
//!
//! Absolute references to the origin (`http(s)://<origin>`, optionally
//! followed by the proxy prefix) become the bare proxy prefix, so players
//! fetch every segment back through the relay.
//!
//! A bare origin reference with a different path after it is rewritten as
//! well, keeping that path: `http://<origin>/other.ts` becomes
//! `/livelan//other.ts`.

use std::borrow::Cow;

use regex::{NoExpand, Regex};

/// Compiled rewrite rule for one origin and prefix.
#[derive(Debug, Clone)]
pub struct PlaylistRewriter {
    pattern: Regex,
    prefix: String,
}

impl PlaylistRewriter {
    pub fn new(origin: &str, prefix: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(
            r"https?://{}(?:{})?",
            regex::escape(origin),
            regex::escape(prefix)
        ))?;
        Ok(Self {
            pattern,
            prefix: prefix.to_string(),
        })
    }

    /// Rewrite every origin reference in `text`. Borrows when nothing matched.
    pub fn rewrite<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(text, NoExpand(&self.prefix))
    }
}

/// Playlists are recognised by a case-sensitive `.m3u8` path suffix.
pub fn is_playlist(path: &str) -> bool {
    path.ends_with(".m3u8")
}
