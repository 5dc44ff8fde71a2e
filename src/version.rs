#![allow(clippy::doc_markdown)] // Generated file contains OPT_LEVEL without backticks

use std::sync::LazyLock;

include!(concat!(env!("OUT_DIR"), "/built.rs"));

/// Full version string: package version plus git commit hash, with a
/// `-dirty` suffix when the working tree had uncommitted changes.
pub static VERSION: LazyLock<String> = LazyLock::new(|| {
    let base = match GIT_COMMIT_HASH {
        Some(hash) => format!("{PKG_VERSION}-{hash}"),
        None => PKG_VERSION.to_string(),
    };
    if matches!(GIT_DIRTY, Some(true)) { format!("{base}-dirty") } else { base }
});
