/// A fixed regex literal, compiled the first time it is reached and cached
/// for the rest of the process. The chunk fences in literate documents and
/// the roxygen prefixes and tags are matched against every line of every
/// file styled, so the patterns must not be rebuilt per call. Only takes a
/// literal: a pattern that cannot compile is a bug in refmt, not an input
/// error, and panics accordingly.
#[macro_export]
macro_rules! pattern {
    ($regex:literal) => {{
        static CACHED: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        CACHED.get_or_init(|| regex::Regex::new($regex).expect("fixed pattern must compile"))
    }};
}
