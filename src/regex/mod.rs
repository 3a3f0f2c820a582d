// Cached regular expression literals

mod cache;
