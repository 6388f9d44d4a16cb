//! Site metadata analyzers.
//!
//! Each analyzer issues its own fetch and is independent of the others, so the
//! pipeline runs them concurrently. Every module exposes two entry points:
//!
//! | Module | Strict | Lenient |
//! |--------|--------|---------|
//! | [`keywords`] | `fetch_keywords` | `extract_keywords` |
//! | [`robots`] | `fetch_robots` | `check_robots_txt` |
//! | [`technology`] | `fetch_technologies` | `detect_web_technologies` |
//!
//! Strict variants return the [`FetchError`](crate::error::FetchError) so the
//! caller can tell "nothing there" from "could not look". Lenient variants log
//! the failure and return an empty value.

pub mod keywords;
pub mod robots;
pub mod technology;
