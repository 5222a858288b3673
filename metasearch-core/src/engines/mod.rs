//! Built-in search backends.
//!
//! Each module provides a struct implementing [`crate::engine::SearchBackend`]
//! that scrapes a specific search engine's HTML results page.

pub mod baidu;
pub mod bing;
pub mod google;
pub mod wx;

pub use baidu::BaiduEngine;
pub use bing::BingEngine;
pub use google::GoogleEngine;
pub use wx::WxEngine;
