pub mod client;
pub mod error;
pub mod parse;
mod rate_limit;

pub use client::DirectoryClient;
pub use error::ScraperError;
pub use parse::{parse_category_listing, parse_directory_listing, strip_html_text};
