pub mod client;
pub mod error;
pub mod resolver;

pub use client::ProfileClient;
pub use error::ProfilerError;
pub use resolver::ProfileResolver;
