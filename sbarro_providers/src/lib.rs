pub mod fixed;
pub mod http;

pub use fixed::StaticVisionService;
pub use http::HttpVisionService;
