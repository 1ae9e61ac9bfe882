// Analysis API: sequences Extractor → Locator → Matcher for one request.

pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod upload;
