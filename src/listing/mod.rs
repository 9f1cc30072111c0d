pub mod client;
pub mod scrape;
