pub mod scrapers;
pub mod window;

pub use scrapers::{create_source, GoogleNewsScraper, StaticSource};
pub use window::ResultsWindow;

pub mod prelude {
    pub use super::scrapers::create_source;
    pub use super::window::ResultsWindow;
    pub use ns_core::{Article, Error, NewsSource, Result, Topic};
}
