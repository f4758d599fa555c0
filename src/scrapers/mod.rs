pub mod browser;
pub mod file;
pub mod http;
pub mod imoova;
pub mod nights;
pub mod traits;

pub use browser::BrowserPageProvider;
pub use file::FilePageProvider;
pub use http::HttpPageProvider;
pub use imoova::OfferParser;
pub use nights::NightsRule;
pub use traits::PageProvider;
