pub mod catalog;
pub mod dispatch;
pub mod executor;
pub mod normalizer;

pub use crate::domain::model::{Intent, Service, UpstreamReply};
pub use crate::domain::ports::{ConfigProvider, DirectionCatalog};
pub use crate::utils::error::Result;
pub use catalog::LanguageCatalog;
pub use dispatch::Translator;
pub use executor::UpstreamClient;
