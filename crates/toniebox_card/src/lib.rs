pub mod card;
pub mod command;
pub mod config;
pub mod editor;
pub mod registry;
pub mod render;
pub mod resolve;
pub mod state;

pub use card::Card;
pub use card::Host;
pub use card::JsonLinesHost;
pub use command::dispatch;
pub use command::Control;
pub use command::Outbound;
pub use config::normalize;
pub use config::CardConfig;
pub use config::ConfigError;
pub use registry::register_cards;
pub use registry::CardRegistry;
pub use resolve::resolve;
pub use resolve::DisplayModel;
pub use state::EntityState;
pub use state::Snapshot;
