pub mod app;
pub mod broadcast;
pub mod clipboard;
pub mod components;
pub mod config;
pub mod constants;
pub mod context;
pub mod drivers;
pub mod event_loop;
pub mod feed;
pub mod history;
pub mod identity;
pub mod ingest;
pub mod labels;
pub mod overlay;
pub mod runner;
pub mod state;
pub mod theme;
pub mod tracing_sub;
pub mod ui;

pub use context::FocusContext;
pub use identity::IdentityRecord;
pub use ingest::EventIngestor;
