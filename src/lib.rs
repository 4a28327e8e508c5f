pub mod bookmarks;
pub mod cli;
pub mod clock;
pub mod config;
pub mod display;
pub mod logging;
pub mod models;
pub mod navigation;
pub mod session;
pub mod settings;
pub mod sources;
pub mod state;
pub mod tokenizer;
pub mod ui;
