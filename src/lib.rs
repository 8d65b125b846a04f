pub mod api;
pub mod clock;
pub mod directory;
pub mod fetch;
pub mod output;
pub mod route;
pub mod service;
pub mod simulator;
pub mod tracker;
pub mod wire;
