pub mod config;
pub mod logging;

pub mod attrs;
pub mod cancel;
pub mod events;
pub mod extract;
pub mod fetch;
pub mod filter;
pub mod pipeline;
pub mod release;
pub mod sanitize;
pub mod session;
pub mod transfer;
