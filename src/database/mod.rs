pub mod connector;

pub use connector::{DB, connect_with_settings, ping};
