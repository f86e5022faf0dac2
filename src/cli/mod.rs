mod migrate;
mod server;

pub use migrate::migrate;
pub use server::serve;
