pub mod handlers;
pub mod models;
pub mod parsers;
pub mod riot_client;
pub mod routes;
pub mod school_client;

pub use riot_client::RiotClient;
pub use school_client::SchoolClient;
