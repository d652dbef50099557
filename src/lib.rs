// Library for tests to access modules

pub mod aggregator;
pub mod aws_repo;
pub mod chat;
pub mod config;
pub mod models;
pub mod pricing;
pub mod routes;
pub mod state;
pub mod version;
