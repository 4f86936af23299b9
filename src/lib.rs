// Library for tests to access modules

pub mod config;
pub mod counters;
pub mod error;
pub mod filter;
pub mod models;
pub mod processes;
pub mod routes;
pub mod sampler;
pub mod sensors;
pub mod source;
pub mod sysinfo_repo;
pub mod worker;
