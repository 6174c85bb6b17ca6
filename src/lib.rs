pub mod aggregate;
pub mod app;
pub mod bed;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetcher;
pub mod fs_util;
pub mod join;
pub mod metadata;
pub mod motifs;
pub mod output;
pub mod peaks;
pub mod remote;
pub mod store;
