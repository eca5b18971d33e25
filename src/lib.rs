pub mod app;
pub mod convert;
pub mod domain;
pub mod error;
pub mod fs_util;
pub mod matcher;
pub mod output;
pub mod sql;
pub mod stanza;
pub mod store;
pub mod trackdb;
pub mod ucsc;
