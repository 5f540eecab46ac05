pub mod changelog;
pub mod config;
pub mod issue;
pub mod ordered_map;
