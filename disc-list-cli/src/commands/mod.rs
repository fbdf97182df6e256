pub(crate) mod build;
pub(crate) mod config;
pub(crate) mod icon;
pub(crate) mod resolve;
pub(crate) mod sort;
