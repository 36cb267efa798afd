#![feature(const_option)]

pub mod archive;
pub mod components;
pub mod id;
pub mod localization;
pub mod module;
pub mod savefile;
pub mod uuid;
pub mod world;
