#![allow(dead_code)]

pub mod memory_repo;
pub mod scripted_ads;
