//! 工具函数

pub mod cscs;
pub mod datetime;
pub mod slug;
