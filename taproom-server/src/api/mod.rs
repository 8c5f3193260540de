//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查接口
//! - [`auth`] - 认证和注册队列接口
//! - [`orders`] - 订单生命周期接口
//! - [`beers`] - 扫码积分和吧台购买接口
//! - [`users`] - 用户资料和消费历史接口
//! - [`tables`] - 公开桌台数量接口
//! - [`admin`] - 管理员接口 (用户、设置、消费记录)

pub mod admin;
pub mod auth;
pub mod beers;
pub mod health;
pub mod orders;
pub mod tables;
pub mod users;

// Re-export common types for handlers
pub use crate::utils::AppResult;
