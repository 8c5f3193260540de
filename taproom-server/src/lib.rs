//! Taproom Server - bar loyalty and table-ordering backend
//!
//! # Architecture
//!
//! - **HTTP API** (`api`): RESTful routes and handlers
//! - **Auth** (`auth`): JWT + Argon2 authentication, role gates
//! - **Database** (`db`): SQLite pool, migrations, repositories
//! - **Loyalty** (`loyalty`): ledger accrual arithmetic and scan tokens
//! - **Services** (`services`): cached campaign settings
//!
//! # Module structure
//!
//! ```text
//! taproom-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、角色检查
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层
//! ├── loyalty/       # 积分核心逻辑
//! ├── services/      # 设置缓存
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod loyalty;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - routes auth events to the "security" target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境 (dotenv, 工作目录, 日志)
///
/// 必须在 [`Config::from_env`] 之前调用，保证 .env 中的变量生效
pub fn setup_environment() -> anyhow::Result<()> {
    // .env 是可选的，不存在时静默跳过
    let _ = dotenv::dotenv();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    if config.is_production() {
        init_logger_with_file(
            Some(&config.log_level),
            Some(&config.log_dir().to_string_lossy()),
        );
    } else {
        init_logger_with_file(Some(&config.log_level), None);
    }

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
  ______
 /_  __/___ _____  _________  ____  ____ ___
  / / / __ `/ __ \/ ___/ __ \/ __ \/ __ `__ \
 / / / /_/ / /_/ / /  / /_/ / /_/ / / / / / /
/_/  \__,_/ .___/_/   \____/\____/_/ /_/ /_/
         /_/
    "#
    );
}
