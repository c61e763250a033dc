// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含数据库、服务器、调度器和抓取等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 服务器配置
    pub server: ServerSettings,
    /// 调度器配置
    pub scheduler: SchedulerSettings,
    /// 抓取配置
    pub crawl: CrawlSettings,
}

/// 数据库配置设置
#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
    /// 连接最大存活时间（秒）
    pub max_lifetime: Option<u64>,
    /// 是否记录SQL语句日志
    pub sqlx_logging: bool,
}

/// 服务器配置设置
#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 调度器配置设置
#[derive(Debug, Deserialize)]
pub struct SchedulerSettings {
    /// 调度间隔（分钟），也是爬虫到期判定的回看窗口
    pub interval_minutes: i64,
    /// 爬虫租约TTL（秒），应大于一次运行的最长预期时长
    pub lease_ttl_seconds: i64,
}

/// 抓取配置设置
#[derive(Debug, Deserialize)]
pub struct CrawlSettings {
    /// 单次运行的全局条目上限
    pub max_items_per_run: usize,
    /// 单信息源的页面抓取并发上限（对目标站点的礼貌约束）
    pub fetch_concurrency: usize,
    /// HTTP请求超时时间（秒）
    pub request_timeout: u64,
    /// 抓取请求的User-Agent
    pub user_agent: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("CURATRS").separator("__"));

        builder.build()?.try_deserialize()
    }

    /// 默认值层，文件和环境变量源在其上叠加
    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            // Default server settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Default DB pool settings
            .set_default("database.max_connections", 100)?
            .set_default("database.min_connections", 10)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            .set_default("database.max_lifetime", 3600)?
            .set_default("database.sqlx_logging", false)?
            // Default Scheduler settings
            .set_default("scheduler.interval_minutes", 30)?
            .set_default("scheduler.lease_ttl_seconds", 900)?
            // Default Crawl settings
            .set_default("crawl.max_items_per_run", 100)?
            .set_default("crawl.fetch_concurrency", 3)?
            .set_default("crawl.request_timeout", 20)?
            .set_default(
                "crawl.user_agent",
                "Mozilla/5.0 (compatible; curatrs/1.0; +http://curatrs.dev)",
            )
    }
}
