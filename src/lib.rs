// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含核心业务实体、服务和仓库接口
pub mod domain;

/// 运行引擎模块
///
/// 实现单次抓取运行的完整流水线
pub mod engine;

/// 信息源抓取模块
///
/// 实现RSS与网页两类信息源的抓取器
pub mod fetchers;

/// 基础设施模块
///
/// 提供外部服务集成，如数据库等
pub mod infrastructure;

/// 表示层模块
///
/// 处理HTTP请求和响应，包括路由和处理器
pub mod presentation;

/// 调度器模块
///
/// 实现到期爬虫的周期性调度与集群互斥
pub mod scheduler;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;
