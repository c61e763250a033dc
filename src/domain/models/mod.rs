// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 爬虫配置模型（爬虫、信息源、关键词）
pub mod crawler;
/// 爬取运行模型
pub mod crawl_run;
/// 抓取条目模型
pub mod fetched_item;
/// 审核条目模型
pub mod moderation_item;
/// 发布内容模型
pub mod post;
