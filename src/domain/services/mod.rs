// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 审核队列服务
pub mod moderation_service;
#[cfg(test)]
mod moderation_service_test;
/// 相关性评分服务
pub mod scoring_service;
