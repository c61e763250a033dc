// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据库模块
pub mod database;
/// 仓库实现模块
pub mod repositories;
