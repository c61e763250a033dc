// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod crawl_run;
pub mod crawler;
pub mod crawler_lease;
pub mod keyword;
pub mod moderation_item;
pub mod post;
pub mod source;
