// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod crawl_run_repo_impl;
pub mod crawler_repo_impl;
pub mod lease_repo_impl;
pub mod moderation_repo_impl;
pub mod post_repo_impl;
