// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod helpers;
pub mod lease_test;
pub mod moderation_flow_test;
pub mod run_pipeline_test;
