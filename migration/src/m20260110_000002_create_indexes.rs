// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_sources_crawler_created")
                    .table(Sources::Table)
                    .col(Sources::CrawlerId)
                    .col(Sources::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_crawl_runs_crawler_status")
                    .table(CrawlRuns::Table)
                    .col(CrawlRuns::CrawlerId)
                    .col(CrawlRuns::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_moderation_items_crawler_status")
                    .table(ModerationItems::Table)
                    .col(ModerationItems::CrawlerId)
                    .col(ModerationItems::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_crawlers_active_last_run")
                    .table(Crawlers::Table)
                    .col(Crawlers::IsActive)
                    .col(Crawlers::LastRunAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_crawlers_active_last_run")
                    .table(Crawlers::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_moderation_items_crawler_status")
                    .table(ModerationItems::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_crawl_runs_crawler_status")
                    .table(CrawlRuns::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_sources_crawler_created")
                    .table(Sources::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Crawlers {
    Table,
    IsActive,
    LastRunAt,
}

#[derive(DeriveIden)]
enum Sources {
    Table,
    CrawlerId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CrawlRuns {
    Table,
    CrawlerId,
    Status,
}

#[derive(DeriveIden)]
enum ModerationItems {
    Table,
    CrawlerId,
    Status,
}
