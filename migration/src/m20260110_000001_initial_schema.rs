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
        // Create crawlers table
        manager
            .create_table(
                Table::create()
                    .table(Crawlers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Crawlers::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Crawlers::Name).string().not_null())
                    .col(
                        ColumnDef::new(Crawlers::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Crawlers::MinMatchScore)
                            .double()
                            .not_null()
                            .default(0.5),
                    )
                    .col(ColumnDef::new(Crawlers::LastRunAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Crawlers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Crawlers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create sources table
        manager
            .create_table(
                Table::create()
                    .table(Sources::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sources::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Sources::CrawlerId).uuid().not_null())
                    .col(ColumnDef::new(Sources::Url).string().not_null())
                    .col(ColumnDef::new(Sources::SourceType).string().not_null())
                    .col(
                        ColumnDef::new(Sources::Enabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Sources::MaxPages)
                            .integer()
                            .not_null()
                            .default(10),
                    )
                    .col(
                        ColumnDef::new(Sources::MaxDepth)
                            .integer()
                            .not_null()
                            .default(2),
                    )
                    .col(
                        ColumnDef::new(Sources::FollowLinks)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Sources::LastStatus).text())
                    .col(
                        ColumnDef::new(Sources::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sources_crawler")
                            .from(Sources::Table, Sources::CrawlerId)
                            .to(Crawlers::Table, Crawlers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create keywords table
        manager
            .create_table(
                Table::create()
                    .table(Keywords::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Keywords::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Keywords::CrawlerId).uuid().not_null())
                    .col(ColumnDef::new(Keywords::Term).string().not_null())
                    .col(
                        ColumnDef::new(Keywords::Origin)
                            .string()
                            .not_null()
                            .default("manual"),
                    )
                    .col(
                        ColumnDef::new(Keywords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_keywords_crawler")
                            .from(Keywords::Table, Keywords::CrawlerId)
                            .to(Crawlers::Table, Crawlers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create crawl_runs table
        manager
            .create_table(
                Table::create()
                    .table(CrawlRuns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CrawlRuns::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CrawlRuns::CrawlerId).uuid().not_null())
                    .col(ColumnDef::new(CrawlRuns::Status).string().not_null())
                    .col(ColumnDef::new(CrawlRuns::StartedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(CrawlRuns::CompletedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(CrawlRuns::ItemsFound)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CrawlRuns::ItemsProcessed)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(CrawlRuns::Error).text())
                    .col(
                        ColumnDef::new(CrawlRuns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_crawl_runs_crawler")
                            .from(CrawlRuns::Table, CrawlRuns::CrawlerId)
                            .to(Crawlers::Table, Crawlers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create moderation_items table
        manager
            .create_table(
                Table::create()
                    .table(ModerationItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ModerationItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ModerationItems::CrawlerId).uuid().not_null())
                    .col(ColumnDef::new(ModerationItems::Url).string().not_null())
                    .col(ColumnDef::new(ModerationItems::UrlHash).string().not_null())
                    .col(ColumnDef::new(ModerationItems::Title).string())
                    .col(ColumnDef::new(ModerationItems::Summary).text())
                    .col(ColumnDef::new(ModerationItems::Content).text())
                    .col(ColumnDef::new(ModerationItems::ImageUrl).string())
                    .col(ColumnDef::new(ModerationItems::Author).string())
                    .col(ColumnDef::new(ModerationItems::SourceName).string())
                    .col(ColumnDef::new(ModerationItems::Language).string())
                    .col(
                        ColumnDef::new(ModerationItems::Score)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(ModerationItems::Status).string().not_null())
                    .col(
                        ColumnDef::new(ModerationItems::DiscoveredAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(ModerationItems::DecidedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(ModerationItems::DecidedBy).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_moderation_items_crawler")
                            .from(ModerationItems::Table, ModerationItems::CrawlerId)
                            .to(Crawlers::Table, Crawlers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Uniqueness is per crawler, not global
        manager
            .create_index(
                Index::create()
                    .name("uq_moderation_crawler_url_hash")
                    .table(ModerationItems::Table)
                    .col(ModerationItems::CrawlerId)
                    .col(ModerationItems::UrlHash)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create posts table
        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Posts::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Posts::UrlHash)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Posts::Url).string().not_null())
                    .col(ColumnDef::new(Posts::Title).string())
                    .col(ColumnDef::new(Posts::Summary).text())
                    .col(ColumnDef::new(Posts::Content).text())
                    .col(ColumnDef::new(Posts::ImageUrl).string())
                    .col(ColumnDef::new(Posts::Author).string())
                    .col(ColumnDef::new(Posts::SourceName).string())
                    .col(ColumnDef::new(Posts::Language).string())
                    .col(
                        ColumnDef::new(Posts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Posts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create crawler_leases table
        manager
            .create_table(
                Table::create()
                    .table(CrawlerLeases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CrawlerLeases::CrawlerId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CrawlerLeases::Holder).uuid().not_null())
                    .col(
                        ColumnDef::new(CrawlerLeases::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CrawlerLeases::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ModerationItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CrawlRuns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Keywords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sources::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Crawlers::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Crawlers {
    Table,
    Id,
    Name,
    IsActive,
    MinMatchScore,
    LastRunAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Sources {
    Table,
    Id,
    CrawlerId,
    Url,
    SourceType,
    Enabled,
    MaxPages,
    MaxDepth,
    FollowLinks,
    LastStatus,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Keywords {
    Table,
    Id,
    CrawlerId,
    Term,
    Origin,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CrawlRuns {
    Table,
    Id,
    CrawlerId,
    Status,
    StartedAt,
    CompletedAt,
    ItemsFound,
    ItemsProcessed,
    Error,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ModerationItems {
    Table,
    Id,
    CrawlerId,
    Url,
    UrlHash,
    Title,
    Summary,
    Content,
    ImageUrl,
    Author,
    SourceName,
    Language,
    Score,
    Status,
    DiscoveredAt,
    DecidedAt,
    DecidedBy,
}

#[derive(DeriveIden)]
enum Posts {
    Table,
    Id,
    UrlHash,
    Url,
    Title,
    Summary,
    Content,
    ImageUrl,
    Author,
    SourceName,
    Language,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CrawlerLeases {
    Table,
    CrawlerId,
    Holder,
    ExpiresAt,
}
