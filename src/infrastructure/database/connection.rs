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

use crate::config::settings::DatabaseSettings;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;

/// 按`database`配置段建立连接池
///
/// 未显式配置的项沿用sea-orm的默认值。SQL语句日志在排查时
/// 通过`database.sqlx_logging`打开，常规运行保持关闭。
pub async fn create_pool(settings: &DatabaseSettings) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(settings.url.to_owned());

    if let Some(max) = settings.max_connections {
        opt.max_connections(max);
    }
    if let Some(min) = settings.min_connections {
        opt.min_connections(min);
    }
    if let Some(secs) = settings.connect_timeout {
        // 建连和从池中取连接共用同一个超时
        let timeout = Duration::from_secs(secs);
        opt.connect_timeout(timeout).acquire_timeout(timeout);
    }
    if let Some(secs) = settings.idle_timeout {
        opt.idle_timeout(Duration::from_secs(secs));
    }
    if let Some(secs) = settings.max_lifetime {
        opt.max_lifetime(Duration::from_secs(secs));
    }
    opt.sqlx_logging(settings.sqlx_logging);

    Database::connect(opt).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_pool_honors_url_and_limits() {
        let settings = DatabaseSettings {
            url: "sqlite::memory:".to_string(),
            max_connections: Some(1),
            min_connections: None,
            connect_timeout: Some(5),
            idle_timeout: None,
            max_lifetime: Some(600),
            sqlx_logging: false,
        };

        let db = create_pool(&settings).await.unwrap();
        assert!(db.ping().await.is_ok());
    }
}
