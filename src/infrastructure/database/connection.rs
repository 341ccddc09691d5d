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

/// 从配置创建数据库连接池
///
/// 连接URL决定后端（sqlite或postgres），池参数缺省时交给
/// 驱动默认值。连接生命周期固定为一小时，避免长期占用的
/// 连接在目标库侧被回收后才暴露。
///
/// # 参数
///
/// * `settings` - 数据库配置（URL与可选的池参数）
///
/// # 返回值
///
/// * `Ok(DatabaseConnection)` - 可用的连接池
/// * `Err(DbErr)` - 连接建立失败
pub async fn create_pool(settings: &DatabaseSettings) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(settings.url.clone());

    opt.max_lifetime(Duration::from_secs(3600))
        .sqlx_logging(true);

    if let Some(max) = settings.max_connections {
        opt.max_connections(max);
    }
    if let Some(min) = settings.min_connections {
        opt.min_connections(min);
    }
    if let Some(secs) = settings.connect_timeout {
        // The same budget covers establishing and checking out a connection
        opt.connect_timeout(Duration::from_secs(secs))
            .acquire_timeout(Duration::from_secs(secs));
    }
    if let Some(secs) = settings.idle_timeout {
        opt.idle_timeout(Duration::from_secs(secs));
    }

    Database::connect(opt).await
}
