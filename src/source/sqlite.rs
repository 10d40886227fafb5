use crate::models::{DimensionKey, RawRow, ZeroHitItem, ZeroHitOrder};
use crate::source::tables::{zero_hit_order_sql, Tables};
use crate::source::{DataSource, SourceResult};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::sync::Arc;

pub struct SqliteSource {
    pool: Arc<SqlitePool>,
    tables: Tables,
}

impl SqliteSource {
    pub async fn new(database_url: &str, max_connections: u32, table_prefix: &str) -> Result<Self> {
        let tables = Tables::new(table_prefix)?;
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
            tables,
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        self.pool.as_ref()
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }
}

#[async_trait]
impl DataSource for SqliteSource {
    async fn is_installed(&self) -> SourceResult<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(self.tables.post_stats())
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count > 0)
    }

    async fn author_rows(&self) -> SourceResult<Vec<RawRow>> {
        let sql = format!(
            r#"
            SELECT u.ID, u.display_name,
                CAST(SUM(k.pageviews) AS INTEGER) AS views,
                COUNT(DISTINCT p.ID) AS posts
            FROM {posts} AS p
            JOIN {stats} AS k ON k.id = p.ID
            JOIN {users} AS u ON u.ID = p.post_author
            GROUP BY u.ID, u.display_name
            ORDER BY views DESC
            "#,
            posts = self.tables.posts(),
            stats = self.tables.post_stats(),
            users = self.tables.users(),
        );

        let rows = sqlx::query_as::<_, (i64, String, i64, i64)>(&sql)
            .fetch_all(self.pool.as_ref())
            .await?
            .into_iter()
            .map(|(id, name, views, posts)| RawRow {
                key: DimensionKey::Id(id),
                label: name,
                slug: None,
                views,
                posts,
            })
            .collect();

        Ok(rows)
    }

    async fn term_rows(
        &self,
        taxonomy: &str,
        limit: u32,
        offset: u64,
    ) -> SourceResult<Vec<RawRow>> {
        let sql = format!(
            r#"
            SELECT t.term_id, t.name, t.slug,
                CAST(SUM(k.pageviews) AS INTEGER) AS views,
                COUNT(DISTINCT p.ID) AS posts
            FROM {posts} AS p
            JOIN {stats} AS k ON k.id = p.ID
            JOIN {rel} AS tr ON tr.object_id = p.ID
            JOIN {tax} AS tt ON tt.term_taxonomy_id = tr.term_taxonomy_id
            JOIN {terms} AS t ON t.term_id = tt.term_id
            WHERE tt.taxonomy = ?
            GROUP BY t.term_id, t.name, t.slug
            ORDER BY views DESC
            LIMIT ? OFFSET ?
            "#,
            posts = self.tables.posts(),
            stats = self.tables.post_stats(),
            rel = self.tables.term_relationships(),
            tax = self.tables.term_taxonomy(),
            terms = self.tables.terms(),
        );

        let rows = sqlx::query_as::<_, (i64, String, String, i64, i64)>(&sql)
            .bind(taxonomy)
            .bind(i64::from(limit))
            .bind(offset as i64)
            .fetch_all(self.pool.as_ref())
            .await?
            .into_iter()
            .map(|(term_id, name, slug, views, posts)| RawRow {
                key: DimensionKey::Id(term_id),
                label: name,
                slug: Some(slug),
                views,
                posts,
            })
            .collect();

        Ok(rows)
    }

    async fn year_rows(&self) -> SourceResult<Vec<RawRow>> {
        let sql = format!(
            r#"
            SELECT CAST(strftime('%Y', p.post_date) AS INTEGER) AS years,
                CAST(SUM(k.pageviews) AS INTEGER) AS views,
                COUNT(DISTINCT p.ID) AS posts
            FROM {posts} AS p
            JOIN {stats} AS k ON k.id = p.ID
            GROUP BY years
            ORDER BY views DESC
            "#,
            posts = self.tables.posts(),
            stats = self.tables.post_stats(),
        );

        let rows = sqlx::query_as::<_, (i64, i64, i64)>(&sql)
            .fetch_all(self.pool.as_ref())
            .await?
            .into_iter()
            .map(|(year, views, posts)| RawRow {
                key: DimensionKey::Id(year),
                label: year.to_string(),
                slug: None,
                views,
                posts,
            })
            .collect();

        Ok(rows)
    }

    async fn post_type_rows(&self) -> SourceResult<Vec<RawRow>> {
        let sql = format!(
            r#"
            SELECT p.post_type,
                CAST(SUM(k.pageviews) AS INTEGER) AS views,
                COUNT(DISTINCT p.ID) AS posts
            FROM {posts} AS p
            JOIN {stats} AS k ON k.id = p.ID
            GROUP BY p.post_type
            ORDER BY views DESC
            "#,
            posts = self.tables.posts(),
            stats = self.tables.post_stats(),
        );

        let rows = sqlx::query_as::<_, (String, i64, i64)>(&sql)
            .fetch_all(self.pool.as_ref())
            .await?
            .into_iter()
            .map(|(post_type, views, posts)| RawRow {
                key: DimensionKey::Name(post_type.clone()),
                label: post_type,
                slug: None,
                views,
                posts,
            })
            .collect();

        Ok(rows)
    }

    async fn zero_hits(
        &self,
        post_types: &[String],
        order: ZeroHitOrder,
        limit: u32,
        offset: u64,
    ) -> SourceResult<Vec<ZeroHitItem>> {
        if post_types.is_empty() {
            return Ok(vec![]);
        }

        let mut query = QueryBuilder::<Sqlite>::new(format!(
            "SELECT p.ID, p.post_title, p.post_date FROM {} AS p WHERE p.post_status = ",
            self.tables.posts()
        ));
        query.push_bind("publish");
        query.push(" AND p.post_type IN (");
        let mut types = query.separated(", ");
        for post_type in post_types {
            types.push_bind(post_type.as_str());
        }
        types.push_unseparated(")");
        query.push(format!(
            " AND NOT EXISTS (SELECT 1 FROM {} AS k WHERE k.id = p.ID) ORDER BY {} LIMIT ",
            self.tables.post_stats(),
            zero_hit_order_sql(order)
        ));
        query.push_bind(i64::from(limit));
        query.push(" OFFSET ");
        query.push_bind(offset as i64);

        let items = query
            .build_query_as::<(i64, String, NaiveDateTime)>()
            .fetch_all(self.pool.as_ref())
            .await?
            .into_iter()
            .map(|(id, title, published_at)| ZeroHitItem {
                id,
                title,
                published_at,
            })
            .collect();

        Ok(items)
    }

    async fn taxonomies(&self) -> SourceResult<Vec<String>> {
        let sql = format!(
            "SELECT DISTINCT taxonomy FROM {} ORDER BY taxonomy",
            self.tables.term_taxonomy()
        );

        let names = sqlx::query_scalar::<_, String>(&sql)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(names)
    }
}
