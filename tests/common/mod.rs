//! Shared fixture: a small WordPress site with Koko Analytics pageview stats
//!
//! Seeded content (ids in brackets):
//! - Alice [1]: "Alpha" [10] post 2020, 100 views; "Beta" [11] post 2021, 30 views;
//!   "Contact" [14] page 2022, no views; "image" [16] attachment 2020, no views
//! - Bob [2]: "About" [12] page 2021, 20 views; "Gamma" [13] post 2019, no views;
//!   "Draft" [15] draft post 2022, no views
//! - category News [1]: Alpha. post_tag Rust [2]: Alpha, Beta. post_tag Web [3]: Beta, About

#![allow(dead_code)]

use std::sync::Arc;
use tally::source::SqliteSource;

pub const PREFIX: &str = "wp_";

/// Portable DDL for both SQLite and Postgres
pub fn schema_sql(prefix: &str) -> Vec<String> {
    vec![
        format!(
            "CREATE TABLE {prefix}posts (
                ID BIGINT PRIMARY KEY,
                post_author BIGINT NOT NULL,
                post_date TIMESTAMP NOT NULL,
                post_title TEXT NOT NULL,
                post_status TEXT NOT NULL,
                post_type TEXT NOT NULL
            )"
        ),
        format!("CREATE TABLE {prefix}users (ID BIGINT PRIMARY KEY, display_name TEXT NOT NULL)"),
        format!(
            "CREATE TABLE {prefix}terms (
                term_id BIGINT PRIMARY KEY,
                name TEXT NOT NULL,
                slug TEXT NOT NULL
            )"
        ),
        format!(
            "CREATE TABLE {prefix}term_taxonomy (
                term_taxonomy_id BIGINT PRIMARY KEY,
                term_id BIGINT NOT NULL,
                taxonomy TEXT NOT NULL
            )"
        ),
        format!(
            "CREATE TABLE {prefix}term_relationships (
                object_id BIGINT NOT NULL,
                term_taxonomy_id BIGINT NOT NULL
            )"
        ),
    ]
}

pub fn stats_table_sql(prefix: &str) -> String {
    format!(
        "CREATE TABLE {prefix}koko_analytics_post_stats (
            id BIGINT NOT NULL,
            date TEXT NOT NULL,
            visitors BIGINT NOT NULL,
            pageviews BIGINT NOT NULL
        )"
    )
}

pub fn post_sql(
    prefix: &str,
    id: i64,
    author: i64,
    date: &str,
    title: &str,
    status: &str,
    post_type: &str,
) -> String {
    format!(
        "INSERT INTO {prefix}posts (ID, post_author, post_date, post_title, post_status, post_type)
         VALUES ({id}, {author}, '{date} 00:00:00', '{title}', '{status}', '{post_type}')"
    )
}

pub fn views_sql(prefix: &str, post_id: i64, date: &str, views: i64) -> String {
    format!(
        "INSERT INTO {prefix}koko_analytics_post_stats (id, date, visitors, pageviews)
         VALUES ({post_id}, '{date}', {views}, {views})"
    )
}

pub fn term_sql(prefix: &str, term_id: i64, name: &str, slug: &str, taxonomy: &str) -> Vec<String> {
    vec![
        format!(
            "INSERT INTO {prefix}terms (term_id, name, slug)
             VALUES ({term_id}, '{name}', '{slug}')"
        ),
        format!(
            "INSERT INTO {prefix}term_taxonomy (term_taxonomy_id, term_id, taxonomy)
             VALUES ({term_id}, {term_id}, '{taxonomy}')"
        ),
    ]
}

pub fn tag_sql(prefix: &str, post_id: i64, term_id: i64) -> String {
    format!(
        "INSERT INTO {prefix}term_relationships (object_id, term_taxonomy_id)
         VALUES ({post_id}, {term_id})"
    )
}

/// The site described in the module docs
pub fn site_sql(prefix: &str) -> Vec<String> {
    let mut sql = vec![
        format!("INSERT INTO {prefix}users (ID, display_name) VALUES (1, 'Alice'), (2, 'Bob')"),
        post_sql(prefix, 10, 1, "2020-05-01", "Alpha", "publish", "post"),
        post_sql(prefix, 11, 1, "2021-02-03", "Beta", "publish", "post"),
        post_sql(prefix, 12, 2, "2021-07-09", "About", "publish", "page"),
        post_sql(prefix, 13, 2, "2019-01-01", "Gamma", "publish", "post"),
        post_sql(prefix, 14, 1, "2022-03-03", "Contact", "publish", "page"),
        post_sql(prefix, 15, 2, "2022-06-06", "Draft", "draft", "post"),
        post_sql(prefix, 16, 1, "2020-08-08", "image", "publish", "attachment"),
        views_sql(prefix, 10, "2024-01-01", 60),
        views_sql(prefix, 10, "2024-01-02", 40),
        views_sql(prefix, 11, "2024-01-01", 30),
        views_sql(prefix, 12, "2024-01-01", 20),
        tag_sql(prefix, 10, 1),
        tag_sql(prefix, 10, 2),
        tag_sql(prefix, 11, 2),
        tag_sql(prefix, 11, 3),
        tag_sql(prefix, 12, 3),
    ];
    sql.extend(term_sql(prefix, 1, "News", "news", "category"));
    sql.extend(term_sql(prefix, 2, "Rust", "rust", "post_tag"));
    sql.extend(term_sql(prefix, 3, "Web", "web", "post_tag"));
    sql
}

/// `count` tags, each on its own post, with strictly decreasing views
pub fn many_tags_sql(prefix: &str, count: i64) -> Vec<String> {
    let mut sql = vec![format!("INSERT INTO {prefix}users (ID, display_name) VALUES (1, 'Alice')")];
    for i in 0..count {
        let post_id = 100 + i;
        let term_id = 100 + i;
        sql.push(post_sql(
            prefix,
            post_id,
            1,
            "2023-01-01",
            &format!("Post {i}"),
            "publish",
            "post",
        ));
        sql.push(views_sql(prefix, post_id, "2024-01-01", 1000 - i));
        sql.extend(term_sql(prefix, term_id, &format!("Tag {i}"), &format!("tag-{i}"), "post_tag"));
        sql.push(tag_sql(prefix, post_id, term_id));
    }
    sql
}

pub async fn execute_all(source: &SqliteSource, statements: &[String]) {
    for statement in statements {
        sqlx::query(statement).execute(source.pool()).await.unwrap();
    }
}

/// In-memory store with the schema but without the Koko Analytics table
pub async fn create_uninstalled_source() -> Arc<SqliteSource> {
    let source = SqliteSource::new("sqlite::memory:", 5, PREFIX).await.unwrap();
    execute_all(&source, &schema_sql(PREFIX)).await;
    Arc::new(source)
}

/// In-memory store with schema and the stats table, but no rows
pub async fn create_empty_source() -> Arc<SqliteSource> {
    let source = create_uninstalled_source().await;
    execute_all(&source, &[stats_table_sql(PREFIX)]).await;
    source
}

/// In-memory store seeded with the site in the module docs
pub async fn create_site_source() -> Arc<SqliteSource> {
    let source = create_empty_source().await;
    execute_all(&source, &site_sql(PREFIX)).await;
    source
}

/// In-memory store with `count` distinct tags
pub async fn create_tagged_source(count: i64) -> Arc<SqliteSource> {
    let source = create_empty_source().await;
    execute_all(&source, &many_tags_sql(PREFIX, count)).await;
    source
}
