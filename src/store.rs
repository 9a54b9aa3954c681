//! Post persistence on top of an sqlx SQLite pool.
//!
//! Every statement here is a fixed string with bound parameters. Callers pick
//! columns and orderings through [`PostField`] and [`PostOrder`], never by name.

use std::str::FromStr;

use serde::Deserialize;
use sqlx::{sqlite::SqlitePoolOptions, FromRow, SqlitePool};
use time::OffsetDateTime;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("post not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Post {
    pub id: i64,
    pub npub: Option<String>,
    pub title: String,
    pub body: String,
    pub relaylist: String,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

impl Post {
    /// What to show for the post in lists: the title, else the first body line.
    pub fn label(&self) -> String {
        if !self.title.trim().is_empty() {
            return self.title.clone();
        }

        let first_line = self.body.lines().map(str::trim).find(|l| !l.is_empty());
        match first_line {
            Some(line) if line.chars().count() > 60 => {
                let mut short: String = line.chars().take(60).collect();
                short.push('…');
                short
            }
            Some(line) => line.to_owned(),
            None => format!("Post #{}", self.id),
        }
    }

    pub fn is_owned_by(&self, npub: &str) -> bool {
        self.npub.as_deref() == Some(npub)
    }
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub npub: Option<String>,
    pub title: String,
    pub body: String,
    pub relaylist: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostOrder {
    #[default]
    Newest,
    Title,
}

/// Columns that may change after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostField {
    Title,
    Body,
}

impl PostField {
    fn update_sql(self) -> &'static str {
        match self {
            PostField::Title => "UPDATE posts SET title=?, updated_at=? WHERE id=?",
            PostField::Body => "UPDATE posts SET body=?, updated_at=? WHERE id=?",
        }
    }
}

impl FromStr for PostField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(PostField::Title),
            "body" => Ok(PostField::Body),
            other => Err(format!("unknown field {other}")),
        }
    }
}

const POST_COLUMNS: &str = "id,npub,title,body,relaylist,created_at,updated_at";

#[derive(Clone)]
pub struct Store {
    db_pool: SqlitePool,
}

impl Store {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }

    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let db_pool = SqlitePoolOptions::new()
            .max_connections(16)
            .connect(database_url)
            .await?;
        Ok(Self::new(db_pool))
    }

    /// A private in-memory database, kept on a single connection that never
    /// expires so every query sees the same data.
    pub async fn connect_in_memory() -> StoreResult<Self> {
        let db_pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        let store = Self::new(db_pool);
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.db_pool).await?;
        Ok(())
    }

    pub async fn insert_post(&self, post: &NewPost) -> StoreResult<i64> {
        let result = sqlx::query(
            "INSERT INTO posts (npub,title,body,relaylist,created_at) VALUES (?,?,?,?,?)",
        )
        .bind(&post.npub)
        .bind(&post.title)
        .bind(&post.body)
        .bind(&post.relaylist)
        .bind(post.created_at)
        .execute(&self.db_pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn get_all_posts(
        &self,
        owner: Option<&str>,
        order: PostOrder,
    ) -> StoreResult<Vec<Post>> {
        let sql = match (owner.is_some(), order) {
            (true, PostOrder::Newest) => select_posts(
                "WHERE npub=? ORDER BY julianday(created_at) DESC, id DESC",
            ),
            (true, PostOrder::Title) => select_posts("WHERE npub=? ORDER BY title ASC, id ASC"),
            (false, PostOrder::Newest) => {
                select_posts("ORDER BY julianday(created_at) DESC, id DESC")
            }
            (false, PostOrder::Title) => select_posts("ORDER BY title ASC, id ASC"),
        };

        let mut query = sqlx::query_as::<_, Post>(&sql);
        if let Some(owner) = owner {
            query = query.bind(owner);
        }
        Ok(query.fetch_all(&self.db_pool).await?)
    }

    pub async fn get_one_post(&self, id: i64) -> StoreResult<Post> {
        sqlx::query_as::<_, Post>(&select_posts("WHERE id=?"))
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    pub async fn update_post(&self, id: i64, field: PostField, value: &str) -> StoreResult<()> {
        let result = sqlx::query(field.update_sql())
            .bind(value)
            .bind(OffsetDateTime::now_utc())
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

// `tail` is always one of the literals above.
fn select_posts(tail: &'static str) -> String {
    format!("SELECT {POST_COLUMNS} FROM posts {tail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn new_post(npub: Option<&str>, title: &str, body: &str, created_at: OffsetDateTime) -> NewPost {
        NewPost {
            npub: npub.map(str::to_owned),
            title: title.to_owned(),
            body: body.to_owned(),
            relaylist: "wss://relay.one\nwss://relay.two".to_owned(),
            created_at,
        }
    }

    #[tokio::test]
    async fn insert_then_get_one_returns_same_fields() {
        let store = Store::connect_in_memory().await.unwrap();
        let created_at = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        let post = new_post(Some("npub1alice"), "first", "hello *world*", created_at);

        let id = store.insert_post(&post).await.unwrap();
        let stored = store.get_one_post(id).await.unwrap();

        assert_eq!(stored.id, id);
        assert_eq!(stored.npub.as_deref(), Some("npub1alice"));
        assert_eq!(stored.title, "first");
        assert_eq!(stored.body, "hello *world*");
        assert_eq!(stored.relaylist, "wss://relay.one\nwss://relay.two");
        assert_eq!(stored.created_at, created_at);
        assert_eq!(stored.updated_at, None);
    }

    #[tokio::test]
    async fn get_one_missing_is_not_found() {
        let store = Store::connect_in_memory().await.unwrap();
        assert!(matches!(store.get_one_post(42).await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn newest_first_ordering() {
        let store = Store::connect_in_memory().await.unwrap();
        let base = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();

        let old = store.insert_post(&new_post(Some("npub1a"), "b", "old", base)).await.unwrap();
        let new = store
            .insert_post(&new_post(Some("npub1a"), "a", "new", base + Duration::hours(1)))
            .await
            .unwrap();
        let mid = store
            .insert_post(&new_post(Some("npub1a"), "c", "mid", base + Duration::minutes(30)))
            .await
            .unwrap();

        let ids: Vec<i64> = store
            .get_all_posts(None, PostOrder::Newest)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![new, mid, old]);
    }

    #[tokio::test]
    async fn newest_first_within_the_same_second() {
        // Timestamps are stored as RFC 3339 text with a variable-length fraction,
        // so "…:10Z", "…:10.1Z" and "…:10.12Z" must not be compared as strings.
        let store = Store::connect_in_memory().await.unwrap();
        let base = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        let at = [
            ("newer2", base + Duration::milliseconds(10_120)),
            ("older", base),
            ("older2", base + Duration::milliseconds(10_100)),
            ("newer", base + Duration::milliseconds(500)),
            ("whole", base + Duration::seconds(10)),
        ];
        for (body, created_at) in at {
            store.insert_post(&new_post(Some("n"), "", body, created_at)).await.unwrap();
        }

        let bodies: Vec<String> = store
            .get_all_posts(Some("n"), PostOrder::Newest)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.body)
            .collect();
        assert_eq!(bodies, vec!["newer2", "older2", "whole", "newer", "older"]);
    }

    #[tokio::test]
    async fn title_ordering() {
        let store = Store::connect_in_memory().await.unwrap();
        let now = OffsetDateTime::now_utc();
        for title in ["pear", "apple", "mango"] {
            store.insert_post(&new_post(None, title, "body", now)).await.unwrap();
        }

        let titles: Vec<String> = store
            .get_all_posts(None, PostOrder::Title)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["apple", "mango", "pear"]);
    }

    #[tokio::test]
    async fn owner_filter() {
        let store = Store::connect_in_memory().await.unwrap();
        let now = OffsetDateTime::now_utc();
        store.insert_post(&new_post(Some("npub1alice"), "", "a", now)).await.unwrap();
        store.insert_post(&new_post(Some("npub1bob"), "", "b", now)).await.unwrap();
        store.insert_post(&new_post(Some("npub1alice"), "", "c", now)).await.unwrap();

        let alice = store.get_all_posts(Some("npub1alice"), PostOrder::Newest).await.unwrap();
        assert_eq!(alice.len(), 2);
        assert!(alice.iter().all(|p| p.is_owned_by("npub1alice")));

        let nobody = store.get_all_posts(Some("npub1carol"), PostOrder::Title).await.unwrap();
        assert!(nobody.is_empty());
    }

    #[tokio::test]
    async fn update_sets_field_and_updated_at() {
        let store = Store::connect_in_memory().await.unwrap();
        let id = store
            .insert_post(&new_post(None, "draft", "before", OffsetDateTime::now_utc()))
            .await
            .unwrap();

        store.update_post(id, PostField::Body, "after").await.unwrap();
        let post = store.get_one_post(id).await.unwrap();
        assert_eq!(post.body, "after");
        assert_eq!(post.title, "draft");
        assert!(post.updated_at.is_some());
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let store = Store::connect_in_memory().await.unwrap();
        let result = store.update_post(7, PostField::Title, "x").await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[test]
    fn field_names_are_a_closed_set() {
        assert_eq!("title".parse::<PostField>(), Ok(PostField::Title));
        assert_eq!("body".parse::<PostField>(), Ok(PostField::Body));
        assert!("npub".parse::<PostField>().is_err());
        assert!("body=1; DROP TABLE posts".parse::<PostField>().is_err());
    }

    #[test]
    fn label_falls_back_to_first_line() {
        let post = Post {
            id: 3,
            npub: None,
            title: String::new(),
            body: "\n  first line  \nsecond".to_owned(),
            relaylist: String::new(),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: None,
        };
        assert_eq!(post.label(), "first line");

        let empty = Post { body: String::new(), ..post };
        assert_eq!(empty.label(), "Post #3");
    }
}
