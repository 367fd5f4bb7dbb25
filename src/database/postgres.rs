use async_trait::async_trait;
use serde_json::Value;
use sqlx::{
    postgres::{PgArguments, PgRow},
    query::Query,
    types::Json,
    PgPool, Postgres, Row,
};
use uuid::Uuid;

use super::document::{Collection, Document, StoredDocument};
use super::manager::{DatabaseError, DatabaseManager};
use super::store::{DeleteResult, DocumentStore, InsertOneResult, Update, UpdateResult};
use crate::filter::{DocFilter, FilterWhere, FindQuery, SqlParam};

/// Document store over Postgres: one JSONB table per collection.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn bind_params<'q>(
    mut q: Query<'q, Postgres, PgArguments>,
    params: &[SqlParam],
) -> Query<'q, Postgres, PgArguments> {
    for p in params {
        q = match p {
            SqlParam::Text(s) => q.bind(s.clone()),
            SqlParam::Json(v) => q.bind(Json(v.clone())),
            SqlParam::Int(i) => q.bind(*i),
        };
    }
    q
}

fn row_to_document(row: &PgRow) -> Result<StoredDocument, DatabaseError> {
    let id: Uuid = row.try_get("id")?;
    let Json(doc): Json<Document> = row.try_get("doc")?;
    Ok(StoredDocument::new(id, doc))
}

/// SELECT statement and its parameters for a find query.
fn find_sql(collection: Collection, query: &FindQuery) -> (String, Vec<SqlParam>) {
    let filter = query.filter.clone().unwrap_or(DocFilter::All);
    let (where_clause, mut params) = FilterWhere::generate(&filter, 0);

    let order = match &query.sort {
        Some(sort) => {
            let (sql, param) = sort.to_sql(params.len() + 1);
            params.push(param);
            sql
        }
        None => "ORDER BY seq ASC".to_string(),
    };

    let mut sql = format!(
        "SELECT id, doc FROM {} WHERE {} {}",
        collection.as_str(),
        where_clause,
        order
    );
    if let Some(limit) = query.limit {
        params.push(SqlParam::Int(limit));
        sql.push_str(&format!(" LIMIT ${}", params.len()));
    }
    (sql, params)
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn insert_one(&self, collection: Collection, doc: Document) -> Result<InsertOneResult, DatabaseError> {
        let id = Uuid::new_v4();
        let sql = format!("INSERT INTO {} (id, doc) VALUES ($1, $2)", collection.as_str());
        sqlx::query(&sql)
            .bind(id)
            .bind(Json(doc))
            .execute(&self.pool)
            .await?;
        Ok(InsertOneResult::new(id))
    }

    async fn insert_if_absent(
        &self,
        collection: Collection,
        key_field: &str,
        key: &Value,
        doc: Document,
    ) -> Result<UpdateResult, DatabaseError> {
        let table = collection.as_str();
        // ON CONFLICT covers the race where a concurrent insert wins the unique index
        let sql = format!(
            "INSERT INTO {table} (id, doc)
             SELECT $1, $2
             WHERE NOT EXISTS (SELECT 1 FROM {table} WHERE doc -> $3 = $4)
             ON CONFLICT DO NOTHING
             RETURNING id"
        );
        let id = Uuid::new_v4();
        let inserted = sqlx::query(&sql)
            .bind(id)
            .bind(Json(doc))
            .bind(key_field)
            .bind(Json(key))
            .fetch_optional(&self.pool)
            .await?;

        Ok(match inserted {
            Some(_) => UpdateResult::upserted(id),
            None => UpdateResult::updated(1, 0),
        })
    }

    async fn find(&self, collection: Collection, query: FindQuery) -> Result<Vec<StoredDocument>, DatabaseError> {
        let (sql, params) = find_sql(collection, &query);
        let rows = bind_params(sqlx::query(&sql), &params)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_document).collect()
    }

    async fn find_by_id(&self, collection: Collection, id: Uuid) -> Result<Option<StoredDocument>, DatabaseError> {
        let sql = format!("SELECT id, doc FROM {} WHERE id = $1", collection.as_str());
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(row_to_document).transpose()
    }

    async fn update_by_id(&self, collection: Collection, id: Uuid, update: Update) -> Result<UpdateResult, DatabaseError> {
        let table = collection.as_str();
        match update {
            Update::Set(fields) => {
                let sql = format!(
                    "WITH target AS (SELECT id FROM {table} WHERE id = $1),
                     changed AS (
                         UPDATE {table} SET doc = doc || $2
                         WHERE id = $1 AND doc <> doc || $2
                         RETURNING id
                     )
                     SELECT (SELECT count(*) FROM target) AS matched,
                            (SELECT count(*) FROM changed) AS modified"
                );
                let row = sqlx::query(&sql)
                    .bind(id)
                    .bind(Json(fields))
                    .fetch_one(&self.pool)
                    .await?;
                let matched: i64 = row.try_get("matched")?;
                let modified: i64 = row.try_get("modified")?;
                Ok(UpdateResult::updated(matched as u64, modified as u64))
            }
            Update::Inc { field, by } => {
                // only numbers and absent/null fields can be incremented
                let sql = format!(
                    "WITH target AS (SELECT id FROM {table} WHERE id = $1),
                     changed AS (
                         UPDATE {table}
                         SET doc = jsonb_set(doc, ARRAY[$2::text], to_jsonb(COALESCE((doc ->> $2)::numeric, 0) + $3))
                         WHERE id = $1 AND COALESCE(jsonb_typeof(doc -> $2), 'null') IN ('number', 'null')
                         RETURNING id
                     )
                     SELECT (SELECT count(*) FROM target) AS matched,
                            (SELECT count(*) FROM changed) AS modified"
                );
                let row = sqlx::query(&sql)
                    .bind(id)
                    .bind(&field)
                    .bind(by)
                    .fetch_one(&self.pool)
                    .await?;
                let matched: i64 = row.try_get("matched")?;
                let modified: i64 = row.try_get("modified")?;
                if matched > modified {
                    return Err(DatabaseError::QueryError(format!(
                        "cannot increment non-numeric field '{}'",
                        field
                    )));
                }
                Ok(UpdateResult::updated(matched as u64, modified as u64))
            }
        }
    }

    async fn delete_by_id(&self, collection: Collection, id: Uuid) -> Result<DeleteResult, DatabaseError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", collection.as_str());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(DeleteResult::new(result.rows_affected()))
    }

    async fn exists(&self, collection: Collection, filter: DocFilter) -> Result<bool, DatabaseError> {
        let (where_clause, params) = FilterWhere::generate(&filter, 0);
        let sql = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE {}) AS found",
            collection.as_str(),
            where_clause
        );
        let row = bind_params(sqlx::query(&sql), &params)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("found")?)
    }
}
