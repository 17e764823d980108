use crate::infra::db;
use anyhow::{bail, Context, Result};
use sqlx::{query, query_as};

use super::domain::{Todo, TodoId};

#[derive(Clone)]
pub(crate) struct Repository {
    db: db::Db,
}

#[derive(sqlx::FromRow)]
struct TodoEntity {
    id: i64,
    description: String,
    done: bool,
}

impl From<TodoEntity> for Todo {
    fn from(value: TodoEntity) -> Self {
        Self {
            id: value.id.into(),
            description: value.description,
            done: value.done,
        }
    }
}

impl Repository {
    pub(crate) fn new(db: &db::Db) -> Self {
        Self { db: db.clone() }
    }

    pub(crate) async fn list(&self) -> Result<Vec<Todo>> {
        let mut conn = self.db.get_connection().await?;

        let todos = query_as::<_, TodoEntity>(
            r#"
                SELECT id, description, done FROM todos ORDER BY id
            "#,
        )
        .fetch_all(&mut *conn)
        .await
        .context("listing todos")?;

        Ok(todos.into_iter().map(Todo::from).collect())
    }

    pub(crate) async fn create(&self, description: &str, done: bool) -> Result<Todo> {
        let mut conn = self.db.get_connection().await?;

        let todo = query_as::<_, TodoEntity>(
            r#"
                INSERT INTO todos ( description, done )
                VALUES ( ?1, ?2 )
                RETURNING id, description, done
            "#,
        )
        .bind(description)
        .bind(done)
        .fetch_one(&mut *conn)
        .await
        .context("inserting todo")?;

        Ok(todo.into())
    }

    /// Fails if no todo has `id`.
    pub(crate) async fn update(&self, id: TodoId, description: &str, done: bool) -> Result<Todo> {
        let mut conn = self.db.get_connection().await?;

        let todo = query_as::<_, TodoEntity>(
            r#"
                UPDATE todos SET description = ?1, done = ?2
                WHERE id = ?3
                RETURNING id, description, done
            "#,
        )
        .bind(description)
        .bind(done)
        .bind(i64::from(id))
        .fetch_one(&mut *conn)
        .await
        .with_context(|| format!("updating todo {id}"))?;

        Ok(todo.into())
    }

    /// Fails if no todo has `id`.
    pub(crate) async fn delete(&self, id: TodoId) -> Result<()> {
        let mut conn = self.db.get_connection().await?;

        let result = query(
            r#"
                DELETE FROM todos WHERE id = ?1
            "#,
        )
        .bind(i64::from(id))
        .execute(&mut *conn)
        .await
        .with_context(|| format!("deleting todo {id}"))?;

        if result.rows_affected() == 0 {
            bail!("no todo with id {id}");
        }

        Ok(())
    }
}
