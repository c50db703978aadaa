use anyhow::Context;

use crate::Db;

const LEDGER_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS _libris_migrations (
        module     TEXT NOT NULL,
        id         TEXT NOT NULL,
        applied_at TEXT NOT NULL,
        PRIMARY KEY (module, id)
    )
"#;

/// Migration definition contributed by a module.
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// Apply every migration not yet recorded in the ledger, in the given order.
///
/// Each migration runs in its own transaction together with its ledger row.
/// Returns how many migrations were applied.
pub async fn migrate(db: &Db, migrations: &[(String, Migration)]) -> anyhow::Result<usize> {
    sqlx::query(LEDGER_DDL)
        .execute(db)
        .await
        .context("failed to create migration ledger")?;

    let mut applied = 0;
    for (module, migration) in migrations {
        let seen: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM _libris_migrations WHERE module = ? AND id = ?")
                .bind(module)
                .bind(migration.id)
                .fetch_one(db)
                .await
                .context("failed to read migration ledger")?;
        if seen > 0 {
            tracing::debug!(target: "libris-db", module = %module, id = migration.id, "migration already applied");
            continue;
        }

        let mut tx = db.begin().await.context("failed to open migration transaction")?;
        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("migration {module}/{} failed", migration.id))?;
        sqlx::query("INSERT INTO _libris_migrations (module, id, applied_at) VALUES (?, ?, ?)")
            .bind(module)
            .bind(migration.id)
            .bind(chrono::Utc::now())
            .execute(&mut *tx)
            .await
            .context("failed to record migration")?;
        tx.commit().await.context("failed to commit migration")?;

        tracing::info!(target: "libris-db", module = %module, id = migration.id, "migration applied");
        applied += 1;
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connect;

    fn shelf_migrations() -> Vec<(String, Migration)> {
        vec![
            (
                "shelves".to_string(),
                Migration {
                    id: "001_init",
                    up: r#"
                        CREATE TABLE shelf (id TEXT PRIMARY KEY);
                        CREATE TABLE slot (
                            id TEXT PRIMARY KEY,
                            shelf TEXT NOT NULL REFERENCES shelf(id)
                        );
                    "#,
                },
            ),
            (
                "shelves".to_string(),
                Migration {
                    id: "002_label",
                    up: "ALTER TABLE shelf ADD COLUMN label TEXT;",
                },
            ),
        ]
    }

    #[tokio::test]
    async fn migrations_apply_once() {
        let db = connect("sqlite::memory:", 1).await.unwrap();
        let migrations = shelf_migrations();

        assert_eq!(migrate(&db, &migrations).await.unwrap(), 2);
        assert_eq!(migrate(&db, &migrations).await.unwrap(), 0);

        let recorded: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _libris_migrations")
            .fetch_one(&db)
            .await
            .unwrap();
        assert_eq!(recorded, 2);
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let db = connect("sqlite::memory:", 1).await.unwrap();
        migrate(&db, &shelf_migrations()).await.unwrap();

        let result = sqlx::query("INSERT INTO slot (id, shelf) VALUES ('s1', 'missing')")
            .execute(&db)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn failed_migration_is_not_recorded() {
        let db = connect("sqlite::memory:", 1).await.unwrap();
        let broken = vec![(
            "broken".to_string(),
            Migration {
                id: "001_bad",
                up: "CREATE TABLE ok (id TEXT); THIS IS NOT SQL;",
            },
        )];

        assert!(migrate(&db, &broken).await.is_err());
        let recorded: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _libris_migrations")
            .fetch_one(&db)
            .await
            .unwrap();
        assert_eq!(recorded, 0);
    }
}
