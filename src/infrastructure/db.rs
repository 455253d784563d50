use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

fn id_column(backend: DatabaseBackend) -> &'static str {
    match backend {
        DatabaseBackend::Postgres => "id BIGSERIAL PRIMARY KEY",
        _ => "id INTEGER PRIMARY KEY AUTOINCREMENT",
    }
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let id = id_column(backend);

    let tables = [
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS registrations (
                {id},
                team_name TEXT NOT NULL,
                leader_name TEXT NOT NULL,
                email TEXT NOT NULL,
                mobile TEXT NOT NULL,
                college TEXT NOT NULL,
                leader_dept TEXT NOT NULL,
                member2_name TEXT NOT NULL,
                member2_email TEXT NOT NULL,
                member2_dept TEXT NOT NULL,
                member3_name TEXT,
                member3_email TEXT,
                member3_dept TEXT,
                project_title TEXT,
                project_description TEXT,
                git_link TEXT,
                notes TEXT,
                status TEXT NOT NULL DEFAULT 'pending',
                created_at TEXT NOT NULL,
                updated_at TEXT
            )
            "#
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS events (
                {id},
                title TEXT NOT NULL,
                description TEXT,
                event_date TEXT NOT NULL,
                event_time TEXT NOT NULL,
                location TEXT,
                event_type TEXT,
                max_capacity INTEGER,
                registered_count INTEGER NOT NULL DEFAULT 0,
                status TEXT NOT NULL DEFAULT 'upcoming',
                created_by BIGINT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS admin_users (
                {id},
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'admin',
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                last_login TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS audit_logs (
                {id},
                action TEXT NOT NULL,
                table_name TEXT NOT NULL,
                record_id BIGINT,
                admin_id BIGINT,
                old_values TEXT,
                new_values TEXT,
                performed_at TEXT NOT NULL
            )
            "#
        ),
    ];

    for sql in tables {
        db.execute(Statement::from_string(backend, sql)).await?;
    }

    // Indexes backing the dashboard filters and audit lookups
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_registrations_created_at ON registrations (created_at)",
        "CREATE INDEX IF NOT EXISTS idx_registrations_leader_dept ON registrations (leader_dept)",
        "CREATE INDEX IF NOT EXISTS idx_events_event_date ON events (event_date)",
        "CREATE INDEX IF NOT EXISTS idx_audit_logs_table_record ON audit_logs (table_name, record_id)",
    ];

    for sql in indexes {
        db.execute(Statement::from_string(backend, sql.to_owned()))
            .await?;
    }

    Ok(())
}
