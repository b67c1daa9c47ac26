use sqlx::postgres::{PgPool, PgPoolOptions};

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Run the full Postgres schema migration inline.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Players (soft-deleted rows keep their games)
CREATE TABLE IF NOT EXISTS players (
    id          BIGSERIAL PRIMARY KEY,
    username    TEXT NOT NULL,
    email       TEXT NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    deleted_at  TIMESTAMPTZ
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_players_live_username
    ON players (LOWER(username)) WHERE deleted_at IS NULL;
CREATE UNIQUE INDEX IF NOT EXISTS idx_players_live_email
    ON players (LOWER(email)) WHERE deleted_at IS NULL;

-- Games
CREATE TABLE IF NOT EXISTS games (
    id               BIGSERIAL PRIMARY KEY,
    white_player_id  BIGINT NOT NULL REFERENCES players(id),
    black_player_id  BIGINT NOT NULL REFERENCES players(id),
    start_time       TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    end_time         TIMESTAMPTZ
);

CREATE INDEX IF NOT EXISTS idx_games_white_player ON games (white_player_id);
CREATE INDEX IF NOT EXISTS idx_games_black_player ON games (black_player_id);

-- Board occupancy: exactly 64 rows per game
CREATE TABLE IF NOT EXISTS board_squares (
    game_id  BIGINT NOT NULL REFERENCES games(id) ON DELETE CASCADE,
    square   TEXT NOT NULL,
    piece    TEXT,
    color    TEXT,
    PRIMARY KEY (game_id, square)
);

-- Move log
CREATE TABLE IF NOT EXISTS game_moves (
    game_id     BIGINT NOT NULL REFERENCES games(id) ON DELETE CASCADE,
    seq         INTEGER NOT NULL,
    notation    TEXT NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    PRIMARY KEY (game_id, seq)
);
"#;
