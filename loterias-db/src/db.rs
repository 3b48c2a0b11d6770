use anyhow::{Context, Result};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row};
use std::num::ParseIntError;
use std::path::Path;

use crate::models::{Draw, Game};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    game           TEXT NOT NULL,
    contest        INTEGER NOT NULL,
    date           TEXT NOT NULL,
    numbers        TEXT NOT NULL,
    second_numbers TEXT NOT NULL DEFAULT '',
    winner_count   INTEGER NOT NULL DEFAULT 0,
    winner_prize   REAL NOT NULL DEFAULT 0.0,
    PRIMARY KEY (game, contest)
);
";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("loterias.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Não foi possível criar o diretório {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Não foi possível abrir a base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Falha na migração")?;
    Ok(())
}

fn numbers_to_text(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:02}", n))
        .collect::<Vec<_>>()
        .join(" ")
}

fn numbers_from_text(text: &str) -> Result<Vec<u8>, ParseIntError> {
    text.split_whitespace().map(|s| s.parse::<u8>()).collect()
}

fn numbers_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Vec<u8>> {
    let text: String = row.get(idx)?;
    numbers_from_text(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (game, contest, date, numbers, second_numbers, winner_count, winner_prize)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            draw.game.slug(),
            draw.contest,
            draw.date,
            numbers_to_text(&draw.numbers),
            numbers_to_text(&draw.second_numbers),
            draw.winner_count,
            draw.winner_prize,
        ],
    ).context("Falha na inserção")?;
    Ok(changed > 0)
}

pub fn fetch_last_draws(conn: &Connection, game: Game, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(
        "SELECT contest, date, numbers, second_numbers, winner_count, winner_prize
         FROM draws WHERE game = ?1 ORDER BY date DESC, contest DESC LIMIT ?2"
    )?;
    let draws = stmt.query_map(rusqlite::params![game.slug(), limit], |row| {
        Ok(Draw {
            game,
            contest: row.get(0)?,
            date: row.get(1)?,
            numbers: numbers_column(row, 2)?,
            second_numbers: numbers_column(row, 3)?,
            winner_count: row.get(4)?,
            winner_prize: row.get(5)?,
        })
    })?.collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

pub fn fetch_draw(conn: &Connection, game: Game, contest: u32) -> Result<Option<Draw>> {
    let draw = conn.query_row(
        "SELECT contest, date, numbers, second_numbers, winner_count, winner_prize
         FROM draws WHERE game = ?1 AND contest = ?2",
        rusqlite::params![game.slug(), contest],
        |row| {
            Ok(Draw {
                game,
                contest: row.get(0)?,
                date: row.get(1)?,
                numbers: numbers_column(row, 2)?,
                second_numbers: numbers_column(row, 3)?,
                winner_count: row.get(4)?,
                winner_prize: row.get(5)?,
            })
        },
    ).optional()?;
    Ok(draw)
}

/// Dezenas dos últimos concursos, do mais recente ao mais antigo.
/// Os dois sorteios da Dupla Sena são concatenados.
pub fn fetch_last_draws_numbers(conn: &Connection, game: Game, limit: u32) -> Result<Vec<Vec<u8>>> {
    let mut stmt = conn.prepare(
        "SELECT numbers, second_numbers
         FROM draws WHERE game = ?1 ORDER BY date DESC, contest DESC LIMIT ?2"
    )?;
    let rows = stmt.query_map(rusqlite::params![game.slug(), limit], |row| {
        let mut numbers = numbers_column(row, 0)?;
        numbers.extend(numbers_column(row, 1)?);
        Ok(numbers)
    })?.collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn count_draws(conn: &Connection, game: Game) -> Result<u32> {
    let count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM draws WHERE game = ?1",
        [game.slug()],
        |row| row.get(0),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_draw(game: Game, contest: u32, date: &str) -> Draw {
        Draw {
            game,
            contest,
            date: date.to_string(),
            numbers: vec![4, 15, 23, 33, 41, 58],
            second_numbers: Vec::new(),
            winner_count: 0,
            winner_prize: 0.0,
        }
    }

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn
    }

    #[test]
    fn test_insert_and_count() {
        let conn = memory_db();
        assert_eq!(count_draws(&conn, Game::MegaSena).unwrap(), 0);

        insert_draw(&conn, &test_draw(Game::MegaSena, 2700, "2024-03-02")).unwrap();
        assert_eq!(count_draws(&conn, Game::MegaSena).unwrap(), 1);
        assert_eq!(count_draws(&conn, Game::Quina).unwrap(), 0);
    }

    #[test]
    fn test_duplicate_ignored() {
        let conn = memory_db();

        let inserted = insert_draw(&conn, &test_draw(Game::MegaSena, 2700, "2024-03-02")).unwrap();
        assert!(inserted);
        let inserted = insert_draw(&conn, &test_draw(Game::MegaSena, 2700, "2024-03-02")).unwrap();
        assert!(!inserted);
        assert_eq!(count_draws(&conn, Game::MegaSena).unwrap(), 1);
    }

    #[test]
    fn test_same_contest_other_game() {
        let conn = memory_db();
        insert_draw(&conn, &test_draw(Game::MegaSena, 10, "2024-03-02")).unwrap();
        let mut dupla = test_draw(Game::DuplaSena, 10, "2024-03-02");
        dupla.second_numbers = vec![1, 2, 3, 4, 5, 6];
        assert!(insert_draw(&conn, &dupla).unwrap());
    }

    #[test]
    fn test_fetch_order() {
        let conn = memory_db();

        insert_draw(&conn, &test_draw(Game::MegaSena, 1, "2024-01-01")).unwrap();
        insert_draw(&conn, &test_draw(Game::MegaSena, 3, "2024-01-05")).unwrap();
        insert_draw(&conn, &test_draw(Game::MegaSena, 2, "2024-01-03")).unwrap();

        let draws = fetch_last_draws(&conn, Game::MegaSena, 10).unwrap();
        assert_eq!(draws.len(), 3);
        assert_eq!(draws[0].date, "2024-01-05");
        assert_eq!(draws[1].date, "2024-01-03");
        assert_eq!(draws[2].date, "2024-01-01");
        assert_eq!(draws[0].numbers, vec![4, 15, 23, 33, 41, 58]);
        assert!(draws[0].second_numbers.is_empty());
    }

    #[test]
    fn test_fetch_numbers_concatenates_dupla_sena() {
        let conn = memory_db();
        let mut dupla = test_draw(Game::DuplaSena, 2600, "2024-02-01");
        dupla.numbers = vec![1, 2, 3, 4, 5, 6];
        dupla.second_numbers = vec![10, 20, 30, 40, 45, 50];
        insert_draw(&conn, &dupla).unwrap();

        let rows = fetch_last_draws_numbers(&conn, Game::DuplaSena, 5).unwrap();
        assert_eq!(rows, vec![vec![1, 2, 3, 4, 5, 6, 10, 20, 30, 40, 45, 50]]);
    }

    #[test]
    fn test_fetch_draw_by_contest() {
        let conn = memory_db();
        insert_draw(&conn, &test_draw(Game::Quina, 6400, "2024-04-10")).unwrap();

        let found = fetch_draw(&conn, Game::Quina, 6400).unwrap();
        assert_eq!(found.map(|d| d.contest), Some(6400));
        assert!(fetch_draw(&conn, Game::Quina, 1).unwrap().is_none());
    }

    #[test]
    fn test_numbers_text_roundtrip_keeps_zero() {
        assert_eq!(numbers_to_text(&[0, 7, 99]), "00 07 99");
        assert_eq!(numbers_from_text("00 07 99").unwrap(), vec![0, 7, 99]);
        assert!(numbers_from_text("").unwrap().is_empty());
    }
}
