use anyhow::{Context, Result};
use chrono::NaiveDate;
use loterias_db::rusqlite::Connection;
use std::path::Path;

use loterias_db::db::insert_draw;
use loterias_db::models::{validate_draw, Draw, Game};

use crate::participants::parse_decimal;

/// `dd/mm/aaaa` → `aaaa-mm-dd`.
pub fn parse_date(raw: &str) -> Result<String> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%d/%m/%Y")
        .with_context(|| format!("Data inválida: '{}'", raw))?;
    Ok(date.format("%Y-%m-%d").to_string())
}

pub fn parse_numbers(raw: &str) -> Result<Vec<u8>> {
    raw.split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u8>()
                .with_context(|| format!("Dezena inválida: '{}'", s))
        })
        .collect()
}

fn parse_record(game: Game, record: &csv::StringRecord) -> Result<Draw> {
    let get = |idx: usize| -> String {
        record.get(idx).map(|s| s.trim().to_string()).unwrap_or_default()
    };

    let contest_str = get(0);
    let contest: u32 = contest_str
        .parse()
        .with_context(|| format!("Concurso inválido: '{}'", contest_str))?;
    let date = parse_date(&get(1))?;
    let numbers = parse_numbers(&get(2))?;
    let second_numbers = parse_numbers(&get(3))?;

    validate_draw(game, &numbers, &second_numbers)
        .with_context(|| format!("Concurso {}", contest))?;

    let winner_count: i32 = get(4).parse().unwrap_or(0);
    let winner_prize = parse_decimal(&get(5)).unwrap_or(0.0);

    Ok(Draw {
        game,
        contest,
        date,
        numbers,
        second_numbers,
        winner_count,
        winner_prize,
    })
}

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

/// Importa um CSV `concurso;data;dezenas;dezenas2;ganhadores;premio`.
pub fn import_csv(conn: &Connection, game: Game, path: &Path) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Não foi possível abrir {:?}", path))?;

    let tx = conn.unchecked_transaction()
        .context("Não foi possível iniciar a transação")?;

    let mut result = ImportResult {
        total_records: 0,
        inserted: 0,
        skipped: 0,
        errors: 0,
    };

    for record_result in reader.records() {
        result.total_records += 1;
        match record_result {
            Ok(record) => {
                match parse_record(game, &record) {
                    Ok(draw) => {
                        match insert_draw(&tx, &draw) {
                            Ok(true) => result.inserted += 1,
                            Ok(false) => result.skipped += 1,
                            Err(e) => {
                                log::warn!("Erro ao inserir linha {}: {:#}", result.total_records, e);
                                result.errors += 1;
                            }
                        }
                    }
                    Err(e) => {
                        log::warn!("Linha {} ignorada: {:#}", result.total_records, e);
                        result.errors += 1;
                    }
                }
            }
            Err(e) => {
                log::warn!("Erro de leitura na linha {}: {}", result.total_records, e);
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Falha no commit")?;
    log::info!(
        "{}: {} concursos inseridos, {} repetidos, {} erros",
        game,
        result.inserted,
        result.skipped,
        result.errors
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use loterias_db::db::{count_draws, fetch_last_draws, migrate};

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("17/02/2026").unwrap(), "2026-02-17");
        assert_eq!(parse_date(" 01/01/2020 ").unwrap(), "2020-01-01");
        assert!(parse_date("2020-01-01").is_err());
        assert!(parse_date("31/02/2020").is_err());
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_numbers("04 15-23,33").unwrap(), vec![4, 15, 23, 33]);
        assert!(parse_numbers("").unwrap().is_empty());
        assert!(parse_numbers("300").is_err());
    }

    #[test]
    fn test_import_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("megasena.csv");
        std::fs::write(
            &path,
            "concurso;data;dezenas;dezenas2;ganhadores;premio\n\
             2700;02/03/2024;04 15 23 33 41 58;;1;118.000.000,50\n\
             2701;06/03/2024;01 02 03 04 05 06;;0;0\n\
             2701;06/03/2024;01 02 03 04 05 06;;0;0\n\
             2702;09/03/2024;01 02 03 04 05;;0;0\n",
        )
        .unwrap();

        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        let result = import_csv(&conn, Game::MegaSena, &path).unwrap();

        assert_eq!(result.total_records, 4);
        assert_eq!(result.inserted, 2);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.errors, 1);
        assert_eq!(count_draws(&conn, Game::MegaSena).unwrap(), 2);

        let draws = fetch_last_draws(&conn, Game::MegaSena, 10).unwrap();
        assert_eq!(draws[1].contest, 2700);
        assert_eq!(draws[1].winner_count, 1);
        assert!((draws[1].winner_prize - 118_000_000.5).abs() < 1e-6);
    }

    #[test]
    fn test_import_dupla_sena() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("duplasena.csv");
        std::fs::write(
            &path,
            "concurso;data;dezenas;dezenas2;ganhadores;premio\n\
             2650;04/05/2024;01 02 03 04 05 06;10 20 30 40 45 50;0;0\n",
        )
        .unwrap();

        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        let result = import_csv(&conn, Game::DuplaSena, &path).unwrap();
        assert_eq!(result.inserted, 1);

        let draws = fetch_last_draws(&conn, Game::DuplaSena, 1).unwrap();
        assert_eq!(draws[0].second_numbers, vec![10, 20, 30, 40, 45, 50]);
    }
}
