use std::ops::RangeInclusive;
use std::str::FromStr;

use anyhow::{bail, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Game {
    MegaSena,
    Lotofacil,
    Quina,
    Lotomania,
    DuplaSena,
}

impl Game {
    pub const ALL: [Game; 5] = [
        Game::MegaSena,
        Game::Lotofacil,
        Game::Quina,
        Game::Lotomania,
        Game::DuplaSena,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Game::MegaSena => "Mega-Sena",
            Game::Lotofacil => "Lotofácil",
            Game::Quina => "Quina",
            Game::Lotomania => "Lotomania",
            Game::DuplaSena => "Dupla Sena",
        }
    }

    /// Identificador usado na base e na linha de comando.
    pub fn slug(&self) -> &'static str {
        match self {
            Game::MegaSena => "megasena",
            Game::Lotofacil => "lotofacil",
            Game::Quina => "quina",
            Game::Lotomania => "lotomania",
            Game::DuplaSena => "duplasena",
        }
    }

    pub fn number_range(&self) -> RangeInclusive<u8> {
        match self {
            Game::MegaSena => 1..=60,
            Game::Lotofacil => 1..=25,
            Game::Quina => 1..=80,
            Game::Lotomania => 0..=99,
            Game::DuplaSena => 1..=50,
        }
    }

    pub fn pool_size(&self) -> usize {
        let range = self.number_range();
        (*range.end() - *range.start()) as usize + 1
    }

    /// Dezenas sorteadas em cada sorteio do concurso.
    pub fn drawn_count(&self) -> usize {
        match self {
            Game::MegaSena => 6,
            Game::Lotofacil => 15,
            Game::Quina => 5,
            Game::Lotomania => 20,
            Game::DuplaSena => 6,
        }
    }

    pub fn draws_per_contest(&self) -> usize {
        match self {
            Game::DuplaSena => 2,
            _ => 1,
        }
    }

    /// Quantidade de dezenas aceitas numa aposta.
    pub fn bet_range(&self) -> RangeInclusive<usize> {
        match self {
            Game::MegaSena => 6..=20,
            Game::Lotofacil => 15..=20,
            Game::Quina => 5..=15,
            Game::Lotomania => 50..=50,
            Game::DuplaSena => 6..=15,
        }
    }

    pub fn min_bet(&self) -> usize {
        *self.bet_range().start()
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Game {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| match c {
                'á' | 'à' | 'ã' | 'â' => 'a',
                other => other,
            })
            .collect();
        match Game::ALL.iter().find(|g| g.slug() == normalized) {
            Some(game) => Ok(*game),
            None => bail!(
                "Jogo desconhecido: '{}' (megasena, lotofacil, quina, lotomania, duplasena)",
                s
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Draw {
    pub game: Game,
    pub contest: u32,
    pub date: String,
    pub numbers: Vec<u8>,
    /// Segundo sorteio da Dupla Sena, vazio para os demais jogos.
    pub second_numbers: Vec<u8>,
    pub winner_count: i32,
    pub winner_prize: f64,
}

impl Draw {
    pub fn all_numbers(&self) -> impl Iterator<Item = u8> + '_ {
        self.numbers.iter().chain(self.second_numbers.iter()).copied()
    }
}

#[derive(Debug, Clone)]
pub struct NumberStats {
    pub number: u8,
    pub frequency: u32,
    pub gap: u32,
}

#[derive(Debug, Clone)]
pub struct NumberProbability {
    pub number: u8,
    pub probability: f64,
}

#[derive(Debug, Clone)]
pub struct Suggestion {
    pub numbers: Vec<u8>,
    pub score: f64,
}

fn validate_set(game: Game, numbers: &[u8], label: &str) -> Result<()> {
    let range = game.number_range();
    for &n in numbers {
        if !range.contains(&n) {
            bail!(
                "{} {} fora do intervalo ({:02}-{:02})",
                label,
                n,
                range.start(),
                range.end()
            );
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("{} repetida : {}", label, numbers[i]);
            }
        }
    }
    Ok(())
}

pub fn validate_draw(game: Game, numbers: &[u8], second_numbers: &[u8]) -> Result<()> {
    if numbers.len() != game.drawn_count() {
        bail!(
            "{} sorteia {} dezenas, {} informadas",
            game,
            game.drawn_count(),
            numbers.len()
        );
    }
    validate_set(game, numbers, "Dezena")?;

    if game.draws_per_contest() == 2 {
        if second_numbers.len() != game.drawn_count() {
            bail!(
                "Segundo sorteio da {} exige {} dezenas, {} informadas",
                game,
                game.drawn_count(),
                second_numbers.len()
            );
        }
        validate_set(game, second_numbers, "Dezena do 2º sorteio")?;
    } else if !second_numbers.is_empty() {
        bail!("{} não possui segundo sorteio", game);
    }
    Ok(())
}

pub fn validate_bet(game: Game, numbers: &[u8]) -> Result<()> {
    let allowed = game.bet_range();
    if !allowed.contains(&numbers.len()) {
        bail!(
            "Aposta de {} dezenas inválida para {} ({} a {})",
            numbers.len(),
            game,
            allowed.start(),
            allowed.end()
        );
    }
    validate_set(game, numbers, "Dezena")
}
