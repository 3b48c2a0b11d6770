use anyhow::{bail, Context, Result};

use loterias_db::models::{validate_bet, Draw, Game};

/// Rótulos cujo valor seguinte não faz parte da aposta.
const NON_BET_LABELS: [&str; 5] = ["concurso", "conc", "data", "bilhete", "id"];

/// Trechos numéricos do conteúdo do QR code que pertencem à aposta.
///
/// O conteúdo é dividido em palavras (espaço, `|`, `;`, `:`, `=`). Palavras com
/// letras são rótulos e são descartadas; depois de `Concurso`, `Data`,
/// `Bilhete` ou `Id` a palavra seguinte também é descartada. Datas com `/`
/// nunca entram na aposta.
fn bet_tokens(payload: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut skip_next = false;

    let words = payload
        .split(|c: char| c.is_whitespace() || matches!(c, '|' | ';' | ':' | '='))
        .filter(|w| !w.is_empty());

    for word in words {
        if word.chars().any(char::is_alphabetic) {
            let label: String = word
                .chars()
                .filter(|c| c.is_alphabetic())
                .collect::<String>()
                .to_lowercase();
            skip_next = NON_BET_LABELS.contains(&label.as_str())
                && !word.chars().any(|c| c.is_ascii_digit());
            continue;
        }
        if word.contains('/') || skip_next {
            skip_next = false;
            continue;
        }
        tokens.extend(word.split(|c: char| !c.is_ascii_digit()).filter(|t| !t.is_empty()));
    }

    tokens
}

/// Extrai as dezenas apostadas do conteúdo lido no QR code do bilhete.
///
/// Formato esperado: rótulos opcionais seguidos das dezenas, por exemplo
/// `MEGA-SENA Concurso: 2700 Data: 02/03/2024 Aposta: 04 15 23 33 41 58`.
/// Número do concurso e data são ignorados. Trechos com mais de dois dígitos
/// e comprimento par são lidos como dezenas consecutivas (`"040815"`).
pub fn parse_ticket_numbers(game: Game, payload: &str) -> Result<Vec<u8>> {
    let mut numbers = Vec::new();

    for token in bet_tokens(payload) {
        if token.len() <= 2 {
            numbers.push(parse_number(token)?);
        } else if token.len() % 2 == 0 {
            for i in (0..token.len()).step_by(2) {
                numbers.push(parse_number(&token[i..i + 2])?);
            }
        } else {
            bail!("Trecho numérico ambíguo no bilhete : '{}'", token);
        }
    }

    if numbers.is_empty() {
        bail!("Nenhuma dezena encontrada no bilhete");
    }

    validate_bet(game, &numbers)?;
    numbers.sort();
    Ok(numbers)
}

fn parse_number(s: &str) -> Result<u8> {
    s.parse::<u8>()
        .with_context(|| format!("Dezena inválida : '{}'", s))
}

fn hits(numbers: &[u8], drawn: &[u8]) -> usize {
    numbers.iter().filter(|n| drawn.contains(n)).count()
}

/// Acertos da aposta no concurso; na Dupla Sena vale o melhor dos dois sorteios.
pub fn check_ticket(numbers: &[u8], draw: &Draw) -> usize {
    let first = hits(numbers, &draw.numbers);
    if draw.second_numbers.is_empty() {
        first
    } else {
        first.max(hits(numbers, &draw.second_numbers))
    }
}
