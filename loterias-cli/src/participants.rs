use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};

use loterias_bolao::Participant;

/// Aceita `12.5`, `12,5` e `1.234,56`.
pub fn parse_decimal(s: &str) -> Result<f64> {
    let s = s.trim();
    if s.is_empty() {
        bail!("Valor vazio");
    }
    let normalized = if s.contains(',') {
        s.replace('.', "").replace(',', ".")
    } else {
        s.to_string()
    };
    let value = normalized
        .parse::<f64>()
        .with_context(|| format!("Não foi possível ler o número '{}'", s))?;
    if !value.is_finite() {
        bail!("Número não finito: '{}'", s);
    }
    Ok(value)
}

/// `nome:contribuição:cotas`, por exemplo `Ana:10,50:1`.
pub fn parse_participant(spec: &str) -> Result<Participant> {
    let mut parts = spec.rsplitn(3, ':');
    let (shares, contribution, name) = match (parts.next(), parts.next(), parts.next()) {
        (Some(shares), Some(contribution), Some(name)) => (shares, contribution, name),
        _ => bail!("Participante '{}' deve ter o formato nome:valor:cotas", spec),
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("Participante sem nome em '{}'", spec);
    }
    Ok(Participant::new(
        name,
        parse_decimal(contribution)?,
        parse_decimal(shares)?,
    ))
}

fn field(record: &csv::StringRecord, idx: usize, line: usize) -> Result<&str> {
    record
        .get(idx)
        .with_context(|| format!("Campo {} ausente na linha {}", idx + 1, line))
}

/// CSV `nome;contribuicao;cotas` com cabeçalho.
pub fn read_participants<R: Read>(reader: R) -> Result<Vec<Participant>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut participants = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let line = i + 2;
        let record = record.with_context(|| format!("Erro de leitura na linha {}", line))?;
        let name = field(&record, 0, line)?;
        if name.is_empty() {
            bail!("Participante sem nome na linha {}", line);
        }
        let contribution = parse_decimal(field(&record, 1, line)?)
            .with_context(|| format!("Contribuição inválida na linha {}", line))?;
        let shares = parse_decimal(field(&record, 2, line)?)
            .with_context(|| format!("Cotas inválidas na linha {}", line))?;
        participants.push(Participant::new(name, contribution, shares));
    }
    Ok(participants)
}

pub fn load_participants_csv(path: &Path) -> Result<Vec<Participant>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Não foi possível abrir {:?}", path))?;
    read_participants(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        assert!((parse_decimal("10").unwrap() - 10.0).abs() < 1e-12);
        assert!((parse_decimal("10.5").unwrap() - 10.5).abs() < 1e-12);
        assert!((parse_decimal(" 3,80 ").unwrap() - 3.8).abs() < 1e-12);
        assert!((parse_decimal("1.234,56").unwrap() - 1234.56).abs() < 1e-9);
        assert!(parse_decimal("").is_err());
        assert!(parse_decimal("dez").is_err());
    }

    #[test]
    fn test_parse_decimal_rejects_non_finite() {
        assert!(parse_decimal("inf").is_err());
        assert!(parse_decimal("-infinity").is_err());
        assert!(parse_decimal("NaN").is_err());
        assert!(parse_decimal("1e400").is_err());
        assert!(parse_participant("A:30:inf").is_err());
    }

    #[test]
    fn test_parse_participant() {
        let p = parse_participant("Ana:10,50:1").unwrap();
        assert_eq!(p.name, "Ana");
        assert!((p.contribution - 10.5).abs() < 1e-12);
        assert!((p.shares - 1.0).abs() < 1e-12);

        let p = parse_participant("Time: Vendas:20:2").unwrap();
        assert_eq!(p.name, "Time: Vendas");

        assert!(parse_participant("Ana:10").is_err());
        assert!(parse_participant(":10:1").is_err());
    }

    #[test]
    fn test_read_participants_csv() {
        let data = "nome;contribuicao;cotas\nAna;10,00;1\nBruno ; 20 ; 2\n";
        let participants = read_participants(data.as_bytes()).unwrap();
        assert_eq!(participants.len(), 2);
        assert_eq!(participants[1].name, "Bruno");
        assert!((participants[1].contribution - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_read_participants_bad_row() {
        let data = "nome;contribuicao;cotas\nAna;dez;1\n";
        let err = read_participants(data.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("linha 2"));
    }
}
