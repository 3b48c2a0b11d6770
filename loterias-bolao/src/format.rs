//! Apresentação do resultado de um bolão: valores em reais, mensagem de texto e tabela HTML.
//!
//! Os valores exibidos são arredondados a 2 casas (meio para longe do zero).
//! O [`AllocationResult`] em si nunca é arredondado.

use crate::allocation::AllocationResult;

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `1234.5` → `"R$ 1.234,50"`. Valores não finitos aparecem como `R$ NaN` ou `R$ inf`.
pub fn format_money(value: f64) -> String {
    if !value.is_finite() {
        return format!("R$ {value}");
    }
    let cents = (value.abs() * 100.0).round() as u64;
    let integer = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}R$ {grouped},{fraction:02}")
}

pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", round_cents(value)).replace('.', ",")
}

/// Cotas inteiras sem casas decimais, fracionárias com duas.
pub fn format_shares(shares: f64) -> String {
    if shares.fract() == 0.0 {
        format!("{}", shares as i64)
    } else {
        format!("{:.2}", shares).replace('.', ",")
    }
}

/// Mensagem para compartilhar em aplicativos de conversa, uma linha por participante.
pub fn share_message(title: &str, result: &AllocationResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("🍀 Bolão {title}\n"));
    out.push_str(&format!("Valor total: {}\n", format_money(result.total_value)));
    out.push_str(&format!(
        "Cotas: {} | Valor da cota: {}\n",
        format_shares(result.total_shares),
        format_money(result.share_value)
    ));
    out.push_str(&format!("Prêmio: {}\n", format_money(result.prize_amount)));
    out.push('\n');
    for p in &result.participants {
        out.push_str(&format!(
            "• {}: {} cota(s), pagou {} ({}) → {}\n",
            p.name,
            format_shares(p.shares),
            format_money(p.contribution),
            format_percent(p.shareholding_percent),
            format_money(p.prize_share)
        ));
    }
    out
}

fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

pub fn html_table(title: &str, result: &AllocationResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("<h2>Bolão {}</h2>\n", escape_html(title)));
    out.push_str("<table>\n");
    out.push_str(
        "  <tr><th>Participante</th><th>Cotas</th><th>Contribuição</th><th>Participação</th><th>Prêmio</th></tr>\n",
    );
    for p in &result.participants {
        out.push_str(&format!(
            "  <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&p.name),
            format_shares(p.shares),
            format_money(p.contribution),
            format_percent(p.shareholding_percent),
            format_money(p.prize_share)
        ));
    }
    out.push_str(&format!(
        "  <tr><th>Total</th><th>{}</th><th>{}</th><th>{}</th><th>{}</th></tr>\n",
        format_shares(result.total_shares),
        format_money(result.total_value),
        format_percent(100.0),
        format_money(result.prize_amount)
    ));
    out.push_str("</table>\n");
    out
}
