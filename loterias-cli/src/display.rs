use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};

use crate::config::Settings;
use crate::import::ImportResult;
use loterias_bolao::format::{format_money, format_percent, format_shares};
use loterias_bolao::{AllocationResult, Scenario};
use loterias_db::models::{Draw, Game, NumberStats, Suggestion};

fn numbers_str(numbers: &[u8]) -> String {
    let mut sorted = numbers.to_vec();
    sorted.sort();
    sorted
        .iter()
        .map(|n| format!("{:02}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Nenhum concurso para exibir.");
        return;
    }

    let two_draws = draws.iter().any(|d| !d.second_numbers.is_empty());
    let mut header = vec!["Concurso", "Data", "Dezenas"];
    if two_draws {
        header.push("2º sorteio");
    }
    header.extend(["Ganhadores", "Prêmio"]);
    let mut table = new_table(header);

    for draw in draws {
        let prize = if draw.winner_prize > 0.0 {
            format_money(draw.winner_prize)
        } else {
            "—".to_string()
        };

        let mut row = vec![
            draw.contest.to_string(),
            draw.date.clone(),
            numbers_str(&draw.numbers),
        ];
        if two_draws {
            row.push(numbers_str(&draw.second_numbers));
        }
        row.push(draw.winner_count.to_string());
        row.push(prize);
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Importação concluída :");
    println!("  Linhas lidas     : {}", result.total_records);
    println!("  Inseridos        : {}", result.inserted);
    println!("  Repetidos        : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erros            : {}", result.errors);
    }
}

pub fn display_stats(game: Game, stats: &[NumberStats], top: &[NumberStats], window: u32) {
    println!("\n📊 {} : estatísticas dos últimos {} concursos\n", game, window);

    println!("── Mais sorteadas ──");
    let mut table = new_table(vec!["#", "Dezena", "Frequência", "Atraso"]);
    for (i, stat) in top.iter().enumerate() {
        table.add_row(vec![
            &(i + 1).to_string(),
            &format!("{:02}", stat.number),
            &stat.frequency.to_string(),
            &stat.gap.to_string(),
        ]);
    }
    println!("{table}");

    println!("\n── Mais atrasadas ──");
    let mut late = stats.to_vec();
    late.sort_by(|a, b| b.gap.cmp(&a.gap).then(a.number.cmp(&b.number)));
    late.truncate(top.len());

    let mut table = new_table(vec!["Dezena", "Atraso", "Frequência"]);
    for stat in &late {
        let gap = Cell::new(stat.gap.to_string());
        let gap = if stat.frequency == 0 { gap.fg(Color::Red) } else { gap };
        table.add_row(vec![
            Cell::new(format!("{:02}", stat.number)),
            gap,
            Cell::new(stat.frequency.to_string()),
        ]);
    }
    println!("{table}");
}

pub fn display_suggestions(game: Game, suggestions: &[Suggestion]) {
    println!("\n🎲 Sugestões de apostas ({})\n", game);

    let mut table = new_table(vec!["#", "Dezenas", "Score"]);
    for (i, sug) in suggestions.iter().enumerate() {
        table.add_row(vec![
            &format!("{}", i + 1),
            &numbers_str(&sug.numbers),
            &format!("{:.4}", sug.score),
        ]);
    }
    println!("{table}");
}

pub fn display_allocation(title: &str, result: &AllocationResult) {
    println!("\n🍀 Bolão {}\n", title);
    println!("  Valor total   : {}", format_money(result.total_value));
    println!("  Cotas         : {}", format_shares(result.total_shares));
    println!("  Valor da cota : {}", format_money(result.share_value));
    println!("  Prêmio        : {}\n", format_money(result.prize_amount));

    let mut table = new_table(vec!["Participante", "Cotas", "Contribuição", "Participação", "Prêmio"]);
    for p in &result.participants {
        table.add_row(vec![
            Cell::new(&p.name),
            Cell::new(format_shares(p.shares)),
            Cell::new(format_money(p.contribution)),
            Cell::new(format_percent(p.shareholding_percent)),
            Cell::new(format_money(p.prize_share)).fg(Color::Green),
        ]);
    }
    println!("{table}");
}

pub fn display_scenarios(scenarios: &[Scenario]) {
    let Some(first) = scenarios.first() else {
        println!("Nenhum cenário para simular.");
        return;
    };

    println!("\n🔮 Simulação de prêmios\n");

    let mut header = vec!["Participante".to_string()];
    for s in scenarios {
        header.push(format!("{}x ({})", s.multiplier, format_money(s.prize_amount)));
    }
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    for (i, p) in first.scenario.participants.iter().enumerate() {
        let mut row = vec![p.name.clone()];
        for s in scenarios {
            row.push(format_money(s.scenario.participants[i].prize_share));
        }
        table.add_row(row);
    }
    println!("{table}");
}

pub fn display_ticket(game: Game, numbers: &[u8], checked: Option<(&Draw, usize)>) {
    println!("\n🎫 Bilhete {} : {} dezenas", game, numbers.len());
    println!("  {}", numbers_str(numbers));
    if let Some((draw, hits)) = checked {
        println!("\nConcurso {} ({}) :", draw.contest, draw.date);
        display_draws(std::slice::from_ref(draw));
        println!("Acertos : {}", hits);
    }
}

pub fn display_settings(settings: &Settings) {
    let multipliers = settings
        .scenario_multipliers
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    let rows = [
        ("default_game", settings.default_game.clone()),
        ("stats_window", settings.stats_window.to_string()),
        ("top_count", settings.top_count.to_string()),
        ("suggestion_count", settings.suggestion_count.to_string()),
        ("dirichlet_alpha", settings.dirichlet_alpha.to_string()),
        ("scenario_multipliers", multipliers),
    ];

    let mut table = new_table(vec!["Chave", "Valor"]);
    for (key, value) in rows {
        table.add_row(vec![key.to_string(), value]);
    }
    println!("{table}");
}
