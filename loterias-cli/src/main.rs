mod analysis;
mod config;
mod display;
mod import;
mod participants;
mod ticket;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::analysis::sampler::generate_suggestions;
use crate::analysis::{compute_frequencies, frequency_probabilities, top_numbers};
use crate::config::{Settings, init_settings, load_settings, resolve_game, settings_path};
use crate::display::{
    display_allocation, display_draws, display_import_summary, display_scenarios,
    display_settings, display_stats, display_suggestions, display_ticket,
};
use crate::import::{parse_date, parse_numbers};
use crate::participants::{load_participants_csv, parse_participant};
use crate::ticket::{check_ticket, parse_ticket_numbers};
use loterias_bolao::format::{format_money, html_table, share_message};
use loterias_bolao::{AllocationResult, Participant, calculate_allocation, simulate_scenarios};
use loterias_db::db::{
    count_draws, db_path, fetch_draw, fetch_last_draws, fetch_last_draws_numbers, insert_draw,
    migrate, open_db,
};
use loterias_db::models::{Draw, Game, validate_draw};
use loterias_db::rusqlite::Connection;

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Text,
    Html,
    Json,
}

#[derive(Parser)]
#[command(name = "loterias", about = "Resultados, estatísticas e bolões das Loterias Caixa")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importar concursos de um arquivo CSV
    Import {
        /// Jogo (megasena, lotofacil, quina, lotomania, duplasena)
        #[arg(short, long)]
        game: Option<Game>,

        /// CSV concurso;data;dezenas;dezenas2;ganhadores;premio
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Mostrar o caminho da base de dados
    DbPath,

    /// Listar os últimos concursos
    List {
        #[arg(short, long)]
        game: Option<Game>,

        /// Quantidade de concursos
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Frequência e atraso das dezenas
    Stats {
        #[arg(short, long)]
        game: Option<Game>,

        /// Janela de análise (concursos)
        #[arg(short, long)]
        window: Option<u32>,

        /// Quantidade de dezenas no ranking
        #[arg(short, long)]
        top: Option<usize>,
    },

    /// Sugerir apostas ponderadas pela frequência
    Suggest {
        #[arg(short, long)]
        game: Option<Game>,

        /// Janela de análise (concursos)
        #[arg(short, long)]
        window: Option<u32>,

        /// Quantidade de apostas
        #[arg(short, long)]
        count: Option<usize>,

        /// Dezenas por aposta (padrão: aposta mínima do jogo)
        #[arg(short, long)]
        size: Option<usize>,

        /// Seed para reprodutibilidade
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Cadastrar um concurso manualmente
    Add {
        #[arg(short, long)]
        game: Option<Game>,
    },

    /// Calcular a divisão de um bolão
    Bolao {
        #[command(subcommand)]
        command: BolaoCommand,
    },

    /// Ler o conteúdo do QR code de um bilhete e conferir acertos
    Ticket {
        #[arg(short, long)]
        game: Option<Game>,

        /// Texto decodificado do QR code
        #[arg(short, long)]
        payload: String,

        /// Concurso a conferir (padrão: o mais recente)
        #[arg(short, long)]
        contest: Option<u32>,
    },

    /// Mostrar ou criar o arquivo de configurações
    Config {
        /// Gravar as configurações padrão
        #[arg(long)]
        init: bool,

        /// Com --init, sobrescrever um arquivo válido
        #[arg(long, requires = "init")]
        force: bool,
    },
}

#[derive(Subcommand)]
enum BolaoCommand {
    /// Repartir um prêmio entre os participantes
    Calc {
        #[command(flatten)]
        pool: PoolArgs,

        /// Valor do prêmio
        #[arg(long)]
        prize: f64,

        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },

    /// Simular prêmios como múltiplos do valor total
    Simulate {
        #[command(flatten)]
        pool: PoolArgs,

        /// Multiplicadores separados por vírgula (padrão: configurações)
        #[arg(short, long, value_delimiter = ',')]
        multipliers: Vec<f64>,

        /// Saída em JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct PoolArgs {
    /// Valor total do bolão
    #[arg(short, long)]
    total: f64,

    /// Participante no formato nome:valor:cotas (repetível)
    #[arg(short, long = "participant")]
    participants: Vec<String>,

    /// CSV nome;contribuicao;cotas
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Nome do bolão
    #[arg(long, default_value = "")]
    title: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config_path = settings_path();

    match cli.command {
        Command::Import { game, file } => {
            cmd_import(&open_database()?, resolve_game(game, &config_path)?, &file)
        }
        Command::DbPath => {
            println!("{}", db_path().display());
            Ok(())
        }
        Command::List { game, last } => {
            cmd_list(&open_database()?, resolve_game(game, &config_path)?, last)
        }
        Command::Stats { game, window, top } => {
            let settings = load_settings(&config_path)?;
            cmd_stats(
                &open_database()?,
                resolve_game(game, &config_path)?,
                window.unwrap_or(settings.stats_window),
                top.unwrap_or(settings.top_count),
            )
        }
        Command::Suggest {
            game,
            window,
            count,
            size,
            seed,
        } => {
            let settings = load_settings(&config_path)?;
            cmd_suggest(
                &open_database()?,
                &settings,
                resolve_game(game, &config_path)?,
                window.unwrap_or(settings.stats_window),
                count.unwrap_or(settings.suggestion_count),
                size,
                seed,
            )
        }
        Command::Add { game } => cmd_add(&open_database()?, resolve_game(game, &config_path)?),
        Command::Bolao { command } => cmd_bolao(command, &config_path),
        Command::Ticket {
            game,
            payload,
            contest,
        } => cmd_ticket(&open_database()?, resolve_game(game, &config_path)?, &payload, contest),
        Command::Config { init, force } => cmd_config(&config_path, init, force),
    }
}

fn open_database() -> Result<Connection> {
    let conn = open_db(&db_path())?;
    migrate(&conn)?;
    Ok(conn)
}

fn empty_base(game: Game) {
    println!(
        "Nenhum concurso da {} na base. Rode antes : loterias import --game {} --file <csv>",
        game,
        game.slug()
    );
}

fn cmd_import(conn: &Connection, game: Game, file: &Path) -> Result<()> {
    let result = import::import_csv(conn, game, file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_list(conn: &Connection, game: Game, last: u32) -> Result<()> {
    if count_draws(conn, game)? == 0 {
        empty_base(game);
        return Ok(());
    }
    let draws = fetch_last_draws(conn, game, last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_stats(conn: &Connection, game: Game, window: u32, top: usize) -> Result<()> {
    let n = count_draws(conn, game)?;
    if n == 0 {
        empty_base(game);
        return Ok(());
    }
    let effective_window = window.min(n);
    let draws = fetch_last_draws_numbers(conn, game, effective_window)?;

    let stats = compute_frequencies(&draws, game);
    let ranking = top_numbers(&stats, top);
    display_stats(game, &stats, &ranking, effective_window);
    Ok(())
}

fn cmd_suggest(
    conn: &Connection,
    settings: &Settings,
    game: Game,
    window: u32,
    count: usize,
    size: Option<usize>,
    seed: Option<u64>,
) -> Result<()> {
    let size = size.unwrap_or_else(|| game.min_bet());
    let allowed = game.bet_range();
    if !allowed.contains(&size) {
        bail!(
            "{} aceita apostas de {} a {} dezenas",
            game,
            allowed.start(),
            allowed.end()
        );
    }

    let n = count_draws(conn, game)?;
    if n == 0 {
        log::warn!("Nenhum concurso da {} na base, pesos uniformes", game);
    }
    let draws = fetch_last_draws_numbers(conn, game, window.min(n))?;

    let stats = compute_frequencies(&draws, game);
    let probs = frequency_probabilities(&stats, settings.dirichlet_alpha);
    let suggestions = generate_suggestions(&probs, count, size, seed)?;
    display_suggestions(game, &suggestions);
    Ok(())
}

fn cmd_add(conn: &Connection, game: Game) -> Result<()> {
    println!("Cadastro manual de concurso da {}\n", game);

    let contest_str = prompt("Número do concurso : ")?;
    let contest: u32 = contest_str
        .parse()
        .with_context(|| format!("Concurso inválido : '{}'", contest_str))?;
    let date = parse_date(&prompt("Data (DD/MM/AAAA) : ")?)?;

    let numbers = prompt_numbers(game, "Dezenas sorteadas")?;
    let second_numbers = if game.draws_per_contest() == 2 {
        prompt_numbers(game, "Dezenas do 2º sorteio")?
    } else {
        Vec::new()
    };

    validate_draw(game, &numbers, &second_numbers)?;

    let draw = Draw {
        game,
        contest,
        date,
        numbers,
        second_numbers,
        winner_count: 0,
        winner_prize: 0.0,
    };

    println!("\nConcurso a inserir :");
    display_draws(std::slice::from_ref(&draw));

    let confirm = prompt("\nConfirmar ? (s/n) : ")?;
    if confirm.trim().to_lowercase() == "s" {
        if insert_draw(conn, &draw)? {
            println!("Concurso inserido.");
        } else {
            println!("Concurso já cadastrado (ignorado).");
        }
    } else {
        println!("Inserção cancelada.");
    }

    Ok(())
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Erro de leitura")?;
    Ok(input.trim().to_string())
}

fn prompt_numbers(game: Game, label: &str) -> Result<Vec<u8>> {
    let range = game.number_range();
    let expected = game.drawn_count();
    loop {
        let input = prompt(&format!(
            "{} ({} dezenas, {:02}-{:02}) : ",
            label,
            expected,
            range.start(),
            range.end()
        ))?;
        match parse_numbers(&input) {
            Ok(numbers) if numbers.len() == expected => {
                let check = if game.draws_per_contest() == 2 {
                    validate_draw(game, &numbers, &numbers)
                } else {
                    validate_draw(game, &numbers, &[])
                };
                match check {
                    Ok(()) => return Ok(numbers),
                    Err(e) => println!("{}. Tente de novo.", e),
                }
            }
            _ => println!("Informe exatamente {} dezenas. Tente de novo.", expected),
        }
    }
}

fn load_pool(pool: &PoolArgs) -> Result<Vec<Participant>> {
    let mut participants = Vec::new();
    if let Some(file) = &pool.file {
        participants.extend(load_participants_csv(file)?);
    }
    for spec in &pool.participants {
        participants.push(parse_participant(spec)?);
    }
    Ok(participants)
}

fn allocate(total: f64, participants: &[Participant], prize: f64) -> Result<AllocationResult> {
    match calculate_allocation(total, participants, prize) {
        Ok(result) => Ok(result),
        Err(e) => {
            if let Some(diff) = e.discrepancy() {
                eprintln!("Diferença entre contribuições e valor total : {}", format_money(diff));
            }
            Err(e).context("Bolão recusado")
        }
    }
}

fn cmd_bolao(command: BolaoCommand, config_path: &Path) -> Result<()> {
    match command {
        BolaoCommand::Calc {
            pool,
            prize,
            format,
        } => {
            let participants = load_pool(&pool)?;
            let result = allocate(pool.total, &participants, prize)?;
            match format {
                OutputFormat::Table => display_allocation(&pool.title, &result),
                OutputFormat::Text => print!("{}", share_message(&pool.title, &result)),
                OutputFormat::Html => print!("{}", html_table(&pool.title, &result)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
            }
            Ok(())
        }
        BolaoCommand::Simulate {
            pool,
            multipliers,
            json,
        } => {
            let multipliers = if multipliers.is_empty() {
                load_settings(config_path)?.scenario_multipliers
            } else {
                multipliers
            };
            let participants = load_pool(&pool)?;
            let base = allocate(pool.total, &participants, pool.total)?;
            let scenarios = simulate_scenarios(&base, &multipliers)
                .context("Simulação recusada")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&scenarios)?);
            } else {
                display_scenarios(&scenarios);
            }
            Ok(())
        }
    }
}

fn cmd_ticket(conn: &Connection, game: Game, payload: &str, contest: Option<u32>) -> Result<()> {
    let numbers = parse_ticket_numbers(game, payload)?;

    let draw = match contest {
        Some(c) => match fetch_draw(conn, game, c)? {
            Some(draw) => Some(draw),
            None => bail!("Concurso {} da {} não encontrado na base", c, game),
        },
        None => fetch_last_draws(conn, game, 1)?.into_iter().next(),
    };

    match &draw {
        Some(draw) => display_ticket(game, &numbers, Some((draw, check_ticket(&numbers, draw)))),
        None => {
            display_ticket(game, &numbers, None);
            empty_base(game);
        }
    }
    Ok(())
}

fn cmd_config(path: &Path, init: bool, force: bool) -> Result<()> {
    let settings = if init {
        init_settings(path, force)?
    } else {
        load_settings(path)?
    };
    display_settings(&settings);
    println!("{}", path.display());
    Ok(())
}
