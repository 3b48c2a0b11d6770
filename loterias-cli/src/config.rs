use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use loterias_db::models::Game;

/// Preferências persistidas em `data/loterias.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub default_game: String,
    pub stats_window: u32,
    pub top_count: usize,
    pub suggestion_count: usize,
    pub dirichlet_alpha: f64,
    pub scenario_multipliers: Vec<f64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_game: Game::MegaSena.slug().to_string(),
            stats_window: 100,
            top_count: 10,
            suggestion_count: 3,
            dirichlet_alpha: 1.0,
            scenario_multipliers: vec![10.0, 100.0, 1_000.0],
        }
    }
}

impl Settings {
    pub fn game(&self) -> Result<Game> {
        self.default_game
            .parse()
            .context("Jogo padrão inválido nas configurações")
    }
}

pub fn settings_path() -> PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("loterias.json");
    path
}

pub fn load_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        log::debug!("{} ausente, usando configurações padrão", path.display());
        return Ok(Settings::default());
    }
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Não foi possível ler {:?}", path))?;
    let settings: Settings = serde_json::from_str(&json)
        .with_context(|| format!("Configuração inválida em {:?}", path))?;
    Ok(settings)
}

pub fn save_settings(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Não foi possível criar o diretório {:?}", parent))?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, json)
        .with_context(|| format!("Não foi possível gravar {:?}", path))?;
    log::info!("Configurações gravadas em {}", path.display());
    Ok(())
}

/// Jogo informado na linha de comando ou, na falta dele, o padrão das configurações.
/// O arquivo só é lido quando o jogo não foi informado.
pub fn resolve_game(game: Option<Game>, path: &Path) -> Result<Game> {
    match game {
        Some(game) => Ok(game),
        None => load_settings(path)?.game(),
    }
}

/// Grava as configurações padrão. Um arquivo inválido é substituído;
/// um arquivo válido só com `force`.
pub fn init_settings(path: &Path, force: bool) -> Result<Settings> {
    if path.exists() && !force {
        match load_settings(path) {
            Ok(_) => bail!("{} já existe (use --force para sobrescrever)", path.display()),
            Err(e) => log::warn!("Substituindo configuração inválida: {:#}", e),
        }
    }
    let settings = Settings::default();
    save_settings(path, &settings)?;
    Ok(settings)
}
