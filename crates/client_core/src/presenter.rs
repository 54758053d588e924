//! Maps operation outcomes onto the regions of a presentation surface.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use shared::protocol::{
    DrawHistory, DrawResult, HealthStatus, RefreshSummary, StatisticsSnapshot, Suggestion,
    TeamPick, TeamStatistics, VerificationOutcome,
};

use crate::{
    error::OperationError,
    format::{format_currency, format_date, format_percent, or_placeholder, pad_number, yes_no},
    orchestrator::{ControlState, Operation, Payload},
    view::{render_text, Ball, Block, Panel, Tile, Tone},
};

const TOP_NUMBERS: usize = 20;

/// Named area of the presentation surface. Each operation owns exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    RefreshStatus,
    LatestResult,
    Statistics,
    Suggestions,
    Verification,
    DrawLookup,
    DrawHistory,
    TeamStatistics,
    TeamSuggestion,
    ServiceStatus,
}

impl Region {
    pub fn id(self) -> &'static str {
        match self {
            Region::RefreshStatus => "status-atualizacao",
            Region::LatestResult => "ultimo-resultado",
            Region::Statistics => "estatisticas-gerais",
            Region::Suggestions => "resultado-palpites",
            Region::Verification => "resultado-conferencia",
            Region::DrawLookup => "resultado-concurso",
            Region::DrawHistory => "historico-resultados",
            Region::TeamStatistics => "estatisticas-times",
            Region::TeamSuggestion => "sugestao-time",
            Region::ServiceStatus => "status-servico",
        }
    }
}

impl Operation {
    pub fn region(self) -> Region {
        match self {
            Operation::Refresh => Region::RefreshStatus,
            Operation::LatestResult => Region::LatestResult,
            Operation::Statistics => Region::Statistics,
            Operation::Suggestions => Region::Suggestions,
            Operation::Verification => Region::Verification,
            Operation::DrawLookup => Region::DrawLookup,
            Operation::DrawHistory => Region::DrawHistory,
            Operation::TeamStatistics => Region::TeamStatistics,
            Operation::TeamSuggestion => Region::TeamSuggestion,
            Operation::Health => Region::ServiceStatus,
        }
    }

    /// Shown when a failure carries no text of its own.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::Refresh => "Erro ao atualizar base de dados.",
            Operation::LatestResult => "Erro ao carregar último resultado.",
            Operation::Statistics => "Erro ao carregar estatísticas.",
            Operation::Suggestions => "Erro ao gerar palpites.",
            Operation::Verification => "Erro ao conferir palpite.",
            Operation::DrawLookup => "Erro ao buscar concurso.",
            Operation::DrawHistory => "Erro ao carregar resultados.",
            Operation::TeamStatistics => "Erro ao carregar estatísticas dos times.",
            Operation::TeamSuggestion => "Erro ao sugerir time do coração.",
            Operation::Health => "Serviço indisponível.",
        }
    }
}

/// Where rendered blocks end up. `replace` always overwrites the region.
pub trait PresentationSink: Send {
    fn replace(&mut self, region: Region, block: Block);

    fn control_changed(&mut self, _operation: Operation, _control: &ControlState) {}
}

pub struct Presenter<S> {
    sink: Mutex<S>,
}

impl<S: PresentationSink> Presenter<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink: Mutex::new(sink),
        }
    }

    pub fn show_loading(&self, operation: Operation) {
        self.sink().replace(operation.region(), Block::Loading);
    }

    pub fn show_error(&self, operation: Operation, error: &OperationError) {
        self.sink()
            .replace(operation.region(), Block::Error(error_text(operation, error)));
    }

    pub fn show_payload(&self, payload: &Payload) {
        self.sink()
            .replace(payload.operation().region(), render_payload(payload));
    }

    pub fn control_changed(&self, operation: Operation, control: &ControlState) {
        self.sink().control_changed(operation, control);
    }

    /// Empties the operation's region, e.g. when its invocation was dropped.
    pub fn clear(&self, operation: Operation) {
        self.sink()
            .replace(operation.region(), Block::Content(Vec::new()));
    }

    fn sink(&self) -> MutexGuard<'_, S> {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Failure text for a region: the failure's own reason when it has one,
/// otherwise the operation's fallback. Transport failures keep their cause
/// next to the fallback.
pub fn error_text(operation: Operation, error: &OperationError) -> String {
    match error {
        OperationError::Transport(cause) => {
            format!("{} ({cause})", operation.fallback_message())
        }
        _ => error
            .reason()
            .unwrap_or_else(|| operation.fallback_message().to_string()),
    }
}

pub fn render_payload(payload: &Payload) -> Block {
    let panels = match payload {
        Payload::Refresh(summary) => vec![refresh_panel(summary)],
        Payload::LatestResult(result) => vec![draw_panel(
            format!("Último Resultado - Concurso {}", result.draw_id),
            result,
        )],
        Payload::Statistics(snapshot) => statistics_panels(snapshot),
        Payload::Suggestions(suggestions) => suggestion_panels(suggestions),
        Payload::Verification(outcome) => vec![verification_panel(outcome)],
        Payload::Draw(result) => vec![draw_panel(format!("Concurso {}", result.draw_id), result)],
        Payload::DrawHistory(history) => vec![history_panel(history)],
        Payload::TeamStatistics(teams) => {
            let mut panels = vec![Panel::new("Frequência dos Times do Coração").table(
                &["Time", "Frequência"],
                teams
                    .frequency
                    .iter()
                    .map(|item| vec![item.team.clone(), item.frequency.to_string()])
                    .collect(),
            )];
            panels.extend(team_panels(teams));
            panels
        }
        Payload::TeamSuggestion(pick) => vec![team_pick_panel(pick)],
        Payload::Health(status) => vec![health_panel(status)],
    };
    Block::Content(panels)
}

fn balls<'a>(numbers: impl IntoIterator<Item = &'a shared::domain::DrawNumber>) -> Vec<Ball> {
    numbers
        .into_iter()
        .map(|number| Ball {
            label: pad_number(number.get()),
            matched: false,
            hint: None,
        })
        .collect()
}

fn refresh_panel(summary: &RefreshSummary) -> Panel {
    Panel::new("Base atualizada com sucesso!")
        .line("Novos concursos", summary.new_draws.to_string())
        .line("Total cadastrados", summary.total_stored.to_string())
}

fn draw_panel(title: String, result: &DrawResult) -> Panel {
    Panel::new(title)
        .line("Data", format_date(result.draw_date.as_deref()))
        .line("Local", or_placeholder(result.location.as_deref()))
        .numbers("Números Sorteados", balls(&result.numbers))
        .line("Time do Coração", or_placeholder(result.team.as_deref()))
        .line("Acumulado", yes_no(result.rolled_over))
        .line("Valor Arrecadado", format_currency(result.amount_collected))
        .line(
            "Próximo Concurso",
            format!(
                "{} - {}",
                or_placeholder(result.next_draw_id),
                format_date(result.next_draw_date.as_deref())
            ),
        )
        .line(
            "Prêmio Estimado",
            format_currency(result.next_estimated_prize),
        )
}

fn statistics_panels(stats: &StatisticsSnapshot) -> Vec<Panel> {
    let mut panels = vec![
        Panel::new("Estatísticas Gerais").tiles(vec![Tile::new(
            stats.total_draws.to_string(),
            "Total de Concursos",
        )]),
        Panel::new("Números Mais Frequentes (Top 20)").numbers(
            "Números",
            stats
                .number_frequency
                .iter()
                .take(TOP_NUMBERS)
                .map(|item| Ball {
                    label: pad_number(item.number.get()),
                    matched: false,
                    hint: Some(format!("Frequência: {}", item.frequency)),
                })
                .collect(),
        ),
        Panel::new("Números Mais Atrasados (Top 20)").numbers(
            "Números",
            stats
                .number_delays
                .iter()
                .take(TOP_NUMBERS)
                .map(|item| Ball {
                    label: pad_number(item.number.get()),
                    matched: false,
                    hint: Some(format!("Atraso: {} concursos", item.delay)),
                })
                .collect(),
        ),
        Panel::new("Distribuição Pares/Ímpares").tiles(vec![
            Tile::new(
                format_percent(stats.parity.even_percent),
                format!("Pares ({})", stats.parity.even),
            ),
            Tile::new(
                format_percent(stats.parity.odd_percent),
                format!("Ímpares ({})", stats.parity.odd),
            ),
        ]),
        Panel::new("Análise por Faixa").table(
            &["Faixa", "Frequência"],
            stats
                .by_range
                .iter()
                .map(|item| vec![item.range.clone(), item.frequency.to_string()])
                .collect(),
        ),
        Panel::new("Análise por Posição de Sorteio").table(
            &["Posição", "Top 10 Números"],
            stats
                .by_position
                .iter()
                .map(|item| {
                    let numbers: Vec<String> = item
                        .numbers
                        .iter()
                        .map(|n| pad_number(n.number.get()))
                        .collect();
                    vec![format!("{}ª", item.position), numbers.join(", ")]
                })
                .collect(),
        ),
    ];

    if let Some(by_digit) = &stats.by_digit {
        panels.push(Panel::new("Análise por Dígito Final").table(
            &["Dígito", "Frequência"],
            by_digit
                .iter()
                .map(|item| vec![item.digit.to_string(), item.frequency.to_string()])
                .collect(),
        ));
    }
    if let Some(teams) = &stats.teams {
        panels.extend(team_panels(teams));
    }
    panels
}

fn team_panels(teams: &TeamStatistics) -> Vec<Panel> {
    vec![
        Panel::new("Times do Coração Mais Sorteados (Top 10)").table(
            &["Time", "Frequência"],
            teams
                .most_drawn
                .iter()
                .map(|item| vec![item.team.clone(), item.frequency.to_string()])
                .collect(),
        ),
        Panel::new("Times do Coração Mais Atrasados (Top 10)").table(
            &["Time", "Atraso (concursos)"],
            teams
                .most_overdue
                .iter()
                .map(|item| vec![item.team.clone(), item.delay.to_string()])
                .collect(),
        ),
    ]
}

fn suggestion_panels(suggestions: &[Suggestion]) -> Vec<Panel> {
    if suggestions.is_empty() {
        return vec![Panel::new("Palpites").banner(Tone::Info, "Nenhum palpite gerado.")];
    }
    suggestions
        .iter()
        .enumerate()
        .map(|(index, suggestion)| {
            Panel::new(format!("Jogo {}", index + 1))
                .line("Estratégia", suggestion.strategy.clone())
                .numbers("Números", balls(&suggestion.numbers))
                .line("Time do Coração Sugerido", suggestion.team.team.clone())
                .line("Motivo", suggestion.team.reason.clone())
        })
        .collect()
}

fn verification_panel(outcome: &VerificationOutcome) -> Panel {
    // The service decides which numbers matched; they are only highlighted here.
    let drawn = outcome
        .drawn
        .iter()
        .map(|number| Ball {
            label: pad_number(number.get()),
            matched: outcome.matched.contains(number),
            hint: None,
        })
        .collect();

    let panel = Panel::new("Resultado da Conferência")
        .line(
            "Concurso",
            format!(
                "{} - {}",
                outcome.draw_id,
                format_date(outcome.draw_date.as_deref())
            ),
        )
        .numbers("Números Sorteados", drawn)
        .tiles(vec![
            Tile::new(outcome.hits.to_string(), "Acertos"),
            Tile::new(yes_no(outcome.team_matched), "Acertou Time"),
        ])
        .line("Time Sorteado", or_placeholder(outcome.drawn_team.as_deref()));

    match outcome.prize_tier.as_deref().filter(|tier| !tier.is_empty()) {
        Some(tier) => panel.banner(
            Tone::Success,
            format!("Parabéns! Você foi premiado na faixa: {tier}"),
        ),
        None if outcome.team_matched => {
            panel.banner(Tone::Success, "Parabéns! Você acertou o Time do Coração!")
        }
        None => panel.banner(Tone::Info, "Não houve premiação neste concurso."),
    }
}

fn history_panel(history: &DrawHistory) -> Panel {
    Panel::new(format!("Resultados Cadastrados ({})", history.total)).table(
        &["Concurso", "Data", "Dezenas", "Time do Coração"],
        history
            .results
            .iter()
            .map(|result| {
                let numbers: Vec<String> =
                    result.numbers.iter().map(|n| pad_number(n.get())).collect();
                vec![
                    result.draw_id.to_string(),
                    format_date(result.draw_date.as_deref()),
                    numbers.join(" "),
                    or_placeholder(result.team.as_deref()),
                ]
            })
            .collect(),
    )
}

fn team_pick_panel(pick: &TeamPick) -> Panel {
    let mut panel = Panel::new("Time do Coração Sugerido")
        .line("Time", pick.team.clone())
        .line("Motivo", pick.reason.clone());
    if let Some(frequency) = pick.frequency {
        panel = panel.line("Frequência", frequency.to_string());
    }
    if let Some(delay) = pick.delay {
        panel = panel.line("Atraso", format!("{delay} concursos"));
    }
    panel
}

fn health_panel(status: &HealthStatus) -> Panel {
    Panel::new("Status do Serviço")
        .line("Status", status.status.clone())
        .line("Total de concursos", status.total_draws.to_string())
        .line("Último concurso", or_placeholder(status.latest_draw))
}

/// Sink that keeps the latest block per region in memory. Clones share
/// state, so a handle can be kept while the orchestrator owns another.
#[derive(Clone, Default)]
pub struct MemorySink {
    inner: Arc<Mutex<MemorySinkState>>,
}

#[derive(Default)]
struct MemorySinkState {
    regions: HashMap<Region, Block>,
    writes: HashMap<Region, usize>,
    controls: Vec<(Operation, ControlState)>,
}

impl MemorySink {
    pub fn block(&self, region: Region) -> Option<Block> {
        self.state().regions.get(&region).cloned()
    }

    pub fn text(&self, region: Region) -> Option<String> {
        self.block(region).map(|block| render_text(&block))
    }

    /// How many times the region was written, loading placeholders included.
    pub fn writes(&self, region: Region) -> usize {
        self.state().writes.get(&region).copied().unwrap_or(0)
    }

    pub fn control_history(&self, operation: Operation) -> Vec<ControlState> {
        self.state()
            .controls
            .iter()
            .filter(|(op, _)| *op == operation)
            .map(|(_, control)| control.clone())
            .collect()
    }

    fn state(&self) -> MutexGuard<'_, MemorySinkState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PresentationSink for MemorySink {
    fn replace(&mut self, region: Region, block: Block) {
        let mut state = self.state();
        *state.writes.entry(region).or_default() += 1;
        state.regions.insert(region, block);
    }

    fn control_changed(&mut self, operation: Operation, control: &ControlState) {
        self.state().controls.push((operation, control.clone()));
    }
}

#[cfg(test)]
#[path = "tests/presenter_tests.rs"]
mod tests;
