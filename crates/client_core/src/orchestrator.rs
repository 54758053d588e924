//! Drives every remote operation through one lifecycle:
//! idle → in flight → succeeded/failed, with the triggering control disabled
//! for exactly the duration of the invocation.

use std::{
    collections::HashMap,
    fmt,
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use shared::{
    domain::{DrawId, Strategy},
    protocol::{
        DrawHistory, DrawResult, HealthStatus, RefreshSummary, StatisticsSnapshot, Suggestion,
        TeamPick, TeamStatistics, VerificationOutcome,
    },
};
use tracing::{debug, info, warn};

use crate::{
    error::OperationError,
    presenter::{PresentationSink, Presenter},
    transport::LotteryService,
    validation::{validate_suggestion, validate_ticket},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Refresh,
    LatestResult,
    Statistics,
    Suggestions,
    Verification,
    DrawLookup,
    DrawHistory,
    TeamStatistics,
    TeamSuggestion,
    Health,
}

impl Operation {
    pub const ALL: [Operation; 10] = [
        Operation::Refresh,
        Operation::LatestResult,
        Operation::Statistics,
        Operation::Suggestions,
        Operation::Verification,
        Operation::DrawLookup,
        Operation::DrawHistory,
        Operation::TeamStatistics,
        Operation::TeamSuggestion,
        Operation::Health,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Refresh => "refresh",
            Operation::LatestResult => "latest_result",
            Operation::Statistics => "statistics",
            Operation::Suggestions => "suggestions",
            Operation::Verification => "verification",
            Operation::DrawLookup => "draw_lookup",
            Operation::DrawHistory => "draw_history",
            Operation::TeamStatistics => "team_statistics",
            Operation::TeamSuggestion => "team_suggestion",
            Operation::Health => "health",
        }
    }

    /// Control label while the operation is idle.
    pub fn idle_label(self) -> &'static str {
        match self {
            Operation::Refresh => "Atualizar Dados",
            Operation::LatestResult => "Carregar Resultado",
            Operation::Statistics => "Carregar Estatísticas",
            Operation::Suggestions => "Gerar Palpites",
            Operation::Verification => "Conferir",
            Operation::DrawLookup => "Buscar Concurso",
            Operation::DrawHistory => "Listar Resultados",
            Operation::TeamStatistics => "Estatísticas dos Times",
            Operation::TeamSuggestion => "Sugerir Time",
            Operation::Health => "Verificar Serviço",
        }
    }

    /// Control label while a request is in flight.
    pub fn busy_label(self) -> &'static str {
        match self {
            Operation::Refresh => "Atualizando...",
            Operation::Suggestions => "Gerando...",
            Operation::Verification => "Conferindo...",
            Operation::DrawLookup => "Buscando...",
            Operation::TeamSuggestion => "Sugerindo...",
            Operation::Health => "Verificando...",
            Operation::LatestResult
            | Operation::Statistics
            | Operation::DrawHistory
            | Operation::TeamStatistics => "Carregando...",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Successful reply of any operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Refresh(RefreshSummary),
    LatestResult(DrawResult),
    Statistics(StatisticsSnapshot),
    Suggestions(Vec<Suggestion>),
    Verification(VerificationOutcome),
    Draw(DrawResult),
    DrawHistory(DrawHistory),
    TeamStatistics(TeamStatistics),
    TeamSuggestion(TeamPick),
    Health(HealthStatus),
}

impl Payload {
    pub fn operation(&self) -> Operation {
        match self {
            Payload::Refresh(_) => Operation::Refresh,
            Payload::LatestResult(_) => Operation::LatestResult,
            Payload::Statistics(_) => Operation::Statistics,
            Payload::Suggestions(_) => Operation::Suggestions,
            Payload::Verification(_) => Operation::Verification,
            Payload::Draw(_) => Operation::DrawLookup,
            Payload::DrawHistory(_) => Operation::DrawHistory,
            Payload::TeamStatistics(_) => Operation::TeamStatistics,
            Payload::TeamSuggestion(_) => Operation::TeamSuggestion,
            Payload::Health(_) => Operation::Health,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum OperationState {
    #[default]
    Idle,
    InFlight,
    Succeeded(Payload),
    Failed(OperationError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    pub enabled: bool,
    pub label: &'static str,
}

impl ControlState {
    fn idle(operation: Operation) -> Self {
        Self {
            enabled: true,
            label: operation.idle_label(),
        }
    }

    fn busy(operation: Operation) -> Self {
        Self {
            enabled: false,
            label: operation.busy_label(),
        }
    }
}

struct Slot {
    state: OperationState,
    control: ControlState,
}

pub struct RequestOrchestrator<S: PresentationSink> {
    service: Arc<dyn LotteryService>,
    presenter: Presenter<S>,
    slots: Mutex<HashMap<Operation, Slot>>,
}

impl<S: PresentationSink> RequestOrchestrator<S> {
    pub fn new(service: Arc<dyn LotteryService>, sink: S) -> Self {
        let slots = Operation::ALL
            .into_iter()
            .map(|operation| {
                (
                    operation,
                    Slot {
                        state: OperationState::Idle,
                        control: ControlState::idle(operation),
                    },
                )
            })
            .collect();
        Self {
            service,
            presenter: Presenter::new(sink),
            slots: Mutex::new(slots),
        }
    }

    pub fn state(&self, operation: Operation) -> OperationState {
        self.slots()
            .get(&operation)
            .map(|slot| slot.state.clone())
            .unwrap_or_default()
    }

    pub fn control(&self, operation: Operation) -> ControlState {
        self.slots()
            .get(&operation)
            .map(|slot| slot.control.clone())
            .unwrap_or_else(|| ControlState::idle(operation))
    }

    /// Pulls fresh draws into the service. On success the latest result and
    /// the statistics are fetched again, once each.
    pub async fn refresh(&self) -> Result<Payload, OperationError> {
        let result = self
            .run(Operation::Refresh, async {
                self.service.refresh().await.map(Payload::Refresh)
            })
            .await;
        if result.is_ok() {
            self.reload_views().await;
        }
        result
    }

    pub async fn latest_result(&self) -> Result<Payload, OperationError> {
        self.run(Operation::LatestResult, async {
            self.service.latest_result().await.map(Payload::LatestResult)
        })
        .await
    }

    pub async fn statistics(&self) -> Result<Payload, OperationError> {
        self.run(Operation::Statistics, async {
            self.service.statistics().await.map(Payload::Statistics)
        })
        .await
    }

    pub async fn suggestions(
        &self,
        strategy: Strategy,
        numbers_per_game: u8,
        games: u8,
    ) -> Result<Payload, OperationError> {
        self.run(Operation::Suggestions, async {
            let request = validate_suggestion(strategy, numbers_per_game, games)?;
            self.service
                .generate_suggestions(&request)
                .await
                .map(Payload::Suggestions)
        })
        .await
    }

    /// Validates the raw ticket and, only if it is well formed, sends it for
    /// verification.
    pub async fn verify(
        &self,
        raw_numbers: &str,
        team: &str,
        draw_id: &str,
    ) -> Result<Payload, OperationError> {
        self.run(Operation::Verification, async {
            let request = validate_ticket(raw_numbers, team, draw_id)?;
            debug!(
                numbers = request.numbers.len(),
                draw_id = %request.draw_id,
                "ticket accepted for verification"
            );
            self.service.verify(&request).await.map(Payload::Verification)
        })
        .await
    }

    pub async fn draw(&self, draw_id: DrawId) -> Result<Payload, OperationError> {
        self.run(Operation::DrawLookup, async {
            self.service.draw(draw_id).await.map(Payload::Draw)
        })
        .await
    }

    pub async fn draw_history(&self, limit: Option<u32>) -> Result<Payload, OperationError> {
        self.run(Operation::DrawHistory, async {
            self.service.draw_history(limit).await.map(Payload::DrawHistory)
        })
        .await
    }

    pub async fn team_statistics(&self) -> Result<Payload, OperationError> {
        self.run(Operation::TeamStatistics, async {
            self.service
                .team_statistics()
                .await
                .map(Payload::TeamStatistics)
        })
        .await
    }

    pub async fn suggest_team(&self, strategy: Strategy) -> Result<Payload, OperationError> {
        self.run(Operation::TeamSuggestion, async {
            self.service
                .suggest_team(strategy)
                .await
                .map(Payload::TeamSuggestion)
        })
        .await
    }

    pub async fn health(&self) -> Result<Payload, OperationError> {
        self.run(Operation::Health, async {
            self.service.health().await.map(Payload::Health)
        })
        .await
    }

    /// Page-load fetch: latest result and statistics, interleaved.
    pub async fn load_dashboard(
        &self,
    ) -> (
        Result<Payload, OperationError>,
        Result<Payload, OperationError>,
    ) {
        futures::join!(self.latest_result(), self.statistics())
    }

    async fn reload_views(&self) {
        let (latest, statistics) = self.load_dashboard().await;
        for (operation, result) in [
            (Operation::LatestResult, latest),
            (Operation::Statistics, statistics),
        ] {
            if let Err(OperationError::Busy(_)) = result {
                debug!(%operation, "view already loading; reload skipped");
            }
        }
    }

    async fn run<F>(&self, operation: Operation, call: F) -> Result<Payload, OperationError>
    where
        F: Future<Output = Result<Payload, OperationError>>,
    {
        let lease = self.begin(operation)?;
        let result = call.await;
        self.settle(operation, &result);
        drop(lease);
        result
    }

    fn begin(&self, operation: Operation) -> Result<ControlLease<'_, S>, OperationError> {
        let control = {
            let mut slots = self.slots();
            let slot = slots.entry(operation).or_insert_with(|| Slot {
                state: OperationState::Idle,
                control: ControlState::idle(operation),
            });
            if slot.state == OperationState::InFlight {
                debug!(%operation, "invocation refused; request already in flight");
                return Err(OperationError::Busy(operation));
            }
            slot.state = OperationState::InFlight;
            slot.control = ControlState::busy(operation);
            slot.control.clone()
        };
        debug!(%operation, label = control.label, "operation started");
        self.presenter.control_changed(operation, &control);
        self.presenter.show_loading(operation);
        Ok(ControlLease {
            orchestrator: self,
            operation,
        })
    }

    fn settle(&self, operation: Operation, result: &Result<Payload, OperationError>) {
        {
            let mut slots = self.slots();
            if let Some(slot) = slots.get_mut(&operation) {
                slot.state = match result {
                    Ok(payload) => OperationState::Succeeded(payload.clone()),
                    Err(error) => OperationState::Failed(error.clone()),
                };
            }
        }
        match result {
            Ok(payload) => {
                info!(%operation, "operation succeeded");
                self.presenter.show_payload(payload);
            }
            Err(error) => {
                warn!(%operation, %error, "operation failed");
                self.presenter.show_error(operation, error);
            }
        }
    }

    fn release(&self, operation: Operation) {
        let (control, unsettled) = {
            let mut slots = self.slots();
            let Some(slot) = slots.get_mut(&operation) else {
                return;
            };
            // A dropped invocation never settled; do not leave it looking busy.
            let unsettled = slot.state == OperationState::InFlight;
            if unsettled {
                slot.state = OperationState::Idle;
            }
            slot.control = ControlState::idle(operation);
            (slot.control.clone(), unsettled)
        };
        if unsettled {
            debug!(%operation, "invocation dropped before settling");
            self.presenter.clear(operation);
        }
        debug!(%operation, "control restored");
        self.presenter.control_changed(operation, &control);
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<Operation, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Holds an operation's control for one invocation and hands it back on
/// drop, whichever way the invocation ends.
struct ControlLease<'a, S: PresentationSink> {
    orchestrator: &'a RequestOrchestrator<S>,
    operation: Operation,
}

impl<S: PresentationSink> Drop for ControlLease<'_, S> {
    fn drop(&mut self) {
        self.orchestrator.release(self.operation);
    }
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
