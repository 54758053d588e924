use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{DrawId, DrawNumber, Strategy};

/// Body of `POST /conferir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRequest {
    #[serde(rename = "numeros")]
    pub numbers: BTreeSet<DrawNumber>,
    #[serde(rename = "time_coracao")]
    pub team: String,
    #[serde(rename = "numero_concurso")]
    pub draw_id: DrawId,
}

/// Body of `POST /gerar-palpite`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionRequest {
    #[serde(rename = "estrategia")]
    pub strategy: Strategy,
    #[serde(rename = "quantidade_numeros")]
    pub numbers_per_game: u8,
    #[serde(rename = "quantidade_jogos")]
    pub games: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshSummary {
    #[serde(rename = "novos")]
    pub new_draws: u32,
    #[serde(rename = "total_cadastrados")]
    pub total_stored: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawResult {
    #[serde(rename = "numero")]
    pub draw_id: DrawId,
    #[serde(rename = "dataApuracao", default)]
    pub draw_date: Option<String>,
    #[serde(rename = "localSorteio", default)]
    pub location: Option<String>,
    #[serde(rename = "listaDezenas")]
    pub numbers: Vec<DrawNumber>,
    #[serde(rename = "nomeTimeCoracaoMesSorte", default)]
    pub team: Option<String>,
    #[serde(rename = "acumulado", default, deserialize_with = "flag")]
    pub rolled_over: bool,
    #[serde(rename = "valorArrecadado", default)]
    pub amount_collected: Option<f64>,
    #[serde(rename = "numeroConcursoProximo", default)]
    pub next_draw_id: Option<DrawId>,
    #[serde(rename = "dataProximoConcurso", default)]
    pub next_draw_date: Option<String>,
    #[serde(rename = "valorEstimadoProximoConcurso", default)]
    pub next_estimated_prize: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestResultResponse {
    #[serde(rename = "resultado")]
    pub result: DrawResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawHistory {
    pub total: u32,
    #[serde(rename = "resultados")]
    pub results: Vec<DrawResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberFrequency {
    #[serde(rename = "numero")]
    pub number: DrawNumber,
    #[serde(rename = "frequencia")]
    pub frequency: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberDelay {
    #[serde(rename = "numero")]
    pub number: DrawNumber,
    #[serde(rename = "atraso")]
    pub delay: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParityBreakdown {
    #[serde(rename = "pares")]
    pub even: u32,
    #[serde(rename = "impares")]
    pub odd: u32,
    #[serde(rename = "percentual_pares")]
    pub even_percent: f64,
    #[serde(rename = "percentual_impares")]
    pub odd_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeFrequency {
    #[serde(rename = "faixa")]
    pub range: String,
    #[serde(rename = "frequencia")]
    pub frequency: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigitFrequency {
    #[serde(rename = "digito")]
    pub digit: u8,
    #[serde(rename = "frequencia")]
    pub frequency: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRanking {
    #[serde(rename = "posicao")]
    pub position: u32,
    #[serde(rename = "numeros")]
    pub numbers: Vec<NumberFrequency>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamFrequency {
    #[serde(rename = "time")]
    pub team: String,
    #[serde(rename = "frequencia")]
    pub frequency: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamDelay {
    #[serde(rename = "time")]
    pub team: String,
    #[serde(rename = "atraso")]
    pub delay: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStatistics {
    #[serde(rename = "frequencia", default)]
    pub frequency: Vec<TeamFrequency>,
    #[serde(rename = "mais_sorteados", default)]
    pub most_drawn: Vec<TeamFrequency>,
    #[serde(rename = "mais_atrasados", default)]
    pub most_overdue: Vec<TeamDelay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStatisticsResponse {
    #[serde(rename = "estatisticas")]
    pub statistics: TeamStatistics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    #[serde(rename = "total_concursos")]
    pub total_draws: u32,
    #[serde(rename = "frequencia_numeros")]
    pub number_frequency: Vec<NumberFrequency>,
    #[serde(rename = "atrasos")]
    pub number_delays: Vec<NumberDelay>,
    #[serde(rename = "pares_impares")]
    pub parity: ParityBreakdown,
    #[serde(rename = "por_faixa")]
    pub by_range: Vec<RangeFrequency>,
    #[serde(rename = "por_posicao")]
    pub by_position: Vec<PositionRanking>,
    #[serde(rename = "por_digito", default, skip_serializing_if = "Option::is_none")]
    pub by_digit: Option<Vec<DigitFrequency>>,
    #[serde(rename = "times_coracao", default, skip_serializing_if = "Option::is_none")]
    pub teams: Option<TeamStatistics>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsResponse {
    #[serde(rename = "estatisticas")]
    pub statistics: StatisticsSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamPick {
    #[serde(rename = "time")]
    pub team: String,
    #[serde(rename = "motivo")]
    pub reason: String,
    #[serde(rename = "frequencia", default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<u32>,
    #[serde(rename = "atraso", default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "estrategia")]
    pub strategy: String,
    #[serde(rename = "numeros")]
    pub numbers: Vec<DrawNumber>,
    #[serde(rename = "time_coracao")]
    pub team: TeamPick,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionSet {
    #[serde(rename = "palpites")]
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSuggestionResponse {
    #[serde(rename = "time")]
    pub pick: TeamPick,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    #[serde(rename = "concurso")]
    pub draw_id: DrawId,
    #[serde(rename = "data", default)]
    pub draw_date: Option<String>,
    #[serde(rename = "numeros_sorteados")]
    pub drawn: Vec<DrawNumber>,
    #[serde(rename = "numeros_acertados")]
    pub matched: Vec<DrawNumber>,
    #[serde(rename = "acertos")]
    pub hits: u32,
    #[serde(rename = "acertou_time", deserialize_with = "flag")]
    pub team_matched: bool,
    #[serde(rename = "time_sorteado", default)]
    pub drawn_team: Option<String>,
    #[serde(rename = "faixa_premio", default)]
    pub prize_tier: Option<String>,
    #[serde(rename = "premiado", default, skip_serializing_if = "Option::is_none")]
    pub awarded: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(rename = "total_concursos")]
    pub total_draws: u32,
    #[serde(rename = "ultimo_concurso", default)]
    pub latest_draw: Option<DrawId>,
}

/// Boolean the service may store as `0`/`1`; `null` reads as `false`.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawFlag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Option::<RawFlag>::deserialize(deserializer)? {
        Some(RawFlag::Bool(value)) => value,
        Some(RawFlag::Int(value)) => value != 0,
        None => false,
    })
}
