use super::*;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use shared::domain::DrawNumber;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct ServerState {
    verify_bodies: Arc<Mutex<Vec<Value>>>,
    suggestion_bodies: Arc<Mutex<Vec<Value>>>,
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

fn draw_json(number: u32) -> Value {
    json!({
        "numero": number,
        "dataApuracao": "10/05/2024",
        "localSorteio": "ESPAÇO DA SORTE",
        "listaDezenas": ["03", "14", "22", "41", "57", "63", "80"],
        "nomeTimeCoracaoMesSorte": "FLAMENGO/RJ",
        "acumulado": 0,
        "valorArrecadado": 1234.5,
        "numeroConcursoProximo": number + 1,
        "dataProximoConcurso": "13/05/2024",
        "valorEstimadoProximoConcurso": 3500000.0
    })
}

async fn handle_verify(
    State(state): State<ServerState>,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.verify_bodies.lock().expect("lock").push(body);
    Json(json!({
        "sucesso": true,
        "concurso": 2500,
        "data": "10/05/2024",
        "numeros_sorteados": ["01", "02", "03", "04", "05", "40", "50"],
        "numeros_acertados": [1, 2, 3, 4, 5],
        "acertos": 5,
        "acertou_time": false,
        "time_sorteado": "VASCO DA GAMA/RJ",
        "faixa_premio": "5 acertos",
        "premiado": true
    }))
}

async fn handle_suggestions(
    State(state): State<ServerState>,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.suggestion_bodies.lock().expect("lock").push(body);
    Json(json!({
        "sucesso": true,
        "palpites": [{
            "estrategia": "mista",
            "numeros": [1, 5, 9, 13, 17, 21, 25, 29, 33, 37],
            "time_coracao": {"time": "BAHIA/BA", "motivo": "Time mais atrasado", "atraso": 40}
        }]
    }))
}

async fn handle_history(
    State(state): State<ServerState>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    state.queries.lock().expect("lock").push(query);
    Json(json!({"sucesso": true, "total": 2, "resultados": [draw_json(2), draw_json(1)]}))
}

async fn handle_draw(Path(number): Path<u32>) -> (StatusCode, Json<Value>) {
    if number == 404 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!(ServiceFailure::new("Concurso 404 não encontrado"))),
        );
    }
    (
        StatusCode::OK,
        Json(json!({"sucesso": true, "resultado": draw_json(number)})),
    )
}

async fn spawn_service() -> anyhow::Result<(Url, ServerState)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = ServerState::default();
    let app = Router::new()
        .route(
            "/api/atualizar",
            post(|| async { Json(json!({"sucesso": true, "novos": 3, "total_cadastrados": 120})) }),
        )
        .route(
            "/api/ultimo-resultado",
            get(|| async { Json(json!({"sucesso": true, "resultado": draw_json(2210)})) }),
        )
        .route(
            "/api/estatisticas",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "<html>boom</html>") }),
        )
        .route(
            "/api/estatisticas/times-coracao",
            get(|| async {
                Json(json!({
                    "sucesso": true,
                    "estatisticas": {
                        "frequencia": [{"time": "FLAMENGO/RJ", "frequencia": 12}],
                        "mais_sorteados": [{"time": "FLAMENGO/RJ", "frequencia": 12}],
                        "mais_atrasados": [{"time": "BAHIA/BA", "atraso": 40}]
                    }
                }))
            }),
        )
        .route(
            "/api/sugerir-time-coracao",
            get(|Query(query): Query<HashMap<String, String>>| async move {
                Json(json!({
                    "sucesso": true,
                    "time": {
                        "time": format!("TIME-{}", query.get("estrategia").cloned().unwrap_or_default()),
                        "motivo": "Time mais sorteado recentemente",
                        "frequencia": 9
                    }
                }))
            }),
        )
        .route(
            "/api/health",
            get(|| async { Json(json!({"status": "online", "total_concursos": 10})) }),
        )
        .route("/api/resultado/:numero", get(handle_draw))
        .route("/api/resultados", get(handle_history))
        .route("/api/conferir", post(handle_verify))
        .route("/api/gerar-palpite", post(handle_suggestions))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let base = Url::parse(&format!("http://{addr}/api/"))?;
    Ok((base, state))
}

#[test]
fn decode_accepts_success_envelope() {
    let summary: RefreshSummary = decode_envelope(
        200,
        br#"{"sucesso": true, "novos": 3, "total_cadastrados": 120}"#,
    )
    .expect("decode");
    assert_eq!(summary.new_draws, 3);
    assert_eq!(summary.total_stored, 120);
}

#[test]
fn decode_reports_service_failure_with_message_even_on_error_status() {
    let error = decode_envelope::<RefreshSummary>(
        500,
        br#"{"sucesso": false, "mensagem": "Erro ao atualizar base: timeout"}"#,
    )
    .expect_err("service failure");
    assert_eq!(
        error,
        OperationError::Service {
            message: Some("Erro ao atualizar base: timeout".into())
        }
    );
    assert!(error.is_service());
}

#[test]
fn decode_service_failure_without_message_keeps_it_absent() {
    let error = decode_envelope::<RefreshSummary>(200, br#"{"sucesso": false, "mensagem": " "}"#)
        .expect_err("service failure");
    assert_eq!(error, OperationError::Service { message: None });
}

#[test]
fn decode_distinguishes_transport_failures() {
    assert_eq!(
        decode_envelope::<RefreshSummary>(502, b"Bad Gateway"),
        Err(TransportError::Status(502).into())
    );
    assert!(matches!(
        decode_envelope::<RefreshSummary>(200, b"{not json"),
        Err(OperationError::Transport(TransportError::Malformed(_)))
    ));
    assert_eq!(
        decode_envelope::<RefreshSummary>(200, br#"{"novos": 1, "total_cadastrados": 2}"#),
        Err(TransportError::MissingSuccessFlag.into())
    );
    assert!(matches!(
        decode_envelope::<RefreshSummary>(200, br#"{"sucesso": true, "novos": "many"}"#),
        Err(OperationError::Transport(TransportError::Malformed(_)))
    ));
    assert_eq!(
        decode_envelope::<RefreshSummary>(503, br#"{"detail": "down"}"#),
        Err(TransportError::Status(503).into())
    );
}

#[tokio::test]
async fn http_service_reads_typed_payloads() {
    let (base, _state) = spawn_service().await.expect("spawn service");
    let service = HttpLotteryService::new(&base);
    assert!(!service.base_url().ends_with('/'));

    let summary = service.refresh().await.expect("refresh");
    assert_eq!(summary.total_stored, 120);

    let latest = service.latest_result().await.expect("latest");
    assert_eq!(latest.draw_id, DrawId(2210));
    assert_eq!(latest.numbers.first().map(|n| n.get()), Some(3));
    assert!(!latest.rolled_over);

    let teams = service.team_statistics().await.expect("team stats");
    assert_eq!(teams.most_overdue[0].delay, 40);

    let pick = service.suggest_team(Strategy::Overdue).await.expect("pick");
    assert_eq!(pick.team, "TIME-atrasados");
    assert_eq!(pick.frequency, Some(9));
}

#[tokio::test]
async fn http_service_posts_request_bodies_with_service_field_names() {
    let (base, state) = spawn_service().await.expect("spawn service");
    let service = HttpLotteryService::new(&base);

    let request = VerificationRequest {
        numbers: (1..=10).map(|n| DrawNumber::new(n).expect("in range")).collect(),
        team: "Flamengo".into(),
        draw_id: DrawId(2500),
    };
    let outcome = service.verify(&request).await.expect("verify");
    assert_eq!(outcome.hits, 5);
    assert_eq!(outcome.prize_tier.as_deref(), Some("5 acertos"));
    assert_eq!(
        state.verify_bodies.lock().expect("lock").as_slice(),
        &[json!({
            "numeros": [1, 2, 3, 4, 5, 6, 7, 8, 9, 10],
            "time_coracao": "Flamengo",
            "numero_concurso": 2500
        })]
    );

    let suggestions = service
        .generate_suggestions(&SuggestionRequest {
            strategy: Strategy::Mixed,
            numbers_per_game: 10,
            games: 1,
        })
        .await
        .expect("suggestions");
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].team.delay, Some(40));
    assert_eq!(
        state.suggestion_bodies.lock().expect("lock").as_slice(),
        &[json!({"estrategia": "mista", "quantidade_numeros": 10, "quantidade_jogos": 1})]
    );
}

#[tokio::test]
async fn http_service_passes_history_limit_and_draw_number() {
    let (base, state) = spawn_service().await.expect("spawn service");
    let service = HttpLotteryService::new(&base);

    let history = service.draw_history(Some(2)).await.expect("history");
    assert_eq!(history.total, 2);
    assert_eq!(history.results[0].draw_id, DrawId(2));
    assert_eq!(
        state.queries.lock().expect("lock")[0].get("limite").map(String::as_str),
        Some("2")
    );

    let draw = service.draw(DrawId(77)).await.expect("draw");
    assert_eq!(draw.draw_id, DrawId(77));

    let missing = service.draw(DrawId(404)).await.expect_err("not found");
    assert_eq!(
        missing,
        OperationError::Service {
            message: Some("Concurso 404 não encontrado".into())
        }
    );
}

#[tokio::test]
async fn http_service_maps_error_pages_and_missing_flags_to_transport_errors() {
    let (base, _state) = spawn_service().await.expect("spawn service");
    let service = HttpLotteryService::new(&base);

    assert_eq!(
        service.statistics().await,
        Err(TransportError::Status(500).into())
    );
    assert_eq!(
        service.health().await,
        Err(TransportError::MissingSuccessFlag.into())
    );
}

#[tokio::test]
async fn unreachable_service_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let base = Url::parse(&format!("http://{addr}/api")).expect("base url");
    let service = HttpLotteryService::with_timeout(&base, Duration::from_secs(2)).expect("client");
    let error = service.latest_result().await.expect_err("unreachable");
    assert!(matches!(
        error,
        OperationError::Transport(TransportError::Network(_))
    ));
}
