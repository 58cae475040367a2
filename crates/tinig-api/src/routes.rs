use axum::{
    Json, Router,
    extract::{State, WebSocketUpgrade},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use tinig_gateway::connection;
use tinig_sky::Mode;

use crate::state::AppState;
use crate::{quotes, sky, stars};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/daily-quote", get(quotes::daily_quote))
        .route("/api/stars", get(stars::list_stars).post(stars::create_star))
        .route("/api/stars/{star_id}/resonate", post(stars::resonate))
        .route("/api/sky", get(sky::current_sky))
        .route("/gateway", get(ws_upgrade))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    let night = Mode::at(&state.clock.local_time()).is_night();
    let dispatcher = state.dispatcher.clone();
    ws.on_upgrade(move |socket| connection::handle_connection(socket, dispatcher, night))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use axum::body::{self, Body};
    use axum::http::{Request, StatusCode};
    use chrono::Duration;
    use serde::de::DeserializeOwned;
    use serde_json::Value;
    use tokio_tungstenite::tungstenite::Message as WsMessage;
    use tower::ServiceExt;

    use tinig_sky::Clock;
    use tinig_types::api::{QuoteResponse, ResonateResponse, SkyResponse};
    use tinig_types::events::SkyEvent;
    use tinig_types::models::Star;

    use super::*;
    use crate::state::testing::{Harness, ScriptedGenerator, at, harness};

    fn day() -> Harness {
        harness(at(2026, 10, 14, 10, 0), ScriptedGenerator::numbered())
    }

    fn night() -> Harness {
        harness(at(2026, 10, 14, 21, 0), ScriptedGenerator::numbered())
    }

    async fn call(state: &AppState, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = router(state.clone()).oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(state: &AppState, uri: &str) -> (StatusCode, T) {
        let (status, bytes) = call(state, Request::get(uri).body(Body::empty()).unwrap()).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post_star(state: &AppState, content: &str) -> (StatusCode, Value) {
        let req = Request::post("/api/stars")
            .header("content-type", "application/json")
            .body(Body::from(json!({ "content": content }).to_string()))
            .unwrap();
        let (status, bytes) = call(state, req).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post_raw(state: &AppState, body: &'static str) -> (StatusCode, Value) {
        let req = Request::post("/api/stars")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let (status, bytes) = call(state, req).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn resonate(state: &AppState, id: &str) -> (StatusCode, Vec<u8>) {
        let req = Request::post(format!("/api/stars/{}/resonate", id))
            .body(Body::empty())
            .unwrap();
        call(state, req).await
    }

    fn star_count(state: &AppState) -> i64 {
        state
            .db
            .with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM stars", [], |r| r.get(0))?))
            .unwrap()
    }

    #[tokio::test]
    async fn create_star_stores_and_places() {
        let h = day();
        let (status, body) = post_star(&h.state, "  Sana marinig mo ako.  ").await;

        assert_eq!(status, StatusCode::CREATED);
        let star: Star = serde_json::from_value(body).unwrap();
        assert_eq!(star.content, "Sana marinig mo ako.");
        assert_eq!(star.likes, 0);
        assert!((10..=89).contains(&star.pos_x));
        assert!((10..=89).contains(&star.pos_y));
        assert_eq!(star_count(&h.state), 1);
    }

    #[tokio::test]
    async fn denylisted_star_is_refused_without_writing() {
        let h = day();
        let (status, body) = post_star(&h.state, "ang g4aag0 mo").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], tinig_sky::filter::REJECTION_MESSAGE);
        assert_eq!(star_count(&h.state), 0);
    }

    #[tokio::test]
    async fn empty_and_oversized_stars_are_bad_requests() {
        let h = day();
        assert_eq!(post_star(&h.state, "   ").await.0, StatusCode::BAD_REQUEST);
        assert_eq!(post_star(&h.state, &"a".repeat(281)).await.0, StatusCode::BAD_REQUEST);
        assert_eq!(post_star(&h.state, &"ñ".repeat(280)).await.0, StatusCode::CREATED);
        assert_eq!(star_count(&h.state), 1);
    }

    #[tokio::test]
    async fn unreadable_bodies_are_json_bad_requests() {
        let h = day();
        for body in [r#"{"content":"#, r#"{"content":"hi","x":1}"#, r#"{"text":"hi"}"#] {
            let (status, reply) = post_raw(&h.state, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
            assert!(reply["error"].is_string(), "body {}", body);
        }
        assert_eq!(star_count(&h.state), 0);
    }

    #[tokio::test]
    async fn bad_limit_is_a_json_bad_request() {
        let h = day();
        let (status, reply): (_, Value) = get_json(&h.state, "/api/stars?limit=-1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(reply["error"].is_string());
    }

    #[tokio::test]
    async fn gateway_greets_then_relays() {
        let h = night();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(h.state.clone());
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{}/gateway", addr))
            .await
            .unwrap();
        assert_eq!(next_event(&mut ws).await, SkyEvent::ModeChange { night: true });

        let (_, body) = post_star(&h.state, "dumating ka rin").await;
        match next_event(&mut ws).await {
            SkyEvent::StarCreate { star } => {
                assert_eq!(star.id, body["id"]);
                assert_eq!(star.content, "dumating ka rin");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    async fn next_event<S>(ws: &mut S) -> SkyEvent
    where
        S: futures_util::Stream<Item = Result<WsMessage, tokio_tungstenite::tungstenite::Error>> + Unpin,
    {
        use futures_util::StreamExt;
        loop {
            match ws.next().await.unwrap().unwrap() {
                WsMessage::Text(text) => return serde_json::from_str(text.as_str()).unwrap(),
                _ => continue,
            }
        }
    }

    #[tokio::test]
    async fn new_star_is_broadcast() {
        let h = day();
        let mut rx = h.state.dispatcher.subscribe();

        let (_, body) = post_star(&h.state, "para sa langit").await;
        match rx.recv().await.unwrap() {
            SkyEvent::StarCreate { star } => assert_eq!(star.id, body["id"]),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn list_is_newest_first_and_limited() {
        let h = day();
        for (id, ts) in [
            ("a", "2026-10-13T01:00:00.000Z"),
            ("b", "2026-10-14T01:00:00.000Z"),
            ("c", "2026-10-12T01:00:00.000Z"),
        ] {
            h.state
                .db
                .with_conn(|conn| {
                    conn.execute(
                        "INSERT INTO stars (id, content, pos_x, pos_y, created_at) VALUES (?1, 'x', 50, 50, ?2)",
                        (id, ts),
                    )?;
                    Ok(())
                })
                .unwrap();
        }

        let (status, stars): (_, Vec<Star>) = get_json(&h.state, "/api/stars?limit=2").await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = stars.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn resonate_counts_up() {
        let h = day();
        let (_, body) = post_star(&h.state, "isang hiling").await;
        let id = body["id"].as_str().unwrap().to_string();

        resonate(&h.state, &id).await;
        let (status, bytes) = resonate(&h.state, &id).await;
        assert_eq!(status, StatusCode::OK);
        let reply: ResonateResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(reply, ResonateResponse { id, likes: 2 });
    }

    #[tokio::test]
    async fn resonate_unknown_star_is_404() {
        let h = day();
        assert_eq!(resonate(&h.state, "nope").await.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn daytime_sky_has_no_stars() {
        let h = day();
        post_star(&h.state, "nasa araw").await;

        let (status, sky): (_, SkyResponse) = get_json(&h.state, "/api/sky").await;
        assert_eq!(status, StatusCode::OK);
        assert!(!sky.night);
        assert!(sky.stars.is_empty());
        assert_eq!(sky.sky_color, "#38bdf8");
        assert_eq!(sky.celestial_rotation, -30.0);
    }

    #[tokio::test]
    async fn night_sky_hides_dead_stars() {
        let h = night();
        let now = h.clock.now();
        for (id, content, created) in [
            ("fresh", "buhay pa", now - Duration::minutes(5)),
            ("old", "wala na", now - Duration::hours(80)),
        ] {
            let created = created.to_rfc3339();
            h.state
                .db
                .with_conn(|conn| {
                    conn.execute(
                        "INSERT INTO stars (id, content, pos_x, pos_y, created_at) VALUES (?1, ?2, 50, 50, ?3)",
                        (id, content, &created),
                    )?;
                    Ok(())
                })
                .unwrap();
        }

        let (_, sky): (_, SkyResponse) = get_json(&h.state, "/api/sky").await;
        assert!(sky.night);
        assert_eq!(sky.stars.len(), 1);
        assert_eq!(sky.stars[0].star.content, "buhay pa");
        assert!(sky.stars[0].life_force > 0.99);
    }

    #[tokio::test]
    async fn daily_quote_endpoint_answers() {
        let h = day();
        let (status, quote): (_, QuoteResponse) = get_json(&h.state, "/api/daily-quote").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(quote.author, "Kalawakan");
    }

    #[tokio::test]
    async fn health_is_ok() {
        let h = day();
        let (status, body): (_, Value) = get_json(&h.state, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
