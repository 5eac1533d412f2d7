//! Request-Timing Middleware fuer Axum
//!
//! Misst die Antwortzeit jeder HTTP-Anfrage, protokolliert sie als
//! strukturiertes Log-Event und traegt sie in die Prometheus-Metriken ein.

use axum::{
    body::Body,
    extract::State,
    http::{Request, Response},
    middleware::Next,
};
use std::time::Instant;

use crate::metrics::EchoSpriteMetrics;

/// Axum-Middleware-Funktion: misst Antwortzeit, loggt und zaehlt.
///
/// Verwendung:
/// ```ignore
/// Router::new()
///     .route("/", get(handler))
///     .layer(axum::middleware::from_fn_with_state(metriken, timing_middleware))
/// ```
pub async fn timing_middleware(
    State(metriken): State<EchoSpriteMetrics>,
    req: Request<Body>,
    next: Next,
) -> Response<Body> {
    let methode = req.method().to_string();
    let pfad = req.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(req).await;

    let dauer = start.elapsed();
    let status = response.status().as_u16();
    metriken.anfrage_erfassen(&methode, status, dauer.as_secs_f64());

    if status >= 500 {
        tracing::error!(
            method = %methode,
            path = %pfad,
            status,
            duration_ms = dauer.as_millis(),
            bucket = dauer_bucket(dauer.as_millis() as u64),
            "HTTP-Anfrage fehlgeschlagen"
        );
    } else {
        tracing::info!(
            method = %methode,
            path = %pfad,
            status,
            duration_ms = dauer.as_millis(),
            bucket = dauer_bucket(dauer.as_millis() as u64),
            "HTTP-Anfrage abgeschlossen"
        );
    }

    response
}

/// Gibt den Log-Bucket fuer eine Dauer (in ms) zurueck.
pub fn dauer_bucket(dauer_ms: u64) -> &'static str {
    match dauer_ms {
        0..=5 => "<=5ms",
        6..=25 => "<=25ms",
        26..=100 => "<=100ms",
        101..=500 => "<=500ms",
        501..=1000 => "<=1s",
        _ => ">1s",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};
    use tower::ServiceExt;

    #[test]
    fn buckets() {
        assert_eq!(dauer_bucket(0), "<=5ms");
        assert_eq!(dauer_bucket(25), "<=25ms");
        assert_eq!(dauer_bucket(26), "<=100ms");
        assert_eq!(dauer_bucket(1000), "<=1s");
        assert_eq!(dauer_bucket(1001), ">1s");
    }

    #[tokio::test]
    async fn middleware_zaehlt_anfragen() {
        let metriken = EchoSpriteMetrics::neu().unwrap();
        let app = Router::new()
            .route("/ok", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn_with_state(
                metriken.clone(),
                timing_middleware,
            ));

        let antwort = app
            .clone()
            .oneshot(Request::get("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(antwort.status(), StatusCode::OK);

        let antwort = app
            .oneshot(Request::get("/fehlt").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(antwort.status(), StatusCode::NOT_FOUND);

        assert_eq!(
            metriken.http_requests_total.with_label_values(&["GET", "200"]).get(),
            1
        );
        assert_eq!(
            metriken.http_requests_total.with_label_values(&["GET", "404"]).get(),
            1
        );
    }
}
