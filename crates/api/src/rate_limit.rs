//! Rate Limiter fuer die REST-API
//!
//! Festes Zeitfenster pro Client-IP und Limit-Klasse: hoechstens `max`
//! Anfragen, danach 429 bis das Fenster ablaeuft. Das Fenster beginnt mit der
//! ersten Anfrage.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use parking_lot::Mutex;

/// Intervall fuer den Cleanup-Task
const CLEANUP_INTERVALL: Duration = Duration::from_secs(60);

/// Welche Regel fuer eine Anfrage gilt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitKlasse {
    /// Alle `/api/...`-Routen
    Allgemein,
    /// `/auth/...`, erfolgreiche Anfragen werden erstattet
    Auth,
    /// Bild-Uploads
    Upload,
}

impl LimitKlasse {
    /// `error` und `message` der 429-Antwort
    pub fn antworttexte(self) -> (&'static str, &'static str) {
        match self {
            Self::Allgemein => ("Too many requests", "Please slow down and try again later."),
            Self::Auth => ("Too many authentication attempts", "Please wait before trying again."),
            Self::Upload => ("Too many uploads", "You can upload up to 50 times per hour."),
        }
    }
}

/// Maximale Anfragen pro Zeitfenster
#[derive(Debug, Clone, Copy)]
pub struct Limit {
    pub max: u32,
    pub fenster: Duration,
}

impl Limit {
    pub const fn neu(max: u32, fenster: Duration) -> Self {
        Self { max, fenster }
    }
}

/// Konfiguration fuer den Rate Limiter
#[derive(Debug, Clone)]
pub struct RateLimitKonfig {
    pub allgemein: Limit,
    pub auth: Limit,
    pub upload: Limit,
}

impl Default for RateLimitKonfig {
    fn default() -> Self {
        Self {
            allgemein: Limit::neu(100, Duration::from_secs(15 * 60)),
            auth: Limit::neu(10, Duration::from_secs(15 * 60)),
            upload: Limit::neu(50, Duration::from_secs(60 * 60)),
        }
    }
}

impl RateLimitKonfig {
    fn limit(&self, klasse: LimitKlasse) -> Limit {
        match klasse {
            LimitKlasse::Allgemein => self.allgemein,
            LimitKlasse::Auth => self.auth,
            LimitKlasse::Upload => self.upload,
        }
    }
}

/// Zaehler einer IP in einer Klasse
#[derive(Debug)]
struct Zeitfenster {
    limit: Limit,
    beginn: Instant,
    anfragen: u32,
}

impl Zeitfenster {
    fn neu(limit: Limit) -> Self {
        Self {
            limit,
            beginn: Instant::now(),
            anfragen: 0,
        }
    }

    fn ist_abgelaufen(&self, jetzt: Instant) -> bool {
        jetzt.duration_since(self.beginn) >= self.limit.fenster
    }

    /// Zaehlt eine Anfrage. `Err` enthaelt die Sekunden bis zum neuen Fenster.
    fn zaehlen(&mut self) -> Result<(), u64> {
        let jetzt = Instant::now();
        if self.ist_abgelaufen(jetzt) {
            self.beginn = jetzt;
            self.anfragen = 0;
        }
        if self.anfragen < self.limit.max {
            self.anfragen += 1;
            return Ok(());
        }
        let rest = self.limit.fenster.saturating_sub(jetzt.duration_since(self.beginn));
        Err(rest.as_secs_f64().ceil().max(1.0) as u64)
    }

    fn erstatten(&mut self) {
        self.anfragen = self.anfragen.saturating_sub(1);
    }
}

/// Rate Limiter mit festen Zeitfenstern
pub struct RateLimiter {
    konfig: RateLimitKonfig,
    fenster: Mutex<HashMap<(LimitKlasse, String), Zeitfenster>>,
}

impl RateLimiter {
    pub fn neu(konfig: RateLimitKonfig) -> Arc<Self> {
        Arc::new(Self {
            konfig,
            fenster: Mutex::new(HashMap::new()),
        })
    }

    /// Prueft und zaehlt eine Anfrage.
    ///
    /// Gibt `Ok(())` zurueck wenn erlaubt, `Err(retry_after_secs)` sonst.
    pub fn pruefen(&self, klasse: LimitKlasse, ip: &str) -> Result<(), u64> {
        self.fenster
            .lock()
            .entry((klasse, ip.to_string()))
            .or_insert_with(|| Zeitfenster::neu(self.konfig.limit(klasse)))
            .zaehlen()
    }

    /// Nimmt eine gezaehlte Anfrage zurueck (erfolgreicher Login)
    pub fn erstatten(&self, klasse: LimitKlasse, ip: &str) {
        if let Some(f) = self.fenster.lock().get_mut(&(klasse, ip.to_string())) {
            f.erstatten();
        }
    }

    /// Entfernt abgelaufene Fenster; die naechste Anfrage beginnt ohnehin neu
    pub fn cleanup(&self) -> usize {
        let jetzt = Instant::now();
        let mut fenster = self.fenster.lock();
        let vorher = fenster.len();
        fenster.retain(|_, f| !f.ist_abgelaufen(jetzt));
        vorher - fenster.len()
    }

    pub fn anzahl_fenster(&self) -> usize {
        self.fenster.lock().len()
    }

    /// Startet den periodischen Cleanup-Task
    pub fn cleanup_starten(limiter: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let limiter = Arc::clone(limiter);
        tokio::spawn(async move {
            let mut intervall = tokio::time::interval(CLEANUP_INTERVALL);
            loop {
                intervall.tick().await;
                let entfernt = limiter.cleanup();
                if entfernt > 0 {
                    tracing::debug!(entfernt, "Abgelaufene Rate-Limit-Fenster entfernt");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max: u32) -> Arc<RateLimiter> {
        let limit = Limit::neu(max, Duration::from_secs(60));
        RateLimiter::neu(RateLimitKonfig {
            allgemein: limit,
            auth: limit,
            upload: limit,
        })
    }

    #[test]
    fn hoechstens_max_anfragen_pro_fenster() {
        let mut f = Zeitfenster::neu(Limit::neu(5, Duration::from_secs(60)));
        for _ in 0..5 {
            assert!(f.zaehlen().is_ok(), "Anfrage sollte erlaubt sein");
        }
        let retry = f.zaehlen().unwrap_err();
        assert!((1..=60).contains(&retry));

        // Kein Nachfuellen innerhalb des Fensters
        f.beginn = Instant::now() - Duration::from_secs(59);
        assert!(f.zaehlen().is_err(), "Fenster laeuft noch");
        assert_eq!(f.zaehlen().unwrap_err(), 1);
    }

    #[test]
    fn neues_fenster_nach_ablauf() {
        let mut f = Zeitfenster::neu(Limit::neu(2, Duration::from_secs(60)));
        f.zaehlen().unwrap();
        f.zaehlen().unwrap();
        assert!(f.zaehlen().is_err());

        f.beginn = Instant::now() - Duration::from_secs(60);
        assert!(f.zaehlen().is_ok());
        assert!(f.zaehlen().is_ok());
        assert!(f.zaehlen().is_err());
    }

    #[test]
    fn standardlimits() {
        let k = RateLimitKonfig::default();
        assert_eq!(k.allgemein.max, 100);
        assert_eq!(k.auth.max, 10);
        assert_eq!(k.upload.max, 50);
        assert_eq!(k.upload.fenster, Duration::from_secs(3600));
    }

    #[test]
    fn ips_und_klassen_unabhaengig() {
        let l = limiter(1);
        assert!(l.pruefen(LimitKlasse::Allgemein, "192.168.1.1").is_ok());
        assert!(l.pruefen(LimitKlasse::Allgemein, "192.168.1.2").is_ok());
        assert!(l.pruefen(LimitKlasse::Upload, "192.168.1.1").is_ok());
        let retry = l.pruefen(LimitKlasse::Allgemein, "192.168.1.1").unwrap_err();
        assert!(retry > 0);
    }

    #[test]
    fn erstattung() {
        let l = limiter(2);
        assert!(l.pruefen(LimitKlasse::Auth, "10.0.0.1").is_ok());
        assert!(l.pruefen(LimitKlasse::Auth, "10.0.0.1").is_ok());
        l.erstatten(LimitKlasse::Auth, "10.0.0.1");
        assert!(l.pruefen(LimitKlasse::Auth, "10.0.0.1").is_ok());
        assert!(l.pruefen(LimitKlasse::Auth, "10.0.0.1").is_err());
    }

    #[test]
    fn cleanup_entfernt_nur_abgelaufene_fenster() {
        let l = limiter(2);
        l.pruefen(LimitKlasse::Allgemein, "a").unwrap();
        l.pruefen(LimitKlasse::Allgemein, "b").unwrap();
        l.fenster
            .lock()
            .get_mut(&(LimitKlasse::Allgemein, "a".to_string()))
            .unwrap()
            .beginn = Instant::now() - Duration::from_secs(61);

        assert_eq!(l.anzahl_fenster(), 2);
        assert_eq!(l.cleanup(), 1);
        assert_eq!(l.anzahl_fenster(), 1);
    }

    #[test]
    fn texte() {
        assert_eq!(LimitKlasse::Allgemein.antworttexte().0, "Too many requests");
        assert_eq!(LimitKlasse::Auth.antworttexte().0, "Too many authentication attempts");
        assert_eq!(LimitKlasse::Upload.antworttexte().0, "Too many uploads");
    }
}
