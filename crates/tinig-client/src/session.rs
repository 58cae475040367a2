use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Utc};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use tinig_sky::{ContentPolicy, Denylist, Mode, Rejection, render_stars};
use tinig_types::api::{QuoteResponse, RenderedStar};
use tinig_types::events::SkyEvent;
use tinig_types::models::Star;

use crate::backend::{ClientError, SkyBackend};
use crate::cinematic::Phase;
use crate::toast::{Severity, Toast, ToastCenter};

pub const MAX_CONTENT_CHARS: usize = 280;
pub const SKY_STAR_LIMIT: u32 = 100;

pub const SEND_FAILED_MESSAGE: &str = "May problema sa pagpapadala. Subukan muli.";
pub const RESONATE_FAILED_MESSAGE: &str = "Hindi naipadala ang iyong resonate.";

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Blank text, or the form was still busy.
    Ignored,
    TooLong,
    Rejected(Rejection),
    Failed,
    Released(Star),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResonateOutcome {
    AlreadyResonated,
    /// Not in the local sky.
    Unknown,
    Resonated(u64),
    RolledBack,
}

/// "1 Resonate", "2 Resonates".
pub fn resonate_label(likes: u64) -> String {
    if likes == 1 {
        "1 Resonate".to_string()
    } else {
        format!("{} Resonates", likes)
    }
}

/// One visitor's view of the sky.
///
/// Driven from a single task. Gateway events and clock ticks are fed in
/// through [`apply_event`](Self::apply_event) and
/// [`set_clock`](Self::set_clock).
pub struct SkySession<B: SkyBackend> {
    backend: B,
    policy: Arc<dyn ContentPolicy>,
    toasts: ToastCenter,
    mode: Mode,
    stars: Vec<Star>,
    hovered: Option<String>,
    resonated: HashSet<String>,
    submitting: bool,
    released_at: Option<Instant>,
}

impl<B: SkyBackend> SkySession<B> {
    pub fn new(backend: B, local_time: NaiveTime) -> Self {
        Self::with_policy(backend, Arc::new(Denylist::default()), local_time)
    }

    pub fn with_policy(backend: B, policy: Arc<dyn ContentPolicy>, local_time: NaiveTime) -> Self {
        Self {
            backend,
            policy,
            toasts: ToastCenter::new(),
            mode: Mode::at(&local_time),
            stars: Vec::new(),
            hovered: None,
            resonated: HashSet::new(),
            submitting: false,
            released_at: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Recompute the mode. Returns `true` if it flipped; the stars are
    /// reloaded when night falls.
    pub async fn set_clock(&mut self, local_time: NaiveTime) -> bool {
        let mode = Mode::at(&local_time);
        if mode == self.mode {
            return false;
        }
        self.switch_mode(mode).await;
        true
    }

    async fn switch_mode(&mut self, mode: Mode) {
        info!("Sky turned {:?}", mode);
        self.mode = mode;
        if mode.is_night() {
            if let Err(e) = self.refresh_stars().await {
                warn!("Failed to load stars at nightfall: {}", e);
            }
        }
    }

    /// Reload the most recent stars. Does nothing during the day.
    pub async fn refresh_stars(&mut self) -> Result<(), ClientError> {
        if !self.mode.is_night() {
            return Ok(());
        }
        let stars = self.backend.recent_stars(SKY_STAR_LIMIT).await?;
        debug!("Loaded {} stars", stars.len());
        self.stars = stars;
        Ok(())
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Stars to draw at `now`, dead ones left out.
    pub fn visible_stars(&self, now: DateTime<Utc>) -> Vec<RenderedStar> {
        if !self.mode.is_night() {
            return Vec::new();
        }
        render_stars(&self.stars, now)
    }

    pub fn hover(&mut self, star_id: Option<&str>) {
        self.hovered = star_id.map(str::to_string);
    }

    pub fn hovered(&self) -> Option<&Star> {
        let id = self.hovered.as_deref()?;
        self.stars.iter().find(|s| s.id == id)
    }

    pub fn has_resonated(&self, star_id: &str) -> bool {
        self.resonated.contains(star_id)
    }

    /// Live-check text while it is being typed.
    pub fn check(&self, text: &str) -> Result<(), Rejection> {
        self.policy.check(text)
    }

    pub async fn submit(&mut self, text: &str) -> SubmitOutcome {
        let content = text.trim();
        if content.is_empty() || !self.phase().accepts_input() {
            return SubmitOutcome::Ignored;
        }
        if content.chars().count() > MAX_CONTENT_CHARS {
            return SubmitOutcome::TooLong;
        }
        if let Err(rejection) = self.policy.check(content) {
            self.toasts.show(rejection.message, Severity::Error);
            return SubmitOutcome::Rejected(rejection);
        }

        self.submitting = true;
        let result = self.backend.release_star(content).await;
        self.submitting = false;

        match result {
            Ok(star) => {
                info!("Released star {}", star.id);
                self.released_at = Some(Instant::now());
                if let Err(e) = self.refresh_stars().await {
                    warn!("Failed to reload stars after release: {}", e);
                }
                SubmitOutcome::Released(star)
            }
            Err(e) => {
                warn!("Failed to release star: {}", e);
                self.toasts.show(SEND_FAILED_MESSAGE, Severity::Error);
                SubmitOutcome::Failed
            }
        }
    }

    /// Current step of the release animation.
    pub fn phase(&self) -> Phase {
        if self.submitting {
            return Phase::Submitting;
        }
        match self.released_at {
            Some(at) => Phase::at(at.elapsed()),
            None => Phase::Idle,
        }
    }

    /// Resonate once with a star, showing the new count immediately.
    pub async fn resonate(&mut self, star_id: &str) -> ResonateOutcome {
        if self.resonated.contains(star_id) {
            return ResonateOutcome::AlreadyResonated;
        }
        let Some(star) = self.star_mut(star_id) else {
            return ResonateOutcome::Unknown;
        };
        star.likes += 1;
        self.resonated.insert(star_id.to_string());

        match self.backend.resonate(star_id).await {
            Ok(reply) => {
                if let Some(star) = self.star_mut(star_id) {
                    star.likes = reply.likes;
                }
                ResonateOutcome::Resonated(reply.likes)
            }
            Err(e) => {
                warn!("Resonate on {} failed: {}", star_id, e);
                if let Some(star) = self.star_mut(star_id) {
                    star.likes = star.likes.saturating_sub(1);
                }
                self.resonated.remove(star_id);
                self.toasts.show(RESONATE_FAILED_MESSAGE, Severity::Error);
                ResonateOutcome::RolledBack
            }
        }
    }

    fn star_mut(&mut self, star_id: &str) -> Option<&mut Star> {
        self.stars.iter_mut().find(|s| s.id == star_id)
    }

    /// Fold a gateway event into the local sky.
    pub async fn apply_event(&mut self, event: &SkyEvent) {
        match event {
            SkyEvent::StarCreate { star } => {
                if self.mode.is_night() && self.star_mut(&star.id).is_none() {
                    self.stars.insert(0, star.clone());
                    self.stars.truncate(SKY_STAR_LIMIT as usize);
                }
            }
            SkyEvent::StarResonate { id, likes } => {
                if let Some(star) = self.star_mut(id) {
                    star.likes = star.likes.max(*likes);
                }
            }
            SkyEvent::ModeChange { night } => {
                let mode = if *night { Mode::Night } else { Mode::Day };
                if mode != self.mode {
                    self.switch_mode(mode).await;
                }
            }
            SkyEvent::ShootingStar { .. } | SkyEvent::BirdFlight { .. } => {}
        }
    }

    /// Today's quote, or `None` if the server could not be reached.
    pub async fn load_quote(&self) -> Option<QuoteResponse> {
        match self.backend.daily_quote().await {
            Ok(quote) => Some(quote),
            Err(e) => {
                warn!("Failed to load daily quote: {}", e);
                None
            }
        }
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.active()
    }

    pub fn toast_center(&self) -> &ToastCenter {
        &self.toasts
    }
}

impl<B: SkyBackend> Drop for SkySession<B> {
    fn drop(&mut self) {
        self.toasts.shutdown();
    }
}
