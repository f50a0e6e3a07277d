//! Session/presence controller.
//!
//! Two states, `SignedOut` and `SignedIn`. Everything that belongs to a
//! signed-in user (hours, baseline, heartbeat, admin directory) lives in
//! [`SignedInSession`] and is dropped on sign-out.

use crate::config::Config;
use crate::core::admin::{AdminDirectory, RefreshOutcome};
use crate::core::calendar::CalendarMonth;
use crate::core::heartbeat::Heartbeat;
use crate::core::hours::{HoursMap, HoursPolicy, ResetConfirmed};
use crate::core::projector::{Projection, Projector};
use crate::core::status::SyncStatus;
use crate::errors::{AppError, AppResult};
use crate::models::identity::{Claims, Identity};
use crate::models::profile::ProfilePatch;
use crate::remote::{Backend, RemoteGateway};
use chrono::NaiveDate;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub policy: HoursPolicy,
    pub projector: Projector,
    pub heartbeat_interval: Duration,
    pub presence_stale: chrono::Duration,
}

impl SessionSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            policy: HoursPolicy::from_config(cfg),
            projector: Projector::from_config(cfg),
            heartbeat_interval: Duration::from_secs(cfg.heartbeat_interval_secs),
            presence_stale: chrono::Duration::seconds(cfg.presence_stale_secs),
        }
    }
}

#[derive(Debug)]
pub struct SignedInSession {
    pub identity: Identity,
    pub claims: Claims,
    hours: HoursMap,
    /// False while the stored hours could not be read.
    hours_loaded: bool,
    previous_hours: f64,
    heartbeat: Heartbeat,
    admin: Option<AdminDirectory>,
}

#[derive(Debug)]
pub enum SessionState {
    SignedOut,
    SignedIn(Box<SignedInSession>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub email: Option<String>,
    pub in_system_hours: f64,
    pub previous_hours: f64,
    pub total_hours: f64,
    pub goal_hours: f64,
    pub recorded_days: usize,
    pub projection: Projection,
}

#[derive(Debug)]
pub enum RegisterOutcome {
    SignedIn,
    /// Account created but the follow-up sign-in failed.
    CreatedOnly(AppError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub heartbeat_sent: bool,
    pub presence_updates: usize,
}

pub struct SessionController<'a, B: Backend> {
    backend: &'a B,
    gateway: RemoteGateway<'a, B>,
    settings: SessionSettings,
    state: SessionState,
}

impl<'a, B: Backend> SessionController<'a, B> {
    pub fn new(backend: &'a B, settings: SessionSettings) -> Self {
        Self {
            backend,
            gateway: RemoteGateway::new(backend),
            settings,
            state: SessionState::SignedOut,
        }
    }

    pub fn backend(&self) -> &'a B {
        self.backend
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self.state, SessionState::SignedIn(_))
    }

    pub fn status(&self) -> &SyncStatus {
        self.gateway.status()
    }

    fn session(&self) -> AppResult<&SignedInSession> {
        match &self.state {
            SessionState::SignedIn(s) => Ok(s),
            SessionState::SignedOut => Err(AppError::NotSignedIn),
        }
    }

    fn session_mut(&mut self) -> AppResult<&mut SignedInSession> {
        match &mut self.state {
            SessionState::SignedIn(s) => Ok(s),
            SessionState::SignedOut => Err(AppError::NotSignedIn),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.session().ok().map(|s| &s.identity)
    }

    pub fn is_admin(&self) -> bool {
        self.session().map(|s| s.claims.admin).unwrap_or(false)
    }

    pub fn hours(&self) -> AppResult<&HoursMap> {
        self.session().map(|s| &s.hours)
    }

    pub fn previous_hours(&self) -> AppResult<f64> {
        self.session().map(|s| s.previous_hours)
    }

    pub fn heartbeat(&self) -> Option<&Heartbeat> {
        self.session().ok().map(|s| &s.heartbeat)
    }

    // ------------------------------------------------
    // Transitions
    // ------------------------------------------------

    /// Create a credential, then sign in with it.
    pub fn register(&mut self, email: &str, password: &str, now: Instant) -> AppResult<RegisterOutcome> {
        self.backend.create_account(email, password)?;

        match self.sign_in(email, password, now) {
            Ok(()) => Ok(RegisterOutcome::SignedIn),
            Err(e) => {
                self.backend.record("register", email, &format!("sign-in after sign-up failed: {}", e));
                Ok(RegisterOutcome::CreatedOnly(e))
            }
        }
    }

    pub fn sign_in(&mut self, email: &str, password: &str, now: Instant) -> AppResult<()> {
        let identity = self.backend.sign_in(email, password)?;
        self.on_session_change(Some(identity), now)
    }

    /// Resume a persisted session. False when the token is no longer valid.
    pub fn resume(&mut self, token: &str, now: Instant) -> AppResult<bool> {
        let identity = self.backend.restore(token)?;
        let found = identity.is_some();
        self.on_session_change(identity, now)?;
        Ok(found)
    }

    /// React to the credential service reporting the current identity.
    pub fn on_session_change(&mut self, identity: Option<Identity>, now: Instant) -> AppResult<()> {
        match identity {
            Some(id) => {
                if let SessionState::SignedIn(s) = &self.state {
                    if s.identity.uid == id.uid {
                        return Ok(());
                    }
                    self.leave();
                }
                self.enter(id, now)
            }
            None => {
                self.leave();
                Ok(())
            }
        }
    }

    /// Explicit sign-out: presence goes offline, then the credential
    /// session is closed.
    pub fn sign_out(&mut self) -> AppResult<()> {
        let identity = match &self.state {
            SessionState::SignedIn(s) => s.identity.clone(),
            SessionState::SignedOut => return Ok(()),
        };

        self.leave();
        self.backend.sign_out(&identity)
    }

    fn enter(&mut self, identity: Identity, now: Instant) -> AppResult<()> {
        let uid = identity.uid.clone();
        let email = identity.email.clone();

        // 1️⃣ profile: refresh lastSeen, createdAt only the first time
        let existing = match self.gateway.load_profile(&uid) {
            Ok(p) => p,
            Err(e) => {
                self.backend.record("load_profile", &uid, &format!("failed: {}", e));
                None
            }
        };
        let patch = ProfilePatch::sign_in(email.as_deref(), existing.is_none());
        if let Err(e) = self.gateway.upsert_profile(&uid, &patch) {
            self.backend.record("upsert_profile", &uid, &format!("failed: {}", e));
        }
        let previous_hours = existing.map(|p| p.baseline()).unwrap_or(0.0);

        // 2️⃣ hours (fail-soft)
        let (hours, hours_loaded) = match self.gateway.try_load_hours(&uid) {
            Ok(map) => (map, true),
            Err(_) => (HoursMap::new(), false),
        };

        // 3️⃣ presence + heartbeat
        let mut heartbeat = Heartbeat::new(self.settings.heartbeat_interval);
        heartbeat.start(now);
        match self.gateway.set_presence(&uid, email.as_deref(), true) {
            Ok(()) => heartbeat.beat(now),
            Err(e) => self.backend.record("presence", &uid, &format!("failed: {}", e)),
        }

        // 4️⃣ claims, admin substate
        let claims = match self.backend.identity_claims(&identity, true) {
            Ok(c) => c,
            Err(e) => {
                self.backend.record("claims", &uid, &format!("failed: {}", e));
                Claims::default()
            }
        };
        let admin = if claims.admin {
            match AdminDirectory::activate(self.backend) {
                Ok(dir) => Some(dir),
                Err(e) => {
                    self.backend.record("admin_directory", &uid, &format!("failed: {}", e));
                    None
                }
            }
        } else {
            None
        };

        self.state = SessionState::SignedIn(Box::new(SignedInSession {
            identity,
            claims,
            hours,
            hours_loaded,
            previous_hours,
            heartbeat,
            admin,
        }));
        Ok(())
    }

    /// Exit actions. Presence offline is best-effort.
    fn leave(&mut self) {
        let state = std::mem::replace(&mut self.state, SessionState::SignedOut);
        let SessionState::SignedIn(mut s) = state else {
            return;
        };

        if let Err(e) = self
            .gateway
            .set_presence(&s.identity.uid, s.identity.email.as_deref(), false)
        {
            self.backend.record("presence", &s.identity.uid, &format!("offline failed: {}", e));
        }

        s.heartbeat.cancel();
        if let Some(dir) = s.admin.as_mut() {
            dir.deactivate();
        }
        self.gateway.clear_status();
        // hours and baseline are dropped with the session
    }

    // ------------------------------------------------
    // Hours
    // ------------------------------------------------

    /// Validate and record one day, then save. A failed save is reported
    /// through `status()` and does not undo the edit.
    pub fn set_day_hours(&mut self, date: NaiveDate, value: f64) -> AppResult<()> {
        let policy = self.settings.policy;
        policy.validate_hours(value)?;
        policy.validate_date(date)?;
        self.ensure_hours_loaded()?;
        self.session_mut()?.hours.set_day_hours(date, value, &policy)?;
        self.persist_hours();
        Ok(())
    }

    pub fn reset_all(&mut self, confirmed: ResetConfirmed) -> AppResult<()> {
        self.ensure_hours_loaded()?;
        self.session_mut()?.hours.clear_all(confirmed);
        self.persist_hours();
        Ok(())
    }

    pub fn import_hours(&mut self, imported: HoursMap, confirmed: ResetConfirmed) -> AppResult<()> {
        self.ensure_hours_loaded()?;
        self.session_mut()?.hours.replace_with(imported, confirmed);
        self.persist_hours();
        Ok(())
    }

    /// Saves replace the whole stored map, so a session whose load failed
    /// retries it before the first edit and refuses the edit otherwise.
    fn ensure_hours_loaded(&mut self) -> AppResult<()> {
        let SessionState::SignedIn(s) = &mut self.state else {
            return Err(AppError::NotSignedIn);
        };
        if s.hours_loaded {
            return Ok(());
        }

        match self.gateway.try_load_hours(&s.identity.uid) {
            Ok(map) => {
                s.hours = map;
                s.hours_loaded = true;
                Ok(())
            }
            Err(e) => Err(AppError::Transport(format!(
                "stored hours could not be loaded, nothing was changed: {}",
                e
            ))),
        }
    }

    pub fn hours_loaded(&self) -> bool {
        self.session().map(|s| s.hours_loaded).unwrap_or(false)
    }

    fn persist_hours(&mut self) {
        if let SessionState::SignedIn(s) = &mut self.state {
            // the outcome is surfaced through the status indicator
            let _ = self.gateway.save_hours(&s.identity.uid, &mut s.hours);
        }
    }

    /// Store the previous hours baseline. The in-memory value changes only
    /// once the write succeeded.
    pub fn set_previous_hours(&mut self, hours: f64) -> AppResult<()> {
        if !hours.is_finite() || hours < 0.0 {
            return Err(AppError::validation(
                "Please enter a valid number of hours (>= 0).",
            ));
        }

        let uid = self.session()?.identity.uid.clone();
        self.gateway
            .upsert_profile(&uid, &ProfilePatch::previous_hours(hours))?;
        self.session_mut()?.previous_hours = hours;
        Ok(())
    }

    pub fn summary(&self) -> AppResult<Summary> {
        let s = self.session()?;
        let in_system = s.hours.total_hours();

        Ok(Summary {
            email: s.identity.email.clone(),
            in_system_hours: in_system,
            previous_hours: s.previous_hours,
            total_hours: in_system + s.previous_hours,
            goal_hours: self.settings.projector.goal,
            recorded_days: s.hours.len(),
            projection: self.settings.projector.project_for(&s.hours, s.previous_hours),
        })
    }

    pub fn calendar(&self, year: i32, month: u32) -> AppResult<CalendarMonth> {
        CalendarMonth::build(year, month, &self.session()?.hours, &self.settings.policy)
    }

    // ------------------------------------------------
    // Background work
    // ------------------------------------------------

    /// One step of the event loop: heartbeat when due, then live presence.
    pub fn tick(&mut self, now: Instant) -> AppResult<TickReport> {
        let backend = self.backend;
        let SessionState::SignedIn(s) = &mut self.state else {
            return Ok(TickReport::default());
        };

        let mut report = TickReport::default();

        if s.heartbeat.due(now) {
            match self
                .gateway
                .set_presence(&s.identity.uid, s.identity.email.as_deref(), true)
            {
                Ok(()) => report.heartbeat_sent = true,
                Err(e) => backend.record("presence", &s.identity.uid, &format!("heartbeat failed: {}", e)),
            }
            // a failed beat waits for the next interval
            s.heartbeat.beat(now);
        }

        if let Some(dir) = s.admin.as_mut() {
            backend.deliver_pending()?;
            report.presence_updates = dir.pump();
        }

        Ok(report)
    }

    // ------------------------------------------------
    // Admin
    // ------------------------------------------------

    pub fn admin(&self) -> AppResult<&AdminDirectory> {
        let s = self.session()?;
        s.admin
            .as_ref()
            .ok_or_else(|| AppError::Authorization("administrator role required".into()))
    }

    pub fn refresh_directory(&mut self) -> AppResult<RefreshOutcome> {
        let backend = self.backend;
        let s = self.session_mut()?;
        let dir = s
            .admin
            .as_mut()
            .ok_or_else(|| AppError::Authorization("administrator role required".into()))?;
        dir.refresh(backend)
    }

    pub fn delete_account(&mut self, uid: &str) -> AppResult<()> {
        let backend = self.backend;
        let s = self.session_mut()?;
        let caller = s.identity.clone();
        let dir = s
            .admin
            .as_mut()
            .ok_or_else(|| AppError::Authorization("administrator role required".into()))?;
        dir.delete_account(backend, &caller, uid)
    }
}
