//! Reminder scheduler: turns static templates into concrete registrations.
//!
//! The scheduler owns a per-id state machine (Unregistered -> Scheduled ->
//! Fired | Cancelled) and talks to the OS timer through the fire-and-forget
//! [`AlarmBackend`] seam. Delivery itself happens outside the core; backend
//! registration failures are the only errors this module surfaces.
//!
//! Recurrence flags are not mutually exclusive in the catalog. Precedence
//! is monthly over weekly over daily (see [`Recurrence::cadence`]); weekly
//! reminders run on a 7-day cycle anchored to the registration day, and
//! monthly reminders on a fixed 30-day cycle from the same anchor.

use crate::catalog;
use crate::types::{Cadence, Recurrence, ReminderTemplate, UserGoal};
use crate::Result;
use chrono::{DateTime, Duration, NaiveTime, Utc};
use std::collections::BTreeMap;

/// Notification content handed to the OS-level delivery mechanism
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReminderPayload {
    pub title: String,
    pub body: String,
}

impl From<&ReminderTemplate> for ReminderPayload {
    fn from(template: &ReminderTemplate) -> Self {
        Self {
            title: template.title.to_string(),
            body: template.body.to_string(),
        }
    }
}

/// Fire-and-forget registration contract with the OS timer collaborator.
///
/// `schedule` with an already-registered id replaces the prior
/// registration; it never creates a duplicate.
pub trait AlarmBackend {
    fn schedule(&mut self, id: &str, fire_at: DateTime<Utc>, payload: ReminderPayload)
        -> Result<()>;
    fn cancel(&mut self, id: &str) -> Result<()>;
}

/// Backend stub that only logs registrations. Used by the CLI, where real
/// delivery belongs to the surrounding platform.
#[derive(Debug, Default)]
pub struct LoggingAlarmBackend;

impl AlarmBackend for LoggingAlarmBackend {
    fn schedule(&mut self, id: &str, fire_at: DateTime<Utc>, payload: ReminderPayload) -> Result<()> {
        tracing::debug!("Would schedule '{}' at {}: {}", id, fire_at, payload.title);
        Ok(())
    }

    fn cancel(&mut self, id: &str) -> Result<()> {
        tracing::debug!("Would cancel '{}'", id);
        Ok(())
    }
}

/// Lifecycle state of one reminder id
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReminderState {
    Scheduled,
    Fired,
    Cancelled,
}

/// A concrete registration derived from a template
#[derive(Clone, Debug)]
pub struct Registration {
    pub template: &'static ReminderTemplate,
    pub state: ReminderState,
    pub fire_at: DateTime<Utc>,
    /// Registration instant; weekly and monthly cycles are anchored here
    pub anchor: DateTime<Utc>,
}

/// Builds reminder instances from the per-mode template catalog and keeps
/// their registration state in sync with the alarm backend.
pub struct ReminderScheduler<B: AlarmBackend> {
    backend: B,
    active_mode: Option<UserGoal>,
    registrations: BTreeMap<&'static str, Registration>,
}

impl<B: AlarmBackend> ReminderScheduler<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            active_mode: None,
            registrations: BTreeMap::new(),
        }
    }

    pub fn active_mode(&self) -> Option<UserGoal> {
        self.active_mode
    }

    /// Ids currently in the Scheduled state, in stable order
    pub fn scheduled_ids(&self) -> Vec<&'static str> {
        self.registrations
            .iter()
            .filter(|(_, r)| r.state == ReminderState::Scheduled)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn registration(&self, id: &str) -> Option<&Registration> {
        self.registrations.get(id)
    }

    /// Switch the active mode: cancel every scheduled reminder of the
    /// previous mode, then register every enabled template of `mode`.
    ///
    /// The cancel pass completes before the first new registration, so
    /// callers never observe both modes registered at once.
    pub fn activate_mode(&mut self, mode: UserGoal, now: DateTime<Utc>) -> Result<()> {
        if let Some(previous) = self.active_mode {
            let stale: Vec<&'static str> = self
                .registrations
                .iter()
                .filter(|(_, r)| {
                    r.state == ReminderState::Scheduled && r.template.target_mode == previous
                })
                .map(|(id, _)| *id)
                .collect();
            for id in stale {
                self.cancel(id)?;
            }
            tracing::info!("Cancelled reminders for previous mode {:?}", previous);
        }

        for template in catalog::templates_for_mode(mode) {
            if !template.enabled {
                continue;
            }
            self.register(template, now)?;
        }

        self.active_mode = Some(mode);
        tracing::info!("Activated reminder mode {:?}", mode);
        Ok(())
    }

    /// Register (or re-register) one template. Replaces any prior
    /// registration for the id; never duplicates.
    pub fn register(&mut self, template: &'static ReminderTemplate, now: DateTime<Utc>) -> Result<()> {
        let fire_at = next_fire_time(template, now, now);
        self.backend
            .schedule(template.id, fire_at, ReminderPayload::from(template))?;
        self.registrations.insert(
            template.id,
            Registration {
                template,
                state: ReminderState::Scheduled,
                fire_at,
                anchor: now,
            },
        );
        tracing::debug!("Registered '{}' to fire at {}", template.id, fire_at);
        Ok(())
    }

    /// Cancel one reminder id; a no-op for ids that are not scheduled
    pub fn cancel(&mut self, id: &str) -> Result<()> {
        if let Some(registration) = self.registrations.get_mut(id) {
            if registration.state == ReminderState::Scheduled {
                self.backend.cancel(id)?;
                registration.state = ReminderState::Cancelled;
            }
        }
        Ok(())
    }

    /// Record that a reminder fired. Recurring reminders re-register at
    /// their next occurrence; one-shots stay in the Fired state.
    pub fn mark_fired(&mut self, id: &str, now: DateTime<Utc>) -> Result<()> {
        let Some(registration) = self.registrations.get_mut(id) else {
            return Ok(());
        };
        if registration.state != ReminderState::Scheduled {
            return Ok(());
        }

        if registration.template.recurrence.cadence() == Cadence::OneShot {
            registration.state = ReminderState::Fired;
            return Ok(());
        }

        let fire_at = next_fire_time(registration.template, registration.anchor, now);
        let payload = ReminderPayload::from(registration.template);
        registration.fire_at = fire_at;
        self.backend.schedule(id, fire_at, payload)?;
        tracing::debug!("Re-registered '{}' to fire at {}", id, fire_at);
        Ok(())
    }
}

/// Next fire time for a template: the scheduled hh:mm combined with the
/// resolved recurrence cadence, strictly after `now`.
///
/// Daily and one-shot reminders take the next hh:mm occurrence. Weekly
/// reminders step in 7-day increments from the anchor day, monthly ones in
/// fixed 30-day increments from the same anchor.
pub fn next_fire_time(
    template: &ReminderTemplate,
    anchor: DateTime<Utc>,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(
        template.scheduled_hour as u32,
        template.scheduled_minute as u32,
        0,
    )
    .unwrap_or_default();

    let step_days = match template.recurrence.cadence() {
        Cadence::Monthly => 30,
        Cadence::Weekly => 7,
        Cadence::Daily | Cadence::OneShot => 1,
    };

    let start = match template.recurrence.cadence() {
        Cadence::Weekly | Cadence::Monthly => anchor.date_naive(),
        Cadence::Daily | Cadence::OneShot => now.date_naive(),
    };

    let mut candidate = start.and_time(time).and_utc();
    while candidate <= now {
        candidate += Duration::days(step_days);
    }
    candidate
}

/// Convenience for display surfaces: the resolved cadence of a flag set
pub fn cadence_label(recurrence: Recurrence) -> &'static str {
    match recurrence.cadence() {
        Cadence::OneShot => "once",
        Cadence::Daily => "daily",
        Cadence::Weekly => "weekly",
        Cadence::Monthly => "every 30 days",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{template_by_id, templates_for_mode};

    /// Test backend that records every call, in order
    #[derive(Debug, Default)]
    struct RecordingBackend {
        scheduled: BTreeMap<String, DateTime<Utc>>,
        events: Vec<String>,
    }

    impl AlarmBackend for RecordingBackend {
        fn schedule(
            &mut self,
            id: &str,
            fire_at: DateTime<Utc>,
            _payload: ReminderPayload,
        ) -> Result<()> {
            self.scheduled.insert(id.to_string(), fire_at);
            self.events.push(format!("schedule:{}", id));
            Ok(())
        }

        fn cancel(&mut self, id: &str) -> Result<()> {
            self.scheduled.remove(id);
            self.events.push(format!("cancel:{}", id));
            Ok(())
        }
    }

    /// Backend that rejects every registration
    struct RejectingBackend;

    impl AlarmBackend for RejectingBackend {
        fn schedule(&mut self, id: &str, _: DateTime<Utc>, _: ReminderPayload) -> Result<()> {
            Err(crate::Error::Scheduler(format!("rejected {}", id)))
        }

        fn cancel(&mut self, _: &str) -> Result<()> {
            Ok(())
        }
    }

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn enabled_ids(mode: UserGoal) -> Vec<&'static str> {
        templates_for_mode(mode)
            .filter(|t| t.enabled)
            .map(|t| t.id)
            .collect()
    }

    #[test]
    fn test_activate_mode_registers_enabled_templates() {
        let mut scheduler = ReminderScheduler::new(RecordingBackend::default());
        scheduler
            .activate_mode(UserGoal::CycleTracking, at("2024-01-15T12:00:00Z"))
            .unwrap();

        let mut expected = enabled_ids(UserGoal::CycleTracking);
        expected.sort();
        assert_eq!(scheduler.scheduled_ids(), expected);
        // Disabled templates never register
        assert!(scheduler.registration("cycle_fertile_window").is_none());
    }

    #[test]
    fn test_mode_switch_swaps_registered_set_exactly() {
        let now = at("2024-01-15T12:00:00Z");
        let mut scheduler = ReminderScheduler::new(RecordingBackend::default());
        scheduler.activate_mode(UserGoal::CycleTracking, now).unwrap();
        scheduler.activate_mode(UserGoal::Pregnancy, now).unwrap();

        let mut expected = enabled_ids(UserGoal::Pregnancy);
        expected.sort();
        assert_eq!(scheduler.scheduled_ids(), expected);

        // No cycle id remains registered with the backend either
        for id in enabled_ids(UserGoal::CycleTracking) {
            assert!(!scheduler.backend.scheduled.contains_key(id));
        }
    }

    #[test]
    fn test_mode_switch_cancels_before_scheduling() {
        let now = at("2024-01-15T12:00:00Z");
        let mut scheduler = ReminderScheduler::new(RecordingBackend::default());
        scheduler.activate_mode(UserGoal::CycleTracking, now).unwrap();
        scheduler.backend.events.clear();
        scheduler.activate_mode(UserGoal::Menopause, now).unwrap();

        let events = &scheduler.backend.events;
        let last_cancel = events.iter().rposition(|e| e.starts_with("cancel:")).unwrap();
        let first_schedule = events.iter().position(|e| e.starts_with("schedule:")).unwrap();
        assert!(
            last_cancel < first_schedule,
            "cancel pass must complete first: {:?}",
            events
        );
    }

    #[test]
    fn test_register_is_idempotent() {
        let now = at("2024-01-15T12:00:00Z");
        let template = template_by_id("pregnancy_vitamin").unwrap();

        let mut scheduler = ReminderScheduler::new(RecordingBackend::default());
        scheduler.register(template, now).unwrap();
        scheduler.register(template, now).unwrap();

        assert_eq!(scheduler.scheduled_ids(), vec!["pregnancy_vitamin"]);
        assert_eq!(scheduler.backend.scheduled.len(), 1);
    }

    #[test]
    fn test_daily_next_fire_strictly_after_now() {
        // 09:00 template, asked at 12:00 -> tomorrow 09:00
        let template = template_by_id("pregnancy_vitamin").unwrap();
        let now = at("2024-01-15T12:00:00Z");
        assert_eq!(next_fire_time(template, now, now), at("2024-01-16T09:00:00Z"));

        // Asked at 08:00 -> today 09:00
        let now = at("2024-01-15T08:00:00Z");
        assert_eq!(next_fire_time(template, now, now), at("2024-01-15T09:00:00Z"));
    }

    #[test]
    fn test_weekly_fire_anchored_to_registration_day() {
        // 09:00 weekly template registered Monday at noon -> next Monday
        let template = template_by_id("cycle_period_forecast").unwrap();
        let anchor = at("2024-01-15T12:00:00Z");
        assert_eq!(
            next_fire_time(template, anchor, anchor),
            at("2024-01-22T09:00:00Z")
        );

        // A week later at 08:59 the same anchor yields that morning's slot
        let now = at("2024-01-22T08:59:00Z");
        assert_eq!(
            next_fire_time(template, anchor, now),
            at("2024-01-22T09:00:00Z")
        );
    }

    #[test]
    fn test_monthly_fire_steps_in_thirty_day_cycles() {
        let template = template_by_id("menopause_mrs_checkin").unwrap();
        let anchor = at("2024-01-15T12:00:00Z");
        assert_eq!(
            next_fire_time(template, anchor, anchor),
            at("2024-02-14T10:00:00Z")
        );
    }

    #[test]
    fn test_multi_flag_template_uses_weekly_precedence() {
        // Template sets daily and weekly; weekly must win
        let template = template_by_id("pregnancy_weekly_progress").unwrap();
        let anchor = at("2024-01-15T12:00:00Z");
        let first = next_fire_time(template, anchor, anchor);
        assert_eq!(first, at("2024-01-22T10:00:00Z"));
    }

    #[test]
    fn test_mark_fired_reschedules_recurring() {
        let now = at("2024-01-15T12:00:00Z");
        let template = template_by_id("pregnancy_vitamin").unwrap();

        let mut scheduler = ReminderScheduler::new(RecordingBackend::default());
        scheduler.register(template, now).unwrap();

        let fired_at = at("2024-01-16T09:00:00Z");
        scheduler.mark_fired("pregnancy_vitamin", fired_at).unwrap();

        let registration = scheduler.registration("pregnancy_vitamin").unwrap();
        assert_eq!(registration.state, ReminderState::Scheduled);
        assert_eq!(registration.fire_at, at("2024-01-17T09:00:00Z"));
    }

    #[test]
    fn test_one_shot_template_stays_fired() {
        static ONE_SHOT: ReminderTemplate = ReminderTemplate {
            id: "test_one_shot",
            kind: "test",
            title: "One shot",
            body: "Fires once",
            scheduled_hour: 9,
            scheduled_minute: 30,
            target_mode: UserGoal::CycleTracking,
            enabled: true,
            recurrence: Recurrence {
                daily: false,
                weekly: false,
                monthly: false,
            },
        };

        let now = at("2024-01-15T12:00:00Z");
        let mut scheduler = ReminderScheduler::new(RecordingBackend::default());
        scheduler.register(&ONE_SHOT, now).unwrap();

        scheduler
            .mark_fired("test_one_shot", at("2024-01-16T09:30:00Z"))
            .unwrap();
        let registration = scheduler.registration("test_one_shot").unwrap();
        assert_eq!(registration.state, ReminderState::Fired);
        assert!(scheduler.scheduled_ids().is_empty());
    }

    #[test]
    fn test_backend_failure_surfaces_as_error() {
        let mut scheduler = ReminderScheduler::new(RejectingBackend);
        let result = scheduler.activate_mode(UserGoal::Pregnancy, at("2024-01-15T12:00:00Z"));
        assert!(result.is_err());
    }

    #[test]
    fn test_cancel_unknown_id_is_noop() {
        let mut scheduler = ReminderScheduler::new(RecordingBackend::default());
        scheduler.cancel("never_registered").unwrap();
        assert!(scheduler.backend.events.is_empty());
    }
}
