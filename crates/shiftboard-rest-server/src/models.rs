//! Store traits and their database-backed and in-memory implementations.
//!
//! The store traits are the seam between handlers and persistence. Production
//! wiring backs them with `shiftboard_db::Database`; tests and the mock
//! wiring use the in-memory implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shiftboard_api_contract::{ApprovedEmail, Event, Schedule, Shift, TimeLog, User};
use shiftboard_db::{
    ApprovedEmailRecord, Database, Error as DbError, EventRecord, NewEvent, NewSchedule, NewShift,
    NewUser, ScheduleRecord, ShiftRecord, TimeLogRecord, UserRecord,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Result type shared by all store operations.
pub type StoreResult<T> = Result<T, DbError>;

/// User accounts plus the approved-email registration gate.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, user: NewUser) -> StoreResult<UserRecord>;
    async fn user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>>;
    async fn user_by_id(&self, id: i64) -> StoreResult<Option<UserRecord>>;
    async fn list_users(&self) -> StoreResult<Vec<UserRecord>>;
    async fn delete_user(&self, id: i64) -> StoreResult<bool>;

    async fn is_email_approved(&self, email: &str) -> StoreResult<bool>;
    async fn add_approved_email(
        &self,
        email: &str,
        created_by: Option<i64>,
    ) -> StoreResult<ApprovedEmailRecord>;
    async fn list_approved_emails(&self) -> StoreResult<Vec<ApprovedEmailRecord>>;
    async fn remove_approved_email(&self, id: i64) -> StoreResult<bool>;
}

/// Schedules and their events and shifts.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn create_schedule(&self, schedule: NewSchedule) -> StoreResult<ScheduleRecord>;
    async fn schedule_by_id(&self, id: i64) -> StoreResult<Option<ScheduleRecord>>;
    async fn list_schedules(&self) -> StoreResult<Vec<ScheduleRecord>>;
    async fn delete_schedule(&self, id: i64) -> StoreResult<bool>;

    async fn create_event(&self, event: NewEvent) -> StoreResult<EventRecord>;
    async fn events_for_schedule(&self, schedule_id: i64) -> StoreResult<Vec<EventRecord>>;

    async fn create_shift(&self, shift: NewShift) -> StoreResult<ShiftRecord>;
    async fn shifts_for_schedule(&self, schedule_id: i64) -> StoreResult<Vec<ShiftRecord>>;
    async fn delete_shift(&self, id: i64) -> StoreResult<bool>;
}

/// Clock-in/clock-out records.
#[async_trait]
pub trait TimeLogStore: Send + Sync {
    async fn clock_in(
        &self,
        employee_id: i64,
        shift_id: Option<i64>,
        clock_in: DateTime<Utc>,
        late: bool,
    ) -> StoreResult<TimeLogRecord>;
    async fn clock_out(
        &self,
        id: i64,
        clock_out: DateTime<Utc>,
        break_minutes: i32,
        break_skipped: bool,
        overtime: bool,
    ) -> StoreResult<TimeLogRecord>;
    async fn time_logs_for_employee(&self, employee_id: i64) -> StoreResult<Vec<TimeLogRecord>>;
}

// ── Record → API conversions ────────────────────────────────────────

/// Convert a stored user row to its API shape, dropping the credential.
pub fn to_api_user(record: &UserRecord) -> User {
    User {
        id: record.id,
        first_name: record.first_name.clone(),
        last_name: record.last_name.clone(),
        email: record.email.clone(),
        role: record.role,
        approved: record.approved,
        created_at: record.created_at,
    }
}

pub fn to_api_approved_email(record: &ApprovedEmailRecord) -> ApprovedEmail {
    ApprovedEmail {
        id: record.id,
        email: record.email.clone(),
        created_at: record.created_at,
        created_by: record.created_by,
    }
}

pub fn to_api_schedule(record: &ScheduleRecord) -> Schedule {
    Schedule {
        id: record.id,
        week_number: record.week_number,
        month: record.month.clone(),
        year: record.year,
        created_at: record.created_at,
        created_by: record.created_by,
    }
}

pub fn to_api_event(record: &EventRecord) -> Event {
    Event {
        id: record.id,
        name: record.name.clone(),
        color_code: record.color_code.clone(),
        schedule_id: record.schedule_id,
        day: record.day,
        created_at: record.created_at,
    }
}

pub fn to_api_shift(record: &ShiftRecord) -> Shift {
    Shift {
        id: record.id,
        employee_id: record.employee_id,
        schedule_id: record.schedule_id,
        day: record.day,
        start_time: record.start_time,
        end_time: record.end_time,
        event_id: record.event_id,
        created_at: record.created_at,
    }
}

pub fn to_api_time_log(record: &TimeLogRecord) -> TimeLog {
    TimeLog {
        id: record.id,
        employee_id: record.employee_id,
        shift_id: record.shift_id,
        clock_in: record.clock_in,
        clock_out: record.clock_out,
        break_minutes: record.break_minutes,
        break_skipped: record.break_skipped,
        overtime: record.overtime,
        late: record.late,
        edited: record.edited,
        edited_by: record.edited_by,
        created_at: record.created_at,
    }
}

// ── Database-backed implementations ─────────────────────────────────

/// User store backed by the SQLite database.
pub struct DatabaseUserStore {
    db: Arc<Database>,
}

impl DatabaseUserStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for DatabaseUserStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<UserRecord> {
        self.db.insert_user(&user)
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        self.db.user_by_email(email)
    }

    async fn user_by_id(&self, id: i64) -> StoreResult<Option<UserRecord>> {
        self.db.user_by_id(id)
    }

    async fn list_users(&self) -> StoreResult<Vec<UserRecord>> {
        self.db.list_users()
    }

    async fn delete_user(&self, id: i64) -> StoreResult<bool> {
        self.db.delete_user(id)
    }

    async fn is_email_approved(&self, email: &str) -> StoreResult<bool> {
        self.db.is_email_approved(email)
    }

    async fn add_approved_email(
        &self,
        email: &str,
        created_by: Option<i64>,
    ) -> StoreResult<ApprovedEmailRecord> {
        self.db.insert_approved_email(email, created_by)
    }

    async fn list_approved_emails(&self) -> StoreResult<Vec<ApprovedEmailRecord>> {
        self.db.list_approved_emails()
    }

    async fn remove_approved_email(&self, id: i64) -> StoreResult<bool> {
        self.db.delete_approved_email(id)
    }
}

/// Schedule store backed by the SQLite database.
pub struct DatabaseScheduleStore {
    db: Arc<Database>,
}

impl DatabaseScheduleStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ScheduleStore for DatabaseScheduleStore {
    async fn create_schedule(&self, schedule: NewSchedule) -> StoreResult<ScheduleRecord> {
        self.db.insert_schedule(&schedule)
    }

    async fn schedule_by_id(&self, id: i64) -> StoreResult<Option<ScheduleRecord>> {
        self.db.schedule_by_id(id)
    }

    async fn list_schedules(&self) -> StoreResult<Vec<ScheduleRecord>> {
        self.db.list_schedules()
    }

    async fn delete_schedule(&self, id: i64) -> StoreResult<bool> {
        self.db.delete_schedule(id)
    }

    async fn create_event(&self, event: NewEvent) -> StoreResult<EventRecord> {
        self.db.insert_event(&event)
    }

    async fn events_for_schedule(&self, schedule_id: i64) -> StoreResult<Vec<EventRecord>> {
        self.db.events_for_schedule(schedule_id)
    }

    async fn create_shift(&self, shift: NewShift) -> StoreResult<ShiftRecord> {
        self.db.insert_shift(&shift)
    }

    async fn shifts_for_schedule(&self, schedule_id: i64) -> StoreResult<Vec<ShiftRecord>> {
        self.db.shifts_for_schedule(schedule_id)
    }

    async fn delete_shift(&self, id: i64) -> StoreResult<bool> {
        self.db.delete_shift(id)
    }
}

/// Time log store backed by the SQLite database.
pub struct DatabaseTimeLogStore {
    db: Arc<Database>,
}

impl DatabaseTimeLogStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TimeLogStore for DatabaseTimeLogStore {
    async fn clock_in(
        &self,
        employee_id: i64,
        shift_id: Option<i64>,
        clock_in: DateTime<Utc>,
        late: bool,
    ) -> StoreResult<TimeLogRecord> {
        self.db.insert_time_log(employee_id, shift_id, clock_in, late)
    }

    async fn clock_out(
        &self,
        id: i64,
        clock_out: DateTime<Utc>,
        break_minutes: i32,
        break_skipped: bool,
        overtime: bool,
    ) -> StoreResult<TimeLogRecord> {
        self.db
            .close_time_log(id, clock_out, break_minutes, break_skipped, overtime)
    }

    async fn time_logs_for_employee(&self, employee_id: i64) -> StoreResult<Vec<TimeLogRecord>> {
        self.db.time_logs_for_employee(employee_id)
    }
}

// ── In-memory implementations (for development/testing) ─────────────

/// In-memory user store. Enforces the unique-email invariant but not
/// foreign keys.
pub struct InMemoryUserStore {
    users: RwLock<HashMap<i64, UserRecord>>,
    approved: RwLock<HashMap<i64, ApprovedEmailRecord>>,
    next_id: AtomicI64,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            approved: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<UserRecord> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(DbError::Duplicate {
                entity: "user",
                value: user.email,
            });
        }
        let id = self.next_id();
        let record = UserRecord {
            id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password: user.password,
            role: user.role,
            approved: false,
            created_at: Utc::now(),
        };
        users.insert(id, record.clone());
        Ok(record)
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn user_by_id(&self, id: i64) -> StoreResult<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<UserRecord>> {
        let users = self.users.read().await;
        let mut all: Vec<_> = users.values().cloned().collect();
        all.sort_by_key(|u| u.id);
        Ok(all)
    }

    async fn delete_user(&self, id: i64) -> StoreResult<bool> {
        let mut users = self.users.write().await;
        Ok(users.remove(&id).is_some())
    }

    async fn is_email_approved(&self, email: &str) -> StoreResult<bool> {
        let approved = self.approved.read().await;
        Ok(approved
            .values()
            .any(|a| a.email.eq_ignore_ascii_case(email)))
    }

    async fn add_approved_email(
        &self,
        email: &str,
        created_by: Option<i64>,
    ) -> StoreResult<ApprovedEmailRecord> {
        let mut approved = self.approved.write().await;
        if approved.values().any(|a| a.email.eq_ignore_ascii_case(email)) {
            return Err(DbError::Duplicate {
                entity: "approved email",
                value: email.to_string(),
            });
        }
        let id = self.next_id();
        let record = ApprovedEmailRecord {
            id,
            email: email.to_string(),
            created_at: Utc::now(),
            created_by,
        };
        approved.insert(id, record.clone());
        Ok(record)
    }

    async fn list_approved_emails(&self) -> StoreResult<Vec<ApprovedEmailRecord>> {
        let approved = self.approved.read().await;
        let mut all: Vec<_> = approved.values().cloned().collect();
        all.sort_by_key(|a| a.id);
        Ok(all)
    }

    async fn remove_approved_email(&self, id: i64) -> StoreResult<bool> {
        let mut approved = self.approved.write().await;
        Ok(approved.remove(&id).is_some())
    }
}

/// In-memory schedule store.
pub struct InMemoryScheduleStore {
    schedules: RwLock<HashMap<i64, ScheduleRecord>>,
    events: RwLock<HashMap<i64, EventRecord>>,
    shifts: RwLock<HashMap<i64, ShiftRecord>>,
    next_id: AtomicI64,
}

impl InMemoryScheduleStore {
    pub fn new() -> Self {
        Self {
            schedules: RwLock::new(HashMap::new()),
            events: RwLock::new(HashMap::new()),
            shifts: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for InMemoryScheduleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScheduleStore for InMemoryScheduleStore {
    async fn create_schedule(&self, schedule: NewSchedule) -> StoreResult<ScheduleRecord> {
        let id = self.next_id();
        let record = ScheduleRecord {
            id,
            week_number: schedule.week_number,
            month: schedule.month,
            year: schedule.year,
            created_at: Utc::now(),
            created_by: schedule.created_by,
        };
        self.schedules.write().await.insert(id, record.clone());
        Ok(record)
    }

    async fn schedule_by_id(&self, id: i64) -> StoreResult<Option<ScheduleRecord>> {
        Ok(self.schedules.read().await.get(&id).cloned())
    }

    async fn list_schedules(&self) -> StoreResult<Vec<ScheduleRecord>> {
        let schedules = self.schedules.read().await;
        let mut all: Vec<_> = schedules.values().cloned().collect();
        all.sort_by_key(|s| (s.year, s.week_number));
        Ok(all)
    }

    async fn delete_schedule(&self, id: i64) -> StoreResult<bool> {
        Ok(self.schedules.write().await.remove(&id).is_some())
    }

    async fn create_event(&self, event: NewEvent) -> StoreResult<EventRecord> {
        let id = self.next_id();
        let record = EventRecord {
            id,
            name: event.name,
            color_code: event.color_code,
            schedule_id: event.schedule_id,
            day: event.day,
            created_at: Utc::now(),
        };
        self.events.write().await.insert(id, record.clone());
        Ok(record)
    }

    async fn events_for_schedule(&self, schedule_id: i64) -> StoreResult<Vec<EventRecord>> {
        let events = self.events.read().await;
        let mut matching: Vec<_> = events
            .values()
            .filter(|e| e.schedule_id == schedule_id)
            .cloned()
            .collect();
        matching.sort_by_key(|e| (e.day, e.id));
        Ok(matching)
    }

    async fn create_shift(&self, shift: NewShift) -> StoreResult<ShiftRecord> {
        let id = self.next_id();
        let record = ShiftRecord {
            id,
            employee_id: shift.employee_id,
            schedule_id: shift.schedule_id,
            day: shift.day,
            start_time: shift.start_time,
            end_time: shift.end_time,
            event_id: shift.event_id,
            created_at: Utc::now(),
        };
        self.shifts.write().await.insert(id, record.clone());
        Ok(record)
    }

    async fn shifts_for_schedule(&self, schedule_id: i64) -> StoreResult<Vec<ShiftRecord>> {
        let shifts = self.shifts.read().await;
        let mut matching: Vec<_> = shifts
            .values()
            .filter(|s| s.schedule_id == schedule_id)
            .cloned()
            .collect();
        matching.sort_by_key(|s| (s.day, s.start_time));
        Ok(matching)
    }

    async fn delete_shift(&self, id: i64) -> StoreResult<bool> {
        Ok(self.shifts.write().await.remove(&id).is_some())
    }
}

/// In-memory time log store.
pub struct InMemoryTimeLogStore {
    logs: RwLock<HashMap<i64, TimeLogRecord>>,
    next_id: AtomicI64,
}

impl InMemoryTimeLogStore {
    pub fn new() -> Self {
        Self {
            logs: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryTimeLogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TimeLogStore for InMemoryTimeLogStore {
    async fn clock_in(
        &self,
        employee_id: i64,
        shift_id: Option<i64>,
        clock_in: DateTime<Utc>,
        late: bool,
    ) -> StoreResult<TimeLogRecord> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = TimeLogRecord {
            id,
            employee_id,
            shift_id,
            clock_in,
            clock_out: None,
            break_minutes: 0,
            break_skipped: false,
            overtime: false,
            late,
            edited: false,
            edited_by: None,
            created_at: Utc::now(),
        };
        self.logs.write().await.insert(id, record.clone());
        Ok(record)
    }

    async fn clock_out(
        &self,
        id: i64,
        clock_out: DateTime<Utc>,
        break_minutes: i32,
        break_skipped: bool,
        overtime: bool,
    ) -> StoreResult<TimeLogRecord> {
        let mut logs = self.logs.write().await;
        let record = logs.get_mut(&id).ok_or(DbError::NotFound {
            entity: "time log",
            id,
        })?;
        if record.clock_out.is_some() {
            return Err(DbError::AlreadyClosed {
                entity: "time log",
                id,
            });
        }
        record.clock_out = Some(clock_out);
        record.break_minutes = break_minutes;
        record.break_skipped = break_skipped;
        record.overtime = overtime;
        Ok(record.clone())
    }

    async fn time_logs_for_employee(&self, employee_id: i64) -> StoreResult<Vec<TimeLogRecord>> {
        let logs = self.logs.read().await;
        let mut matching: Vec<_> = logs
            .values()
            .filter(|l| l.employee_id == employee_id)
            .cloned()
            .collect();
        matching.sort_by_key(|l| l.clock_in);
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shiftboard_api_contract::Role;

    fn sample_user(email: &str) -> NewUser {
        NewUser {
            first_name: "Ana".into(),
            last_name: "Reyes".into(),
            email: email.into(),
            password: "00ff:aabb".into(),
            role: Role::Guest,
        }
    }

    #[tokio::test]
    async fn in_memory_user_store_enforces_unique_email() {
        let store = InMemoryUserStore::new();
        store.create_user(sample_user("ana@venue.test")).await.unwrap();
        let err = store
            .create_user(sample_user("ANA@venue.test"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn in_memory_approval_gate_matches_case_insensitively() {
        let store = InMemoryUserStore::new();
        assert!(!store.is_email_approved("ana@venue.test").await.unwrap());
        store.add_approved_email("Ana@Venue.Test", None).await.unwrap();
        assert!(store.is_email_approved("ana@venue.test").await.unwrap());
    }

    #[tokio::test]
    async fn in_memory_clock_out_of_missing_log_is_not_found() {
        let store = InMemoryTimeLogStore::new();
        let err = store
            .clock_out(1, Utc::now(), 0, false, false)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn in_memory_clock_out_twice_is_rejected() {
        let store = InMemoryTimeLogStore::new();
        let log = store.clock_in(1, None, Utc::now(), false).await.unwrap();
        let closed = store
            .clock_out(log.id, Utc::now(), 30, false, false)
            .await
            .unwrap();

        let err = store
            .clock_out(log.id, Utc::now(), 0, true, true)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::AlreadyClosed { .. }));

        // The first close is untouched
        let logs = store.time_logs_for_employee(1).await.unwrap();
        assert_eq!(logs, vec![closed]);
    }

    #[tokio::test]
    async fn to_api_user_strips_the_credential() {
        let store = InMemoryUserStore::new();
        let record = store.create_user(sample_user("ana@venue.test")).await.unwrap();
        let api = to_api_user(&record);
        let as_json = serde_json::to_value(&api).unwrap();
        assert!(as_json.get("password").is_none());
        assert_eq!(as_json["email"], "ana@venue.test");
    }
}
