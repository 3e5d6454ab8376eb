//! SQLite database handle and typed CRUD operations.

use crate::error::{Error, Result};
use crate::records::*;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use shiftboard_api_contract::Role;
use std::path::Path;
use std::sync::Mutex;

/// Shared SQLite handle for scheduling state.
///
/// The connection sits behind a mutex; every operation is a single statement
/// or a short read, so contention stays negligible at this service's scale.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database, used by tests and the mock wiring.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        // WAL mode for concurrent reads + crash safety
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;",
        )?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE COLLATE NOCASE,
                password TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'guest',
                approved INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS approved_emails (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE COLLATE NOCASE,
                created_at TEXT NOT NULL,
                created_by INTEGER REFERENCES users(id)
            );

            CREATE TABLE IF NOT EXISTS schedules (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                week_number INTEGER NOT NULL,
                month TEXT NOT NULL,
                year INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                created_by INTEGER NOT NULL REFERENCES users(id)
            );

            CREATE TABLE IF NOT EXISTS events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                color_code TEXT,
                schedule_id INTEGER NOT NULL REFERENCES schedules(id),
                day INTEGER NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_events_schedule ON events(schedule_id);

            CREATE TABLE IF NOT EXISTS shifts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                employee_id INTEGER NOT NULL REFERENCES users(id),
                schedule_id INTEGER NOT NULL REFERENCES schedules(id),
                day INTEGER NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                event_id INTEGER REFERENCES events(id),
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_shifts_schedule ON shifts(schedule_id);
            CREATE INDEX IF NOT EXISTS idx_shifts_employee ON shifts(employee_id);

            CREATE TABLE IF NOT EXISTS time_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                employee_id INTEGER NOT NULL REFERENCES users(id),
                shift_id INTEGER REFERENCES shifts(id),
                clock_in TEXT NOT NULL,
                clock_out TEXT,
                break_minutes INTEGER NOT NULL DEFAULT 0,
                break_skipped INTEGER NOT NULL DEFAULT 0,
                overtime INTEGER NOT NULL DEFAULT 0,
                late INTEGER NOT NULL DEFAULT 0,
                edited INTEGER NOT NULL DEFAULT 0,
                edited_by INTEGER REFERENCES users(id),
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_time_logs_employee ON time_logs(employee_id);",
        )?;
        Ok(())
    }

    // ── Users ───────────────────────────────────────────────────────

    /// Insert a user. The password field must already be a derived
    /// credential; this layer stores it as opaque text.
    pub fn insert_user(&self, user: &NewUser) -> Result<UserRecord> {
        let now = Utc::now();
        let conn = self.conn.lock().expect("database mutex poisoned");
        conn.execute(
            "INSERT INTO users (first_name, last_name, email, password, role, approved, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
            params![
                user.first_name,
                user.last_name,
                user.email,
                user.password,
                user.role.as_str(),
                now,
            ],
        )
        .map_err(|e| Error::from_insert(e, "user", &user.email))?;

        let id = conn.last_insert_rowid();
        tracing::debug!(user_id = id, "inserted user");
        Ok(UserRecord {
            id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            password: user.password.clone(),
            role: user.role,
            approved: false,
            created_at: now,
        })
    }

    pub fn user_by_id(&self, id: i64) -> Result<Option<UserRecord>> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        optional(conn.query_row(
            "SELECT id, first_name, last_name, email, password, role, approved, created_at
             FROM users WHERE id = ?1",
            params![id],
            map_user_row,
        ))
    }

    pub fn user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        optional(conn.query_row(
            "SELECT id, first_name, last_name, email, password, role, approved, created_at
             FROM users WHERE email = ?1 COLLATE NOCASE",
            params![email],
            map_user_row,
        ))
    }

    pub fn list_users(&self) -> Result<Vec<UserRecord>> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, first_name, last_name, email, password, role, approved, created_at
             FROM users ORDER BY id",
        )?;
        let rows = stmt.query_map([], map_user_row)?;
        collect(rows)
    }

    /// Delete a user by id. Returns `false` when no row matched.
    pub fn delete_user(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        let deleted = conn
            .execute("DELETE FROM users WHERE id = ?1", params![id])
            .map_err(|e| Error::from_delete(e, "user"))?;
        Ok(deleted > 0)
    }

    // ── Approved emails ─────────────────────────────────────────────

    pub fn insert_approved_email(
        &self,
        email: &str,
        created_by: Option<i64>,
    ) -> Result<ApprovedEmailRecord> {
        let now = Utc::now();
        let conn = self.conn.lock().expect("database mutex poisoned");
        conn.execute(
            "INSERT INTO approved_emails (email, created_at, created_by) VALUES (?1, ?2, ?3)",
            params![email, now, created_by],
        )
        .map_err(|e| Error::from_insert(e, "approved email", email))?;

        Ok(ApprovedEmailRecord {
            id: conn.last_insert_rowid(),
            email: email.to_string(),
            created_at: now,
            created_by,
        })
    }

    pub fn is_email_approved(&self, email: &str) -> Result<bool> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM approved_emails WHERE email = ?1 COLLATE NOCASE",
            params![email],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn list_approved_emails(&self) -> Result<Vec<ApprovedEmailRecord>> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, email, created_at, created_by FROM approved_emails ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ApprovedEmailRecord {
                id: row.get(0)?,
                email: row.get(1)?,
                created_at: row.get(2)?,
                created_by: row.get(3)?,
            })
        })?;
        collect(rows)
    }

    pub fn delete_approved_email(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        let deleted = conn
            .execute("DELETE FROM approved_emails WHERE id = ?1", params![id])
            .map_err(|e| Error::from_delete(e, "approved email"))?;
        Ok(deleted > 0)
    }

    // ── Schedules ───────────────────────────────────────────────────

    pub fn insert_schedule(&self, schedule: &NewSchedule) -> Result<ScheduleRecord> {
        let now = Utc::now();
        let conn = self.conn.lock().expect("database mutex poisoned");
        conn.execute(
            "INSERT INTO schedules (week_number, month, year, created_at, created_by)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                schedule.week_number,
                schedule.month,
                schedule.year,
                now,
                schedule.created_by,
            ],
        )
        .map_err(|e| Error::from_insert(e, "schedule", &schedule.month))?;

        Ok(ScheduleRecord {
            id: conn.last_insert_rowid(),
            week_number: schedule.week_number,
            month: schedule.month.clone(),
            year: schedule.year,
            created_at: now,
            created_by: schedule.created_by,
        })
    }

    pub fn schedule_by_id(&self, id: i64) -> Result<Option<ScheduleRecord>> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        optional(conn.query_row(
            "SELECT id, week_number, month, year, created_at, created_by
             FROM schedules WHERE id = ?1",
            params![id],
            map_schedule_row,
        ))
    }

    pub fn list_schedules(&self) -> Result<Vec<ScheduleRecord>> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, week_number, month, year, created_at, created_by
             FROM schedules ORDER BY year, week_number",
        )?;
        let rows = stmt.query_map([], map_schedule_row)?;
        collect(rows)
    }

    pub fn delete_schedule(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        let deleted = conn
            .execute("DELETE FROM schedules WHERE id = ?1", params![id])
            .map_err(|e| Error::from_delete(e, "schedule"))?;
        Ok(deleted > 0)
    }

    // ── Events ──────────────────────────────────────────────────────

    pub fn insert_event(&self, event: &NewEvent) -> Result<EventRecord> {
        let now = Utc::now();
        let conn = self.conn.lock().expect("database mutex poisoned");
        conn.execute(
            "INSERT INTO events (name, color_code, schedule_id, day, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![event.name, event.color_code, event.schedule_id, event.day, now],
        )
        .map_err(|e| Error::from_insert(e, "event", &event.name))?;

        Ok(EventRecord {
            id: conn.last_insert_rowid(),
            name: event.name.clone(),
            color_code: event.color_code.clone(),
            schedule_id: event.schedule_id,
            day: event.day,
            created_at: now,
        })
    }

    pub fn events_for_schedule(&self, schedule_id: i64) -> Result<Vec<EventRecord>> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, name, color_code, schedule_id, day, created_at
             FROM events WHERE schedule_id = ?1 ORDER BY day, id",
        )?;
        let rows = stmt.query_map(params![schedule_id], |row| {
            Ok(EventRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                color_code: row.get(2)?,
                schedule_id: row.get(3)?,
                day: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?;
        collect(rows)
    }

    // ── Shifts ──────────────────────────────────────────────────────

    pub fn insert_shift(&self, shift: &NewShift) -> Result<ShiftRecord> {
        let now = Utc::now();
        let conn = self.conn.lock().expect("database mutex poisoned");
        conn.execute(
            "INSERT INTO shifts (employee_id, schedule_id, day, start_time, end_time, event_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                shift.employee_id,
                shift.schedule_id,
                shift.day,
                shift.start_time,
                shift.end_time,
                shift.event_id,
                now,
            ],
        )
        .map_err(|e| Error::from_insert(e, "shift", "shift"))?;

        Ok(ShiftRecord {
            id: conn.last_insert_rowid(),
            employee_id: shift.employee_id,
            schedule_id: shift.schedule_id,
            day: shift.day,
            start_time: shift.start_time,
            end_time: shift.end_time,
            event_id: shift.event_id,
            created_at: now,
        })
    }

    pub fn shifts_for_schedule(&self, schedule_id: i64) -> Result<Vec<ShiftRecord>> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, employee_id, schedule_id, day, start_time, end_time, event_id, created_at
             FROM shifts WHERE schedule_id = ?1 ORDER BY day, start_time",
        )?;
        let rows = stmt.query_map(params![schedule_id], map_shift_row)?;
        collect(rows)
    }

    pub fn delete_shift(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        let deleted = conn
            .execute("DELETE FROM shifts WHERE id = ?1", params![id])
            .map_err(|e| Error::from_delete(e, "shift"))?;
        Ok(deleted > 0)
    }

    // ── Time logs ───────────────────────────────────────────────────

    pub fn insert_time_log(
        &self,
        employee_id: i64,
        shift_id: Option<i64>,
        clock_in: DateTime<Utc>,
        late: bool,
    ) -> Result<TimeLogRecord> {
        let now = Utc::now();
        let conn = self.conn.lock().expect("database mutex poisoned");
        conn.execute(
            "INSERT INTO time_logs (employee_id, shift_id, clock_in, late, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![employee_id, shift_id, clock_in, late, now],
        )
        .map_err(|e| Error::from_insert(e, "time log", "time log"))?;

        Ok(TimeLogRecord {
            id: conn.last_insert_rowid(),
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
            created_at: now,
        })
    }

    pub fn time_log_by_id(&self, id: i64) -> Result<Option<TimeLogRecord>> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        optional(conn.query_row(
            "SELECT id, employee_id, shift_id, clock_in, clock_out, break_minutes,
                    break_skipped, overtime, late, edited, edited_by, created_at
             FROM time_logs WHERE id = ?1",
            params![id],
            map_time_log_row,
        ))
    }

    /// Record the clock-out for an open time log.
    ///
    /// The update only matches rows whose `clock_out` is still NULL, so two
    /// racing clock-outs cannot both succeed; the loser gets `AlreadyClosed`.
    pub fn close_time_log(
        &self,
        id: i64,
        clock_out: DateTime<Utc>,
        break_minutes: i32,
        break_skipped: bool,
        overtime: bool,
    ) -> Result<TimeLogRecord> {
        let updated = {
            let conn = self.conn.lock().expect("database mutex poisoned");
            conn.execute(
                "UPDATE time_logs
                 SET clock_out = ?2, break_minutes = ?3, break_skipped = ?4, overtime = ?5
                 WHERE id = ?1 AND clock_out IS NULL",
                params![id, clock_out, break_minutes, break_skipped, overtime],
            )?
        };
        if updated == 0 {
            // Zero rows matched: the log is either missing or already closed
            return match self.time_log_by_id(id)? {
                Some(_) => Err(Error::AlreadyClosed {
                    entity: "time log",
                    id,
                }),
                None => Err(Error::NotFound {
                    entity: "time log",
                    id,
                }),
            };
        }
        self.time_log_by_id(id)?.ok_or(Error::NotFound {
            entity: "time log",
            id,
        })
    }

    pub fn time_logs_for_employee(&self, employee_id: i64) -> Result<Vec<TimeLogRecord>> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, employee_id, shift_id, clock_in, clock_out, break_minutes,
                    break_skipped, overtime, late, edited, edited_by, created_at
             FROM time_logs WHERE employee_id = ?1 ORDER BY clock_in",
        )?;
        let rows = stmt.query_map(params![employee_id], map_time_log_row)?;
        collect(rows)
    }
}

fn map_user_row(row: &Row<'_>) -> rusqlite::Result<UserRecord> {
    let role_text: String = row.get(5)?;
    let role = Role::parse(&role_text).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            5,
            rusqlite::types::Type::Text,
            format!("unknown role: {role_text}").into(),
        )
    })?;
    Ok(UserRecord {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        password: row.get(4)?,
        role,
        approved: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn map_schedule_row(row: &Row<'_>) -> rusqlite::Result<ScheduleRecord> {
    Ok(ScheduleRecord {
        id: row.get(0)?,
        week_number: row.get(1)?,
        month: row.get(2)?,
        year: row.get(3)?,
        created_at: row.get(4)?,
        created_by: row.get(5)?,
    })
}

fn map_shift_row(row: &Row<'_>) -> rusqlite::Result<ShiftRecord> {
    Ok(ShiftRecord {
        id: row.get(0)?,
        employee_id: row.get(1)?,
        schedule_id: row.get(2)?,
        day: row.get(3)?,
        start_time: row.get(4)?,
        end_time: row.get(5)?,
        event_id: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn map_time_log_row(row: &Row<'_>) -> rusqlite::Result<TimeLogRecord> {
    Ok(TimeLogRecord {
        id: row.get(0)?,
        employee_id: row.get(1)?,
        shift_id: row.get(2)?,
        clock_in: row.get(3)?,
        clock_out: row.get(4)?,
        break_minutes: row.get(5)?,
        break_skipped: row.get(6)?,
        overtime: row.get(7)?,
        late: row.get(8)?,
        edited: row.get(9)?,
        edited_by: row.get(10)?,
        created_at: row.get(11)?,
    })
}

/// `QueryReturnedNoRows` becomes `None`; other errors propagate.
fn optional<T>(result: rusqlite::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn collect<T>(rows: impl Iterator<Item = rusqlite::Result<T>>) -> Result<Vec<T>> {
    rows.collect::<rusqlite::Result<Vec<T>>>().map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_user(email: &str) -> NewUser {
        NewUser {
            first_name: "Ana".into(),
            last_name: "Reyes".into(),
            email: email.into(),
            password: "00ff:aabb".into(),
            role: Role::VenueMember,
        }
    }

    #[test]
    fn user_insert_and_lookup() {
        let db = Database::open_in_memory().unwrap();
        let created = db.insert_user(&sample_user("ana@venue.test")).unwrap();
        assert!(created.id > 0);
        assert!(!created.approved);

        let by_id = db.user_by_id(created.id).unwrap().unwrap();
        assert_eq!(by_id, created);

        // Email lookup is case-insensitive
        let by_email = db.user_by_email("ANA@VENUE.TEST").unwrap().unwrap();
        assert_eq!(by_email.id, created.id);

        assert!(db.user_by_id(9999).unwrap().is_none());
    }

    #[test]
    fn duplicate_email_is_reported() {
        let db = Database::open_in_memory().unwrap();
        db.insert_user(&sample_user("ana@venue.test")).unwrap();
        let err = db.insert_user(&sample_user("ana@venue.test")).unwrap_err();
        assert!(matches!(err, Error::Duplicate { entity: "user", .. }));
    }

    #[test]
    fn delete_user_reports_whether_a_row_matched() {
        let db = Database::open_in_memory().unwrap();
        let user = db.insert_user(&sample_user("ana@venue.test")).unwrap();
        assert!(db.delete_user(user.id).unwrap());
        assert!(!db.delete_user(user.id).unwrap());
    }

    #[test]
    fn approved_email_gate() {
        let db = Database::open_in_memory().unwrap();
        assert!(!db.is_email_approved("ana@venue.test").unwrap());

        db.insert_approved_email("ana@venue.test", None).unwrap();
        assert!(db.is_email_approved("ana@venue.test").unwrap());
        assert!(db.is_email_approved("Ana@Venue.Test").unwrap());

        let err = db.insert_approved_email("ana@venue.test", None).unwrap_err();
        assert!(matches!(err, Error::Duplicate { .. }));
    }

    #[test]
    fn schedule_with_events_and_shifts() {
        let db = Database::open_in_memory().unwrap();
        let manager = db.insert_user(&sample_user("boss@venue.test")).unwrap();
        let schedule = db
            .insert_schedule(&NewSchedule {
                week_number: 12,
                month: "March".into(),
                year: 2026,
                created_by: manager.id,
            })
            .unwrap();

        let event = db
            .insert_event(&NewEvent {
                name: "Concert".into(),
                color_code: Some("#ff0000".into()),
                schedule_id: schedule.id,
                day: 5,
            })
            .unwrap();
        assert_eq!(db.events_for_schedule(schedule.id).unwrap(), vec![event.clone()]);

        let start = Utc::now();
        let shift = db
            .insert_shift(&NewShift {
                employee_id: manager.id,
                schedule_id: schedule.id,
                day: 5,
                start_time: start,
                end_time: start + Duration::hours(8),
                event_id: Some(event.id),
            })
            .unwrap();
        let shifts = db.shifts_for_schedule(schedule.id).unwrap();
        assert_eq!(shifts.len(), 1);
        assert_eq!(shifts[0].id, shift.id);

        assert!(db.delete_shift(shift.id).unwrap());
        assert!(db.shifts_for_schedule(schedule.id).unwrap().is_empty());
    }

    #[test]
    fn schedule_insert_rejects_unknown_creator() {
        let db = Database::open_in_memory().unwrap();
        let err = db
            .insert_schedule(&NewSchedule {
                week_number: 1,
                month: "January".into(),
                year: 2026,
                created_by: 42,
            })
            .unwrap_err();
        assert!(matches!(err, Error::ForeignKey { entity: "schedule" }));
    }

    #[test]
    fn time_log_clock_in_then_out() {
        let db = Database::open_in_memory().unwrap();
        let worker = db.insert_user(&sample_user("worker@venue.test")).unwrap();

        let clock_in = Utc::now();
        let log = db.insert_time_log(worker.id, None, clock_in, true).unwrap();
        assert!(log.clock_out.is_none());
        assert!(log.late);

        let closed = db
            .close_time_log(log.id, clock_in + Duration::hours(9), 30, false, true)
            .unwrap();
        assert!(closed.clock_out.is_some());
        assert_eq!(closed.break_minutes, 30);
        assert!(closed.overtime);

        let logs = db.time_logs_for_employee(worker.id).unwrap();
        assert_eq!(logs, vec![closed]);
    }

    #[test]
    fn close_time_log_twice_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let worker = db.insert_user(&sample_user("worker@venue.test")).unwrap();

        let clock_in = Utc::now();
        let log = db.insert_time_log(worker.id, None, clock_in, false).unwrap();
        let first_out = clock_in + Duration::hours(8);
        db.close_time_log(log.id, first_out, 30, false, false).unwrap();

        let err = db
            .close_time_log(log.id, clock_in + Duration::hours(12), 0, true, true)
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyClosed { entity: "time log", .. }));

        // The first close is untouched
        let stored = db.time_log_by_id(log.id).unwrap().unwrap();
        assert_eq!(stored.clock_out, Some(first_out));
        assert_eq!(stored.break_minutes, 30);
        assert!(!stored.overtime);
    }

    #[test]
    fn delete_referenced_user_is_reported_in_use() {
        let db = Database::open_in_memory().unwrap();
        let boss = db.insert_user(&sample_user("boss@venue.test")).unwrap();
        db.insert_schedule(&NewSchedule {
            week_number: 12,
            month: "March".into(),
            year: 2026,
            created_by: boss.id,
        })
        .unwrap();

        let err = db.delete_user(boss.id).unwrap_err();
        assert!(matches!(err, Error::InUse { entity: "user" }));
        assert!(db.user_by_id(boss.id).unwrap().is_some());
    }

    #[test]
    fn close_missing_time_log_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        let err = db
            .close_time_log(7, Utc::now(), 0, false, false)
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { entity: "time log", id: 7 }));
    }

    #[test]
    fn reopen_from_disk_preserves_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shiftboard.db");

        {
            let db = Database::open(&path).unwrap();
            db.insert_user(&sample_user("ana@venue.test")).unwrap();
        }

        let db = Database::open(&path).unwrap();
        let users = db.list_users().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email, "ana@venue.test");
    }
}
