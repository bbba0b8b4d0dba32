//! `phone_call_reports` table: one immutable row per processed call.

use rusqlite::types::Type;
use rusqlite::{OptionalExtension, Row, params};
use tracing::debug;
use uuid::Uuid;

use carecall_core::models::mood::MoodScore;
use carecall_core::models::pagination::PageRequest;
use carecall_core::models::report::{CallReport, NewCallReport};

use crate::db::{Database, timestamp_from_sql, timestamp_to_sql};
use crate::error::StorageError;

const REPORT_COLUMNS: &str =
    "r.id, r.user_id, r.conversation_id, r.mood, r.mood_description, r.emotions, r.created_at";

/// Result of an insert that may collide with an earlier delivery of the
/// same conversation.
#[derive(Debug, Clone)]
pub struct InsertOutcome {
    pub report: CallReport,
    /// `false` when a report for the conversation already existed and was
    /// returned instead.
    pub created: bool,
}

/// One page of reports plus the total number of matches.
#[derive(Debug, Clone)]
pub struct ReportPage {
    pub reports: Vec<CallReport>,
    pub total_count: u64,
}

fn report_from_row(row: &Row<'_>) -> rusqlite::Result<CallReport> {
    let id: String = row.get(0)?;
    let id = Uuid::parse_str(&id)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;

    let mood: i64 = row.get(3)?;
    let mood = MoodScore::new(mood).ok_or(rusqlite::Error::IntegralValueOutOfRange(3, mood))?;

    let emotions: String = row.get(5)?;
    let emotions: Vec<String> = serde_json::from_str(&emotions)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    Ok(CallReport {
        id,
        user_id: row.get(1)?,
        conversation_id: row.get(2)?,
        mood,
        mood_description: row.get(4)?,
        emotions,
        created_at: timestamp_from_sql(6, row.get(6)?)?,
    })
}

fn find_by_conversation(
    conn: &rusqlite::Connection,
    conversation_id: &str,
) -> rusqlite::Result<Option<CallReport>> {
    conn.query_row(
        &format!("SELECT {REPORT_COLUMNS} FROM phone_call_reports r WHERE r.conversation_id = ?1"),
        [conversation_id],
        report_from_row,
    )
    .optional()
}

impl Database {
    /// Write a new report with a fresh id and the current time.
    ///
    /// When the report carries a conversation id that is already recorded,
    /// nothing is written and the existing report is returned.
    pub async fn insert_report(&self, new: NewCallReport) -> Result<InsertOutcome, StorageError> {
        self.with_conn(move |conn| {
            let report = CallReport {
                id: Uuid::new_v4(),
                user_id: new.user_id,
                conversation_id: new.conversation_id,
                mood: new.judgment.mood,
                mood_description: new.judgment.mood_description,
                emotions: new.judgment.emotions,
                created_at: jiff::Timestamp::now(),
            };
            let emotions = serde_json::to_string(&report.emotions)?;

            let inserted = conn.execute(
                "INSERT INTO phone_call_reports
                    (id, user_id, conversation_id, mood, mood_description, emotions, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT DO NOTHING",
                params![
                    report.id.to_string(),
                    report.user_id,
                    report.conversation_id,
                    i64::from(report.mood),
                    report.mood_description,
                    emotions,
                    timestamp_to_sql(report.created_at),
                ],
            )?;

            if inserted == 1 {
                debug!(report_id = %report.id, user_id = %report.user_id, "report inserted");
                return Ok(InsertOutcome {
                    report,
                    created: true,
                });
            }

            // Only the conversation index can conflict: ids are fresh v4 UUIDs.
            let conversation_id = report.conversation_id.as_deref().unwrap_or_default();
            let existing = find_by_conversation(conn, conversation_id)?
                .ok_or(rusqlite::Error::QueryReturnedNoRows)?;
            debug!(report_id = %existing.id, conversation_id, "report already recorded");
            Ok(InsertOutcome {
                report: existing,
                created: false,
            })
        })
        .await
    }

    pub async fn find_report_by_conversation(
        &self,
        conversation_id: &str,
    ) -> Result<Option<CallReport>, StorageError> {
        let conversation_id = conversation_id.to_string();
        self.with_conn(move |conn| Ok(find_by_conversation(conn, &conversation_id)?))
            .await
    }

    /// Reports belonging to the patient whose profile carries
    /// `phone_number`, ordered by creation time in the requested direction.
    ///
    /// The count and the page are read in one transaction so the metadata
    /// matches the rows. Insertion order breaks creation-time ties, giving
    /// a total order across pages.
    pub async fn list_reports_for_phone(
        &self,
        phone_number: &str,
        request: PageRequest,
    ) -> Result<ReportPage, StorageError> {
        let phone_number = phone_number.to_string();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;

            let total_count: i64 = tx.query_row(
                "SELECT COUNT(*)
                 FROM phone_call_reports r
                 JOIN user_information u ON u.user_id = r.user_id
                 WHERE u.phone_number = ?1",
                [&phone_number],
                |row| row.get(0),
            )?;

            let direction = request.sort.as_sql();
            let sql = format!(
                "SELECT {REPORT_COLUMNS}
                 FROM phone_call_reports r
                 JOIN user_information u ON u.user_id = r.user_id
                 WHERE u.phone_number = ?1
                 ORDER BY r.created_at {direction}, r.rowid {direction}
                 LIMIT ?2 OFFSET ?3"
            );
            let offset = i64::try_from(request.offset()).unwrap_or(i64::MAX);

            let reports = {
                let mut stmt = tx.prepare(&sql)?;
                let rows = stmt.query_map(
                    params![phone_number, i64::from(request.limit), offset],
                    report_from_row,
                )?;
                rows.collect::<Result<Vec<_>, _>>()?
            };
            tx.commit()?;

            Ok(ReportPage {
                reports,
                total_count: total_count.max(0) as u64,
            })
        })
        .await
    }
}
