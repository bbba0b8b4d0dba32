//! `user_information` table: one profile per patient.

use rusqlite::{OptionalExtension, Row, params};
use tracing::debug;

use carecall_core::models::profile::{PatientProfile, ProfileUpdate};

use crate::db::{Database, timestamp_from_sql, timestamp_to_sql};
use crate::error::StorageError;

const PROFILE_COLUMNS: &str = "user_id, information, phone_number, age, gender, occupation, \
     relationship_status, living_situation, mental_health_diagnosis, therapy_history, \
     psychiatric_medication, mental_health_hospitalization, past_self_harm_thoughts, \
     current_self_harm_thoughts, additional_info, updated_at";

fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<PatientProfile> {
    Ok(PatientProfile {
        user_id: row.get(0)?,
        information: row.get(1)?,
        phone_number: row.get(2)?,
        age: row.get(3)?,
        gender: row.get(4)?,
        occupation: row.get(5)?,
        relationship_status: row.get(6)?,
        living_situation: row.get(7)?,
        mental_health_diagnosis: row.get(8)?,
        therapy_history: row.get(9)?,
        psychiatric_medication: row.get(10)?,
        mental_health_hospitalization: row.get(11)?,
        past_self_harm_thoughts: row.get(12)?,
        current_self_harm_thoughts: row.get(13)?,
        additional_info: row.get(14)?,
        updated_at: timestamp_from_sql(15, row.get(15)?)?,
    })
}

impl Database {
    /// Insert or replace the profile owned by `user_id`, returning the
    /// stored row.
    pub async fn upsert_profile(
        &self,
        user_id: &str,
        update: ProfileUpdate,
    ) -> Result<PatientProfile, StorageError> {
        let user_id = user_id.to_string();
        self.with_conn(move |conn| {
            let information = update.resolved_information();
            let now = timestamp_to_sql(jiff::Timestamp::now());

            conn.execute(
                "INSERT INTO user_information (
                    user_id, information, phone_number, age, gender, occupation,
                    relationship_status, living_situation, mental_health_diagnosis,
                    therapy_history, psychiatric_medication, mental_health_hospitalization,
                    past_self_harm_thoughts, current_self_harm_thoughts, additional_info,
                    updated_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
                 ON CONFLICT (user_id) DO UPDATE SET
                    information = excluded.information,
                    phone_number = excluded.phone_number,
                    age = excluded.age,
                    gender = excluded.gender,
                    occupation = excluded.occupation,
                    relationship_status = excluded.relationship_status,
                    living_situation = excluded.living_situation,
                    mental_health_diagnosis = excluded.mental_health_diagnosis,
                    therapy_history = excluded.therapy_history,
                    psychiatric_medication = excluded.psychiatric_medication,
                    mental_health_hospitalization = excluded.mental_health_hospitalization,
                    past_self_harm_thoughts = excluded.past_self_harm_thoughts,
                    current_self_harm_thoughts = excluded.current_self_harm_thoughts,
                    additional_info = excluded.additional_info,
                    updated_at = excluded.updated_at",
                params![
                    user_id,
                    information,
                    update.phone_number,
                    update.age,
                    update.gender,
                    update.occupation,
                    update.relationship_status,
                    update.living_situation,
                    update.mental_health_diagnosis,
                    update.therapy_history,
                    update.psychiatric_medication,
                    update.mental_health_hospitalization,
                    update.past_self_harm_thoughts,
                    update.current_self_harm_thoughts,
                    update.additional_info,
                    now,
                ],
            )?;

            debug!(user_id = %user_id, "profile upserted");

            let profile = conn.query_row(
                &format!("SELECT {PROFILE_COLUMNS} FROM user_information WHERE user_id = ?1"),
                [&user_id],
                profile_from_row,
            )?;
            Ok(profile)
        })
        .await
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<Option<PatientProfile>, StorageError> {
        let user_id = user_id.to_string();
        self.with_conn(move |conn| {
            let profile = conn
                .query_row(
                    &format!("SELECT {PROFILE_COLUMNS} FROM user_information WHERE user_id = ?1"),
                    [&user_id],
                    profile_from_row,
                )
                .optional()?;
            Ok(profile)
        })
        .await
    }

    /// The earliest-created profile in the store, if any.
    pub async fn first_profile(&self) -> Result<Option<PatientProfile>, StorageError> {
        self.with_conn(|conn| {
            let profile = conn
                .query_row(
                    &format!("SELECT {PROFILE_COLUMNS} FROM user_information ORDER BY rowid LIMIT 1"),
                    [],
                    profile_from_row,
                )
                .optional()?;
            Ok(profile)
        })
        .await
    }
}
