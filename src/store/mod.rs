//! SQLite-backed detection store.
//!
//! Sessions group audio files, audio files group detections. Every
//! public operation opens a fresh connection, executes and lets it
//! close on drop; the store assumes a single writer at a time.

mod export;
mod schema;

use std::path::{Path, PathBuf};

use rusqlite::{Connection, ToSql, params};
use tracing::warn;

use crate::constants::stats::TOP_SPECIES_LIMIT;
use crate::error::{Error, Result};
use crate::session::decode_session_name;
use crate::utils::time::parse_time_to_seconds;

/// A raw detection row as read from a classifier result CSV.
///
/// Fields are kept textual; normalization (time parsing, confidence
/// coercion) happens at import time.
#[derive(Debug, Clone, Default)]
pub struct RawDetection {
    /// Start time column, any supported time format.
    pub start: String,
    /// End time column, any supported time format.
    pub end: String,
    /// Scientific name, possibly empty.
    pub scientific_name: String,
    /// Common name, possibly empty.
    pub common_name: String,
    /// Confidence column, possibly empty.
    pub confidence: String,
}

/// One detection row joined with its file and session context.
#[derive(Debug, Clone)]
pub struct DetectionRow {
    /// Row identifier.
    pub id: i64,
    /// Owning audio file identifier.
    pub audio_file_id: i64,
    /// Start time in seconds.
    pub start_time: f64,
    /// End time in seconds.
    pub end_time: f64,
    /// Scientific name.
    pub scientific_name: String,
    /// Common name.
    pub common_name: String,
    /// Detection confidence.
    pub confidence: f64,
    /// Source audio filename.
    pub filename: String,
    /// Owning session name.
    pub session_name: String,
    /// Model name recorded on the session.
    pub model_name: String,
}

/// Conjunctive filters for detection queries.
#[derive(Debug, Clone, Default)]
pub struct DetectionFilter {
    /// Restrict to one session.
    pub session_id: Option<i64>,
    /// Restrict to one audio file.
    pub audio_file_id: Option<i64>,
    /// Case-sensitive substring matched against either name.
    pub species: Option<String>,
    /// Minimum confidence (inclusive).
    pub min_confidence: Option<f64>,
}

/// Session summary with ownership counts.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    /// Session identifier.
    pub id: i64,
    /// Session name.
    pub session_name: String,
    /// Model name.
    pub model_name: String,
    /// Model type.
    pub model_type: String,
    /// Free-text description.
    pub description: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Number of audio files in the session.
    pub file_count: i64,
    /// Number of detections in the session.
    pub detection_count: i64,
}

/// Aggregate statistics over the store or one session.
#[derive(Debug, Clone)]
pub struct Statistics {
    /// Number of sessions in scope.
    pub session_count: i64,
    /// Number of audio files in scope.
    pub file_count: i64,
    /// Number of detections in scope.
    pub detection_count: i64,
    /// Number of distinct non-empty scientific names.
    pub species_count: i64,
    /// Mean confidence, `None` without detections.
    pub avg_confidence: Option<f64>,
    /// Minimum confidence, `None` without detections.
    pub min_confidence: Option<f64>,
    /// Maximum confidence, `None` without detections.
    pub max_confidence: Option<f64>,
    /// Most-detected species, descending by count.
    pub top_species: Vec<SpeciesCount>,
}

/// Per-species detection count.
#[derive(Debug, Clone)]
pub struct SpeciesCount {
    /// Scientific name.
    pub scientific_name: String,
    /// Common name.
    pub common_name: String,
    /// Number of detections.
    pub detection_count: i64,
    /// Mean confidence over those detections.
    pub avg_confidence: f64,
}

/// Handle to a detection database file.
pub struct DetectionStore {
    db_path: PathBuf,
}

impl DetectionStore {
    /// Open a store, creating parent directories and the schema as
    /// needed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = path.into();
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let store = Self { db_path };
        let conn = store.connection()?;
        conn.execute_batch(schema::SCHEMA)
            .map_err(|e| Error::StoreOpen {
                path: store.db_path.clone(),
                source: e,
            })?;
        Ok(store)
    }

    /// Path of the backing database file.
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn connection(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path).map_err(|e| Error::StoreOpen {
            path: self.db_path.clone(),
            source: e,
        })?;
        // Cascading deletes need this on every connection.
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(conn)
    }

    /// Create a new analysis session and return its identifier.
    ///
    /// The session name is decoded into location/species/date columns
    /// when it follows the `location_species_date` convention.
    pub fn create_session(
        &self,
        name: &str,
        model_name: &str,
        model_type: &str,
        description: &str,
    ) -> Result<i64> {
        let parsed = decode_session_name(name);
        let (location, species, analysis_date) = if parsed.valid {
            (
                Some(parsed.location),
                Some(parsed.species.join("_")),
                Some(parsed.date),
            )
        } else {
            (None, None, None)
        };

        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO sessions
                 (session_name, model_name, model_type, location, species, analysis_date, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![name, model_name, model_type, location, species, analysis_date, description],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Register a source audio file under a session.
    pub fn add_audio_file(
        &self,
        session_id: i64,
        filename: &str,
        file_path: &str,
        duration_seconds: f64,
    ) -> Result<i64> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO audio_files (session_id, filename, file_path, duration_seconds)
             VALUES (?1, ?2, ?3, ?4)",
            params![session_id, filename, file_path, duration_seconds],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Import raw detection rows for one audio file.
    ///
    /// Rows with both name fields empty are skipped as non-detections.
    /// Times are normalized through the time parser; missing or
    /// unparseable confidence coerces to 0.0 with a warning. The whole
    /// batch runs in one transaction: a mid-batch failure rolls back
    /// every row of the file.
    pub fn import_detections(&self, audio_file_id: i64, rows: &[RawDetection]) -> Result<usize> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;
        let mut inserted = 0;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO detections
                     (audio_file_id, start_time_seconds, end_time_seconds,
                      scientific_name, common_name, confidence)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;

            for row in rows {
                if row.scientific_name.is_empty() && row.common_name.is_empty() {
                    continue;
                }

                let start = parse_time_to_seconds(&row.start);
                let end = parse_time_to_seconds(&row.end);
                let confidence = parse_confidence(&row.confidence);

                stmt.execute(params![
                    audio_file_id,
                    start,
                    end,
                    row.scientific_name,
                    row.common_name,
                    confidence
                ])?;
                inserted += 1;
            }
        }

        tx.commit()?;
        Ok(inserted)
    }

    /// Query detections with conjunctive filters, ordered by filename
    /// then start time.
    pub fn get_detections(&self, filter: &DetectionFilter) -> Result<Vec<DetectionRow>> {
        let mut sql = String::from(
            "SELECT d.id, d.audio_file_id, d.start_time_seconds, d.end_time_seconds,
                    d.scientific_name, d.common_name, d.confidence,
                    af.filename, s.session_name, COALESCE(s.model_name, '')
             FROM detections d
             JOIN audio_files af ON d.audio_file_id = af.id
             JOIN sessions s ON af.session_id = s.id
             WHERE 1=1",
        );
        let mut bound: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(session_id) = filter.session_id {
            sql.push_str(" AND s.id = ?");
            bound.push(Box::new(session_id));
        }
        if let Some(file_id) = filter.audio_file_id {
            sql.push_str(" AND af.id = ?");
            bound.push(Box::new(file_id));
        }
        if let Some(species) = &filter.species {
            // instr() keeps the match case-sensitive, unlike LIKE.
            sql.push_str(" AND (instr(d.scientific_name, ?) > 0 OR instr(d.common_name, ?) > 0)");
            bound.push(Box::new(species.clone()));
            bound.push(Box::new(species.clone()));
        }
        if let Some(min_confidence) = filter.min_confidence {
            sql.push_str(" AND d.confidence >= ?");
            bound.push(Box::new(min_confidence));
        }

        sql.push_str(" ORDER BY af.filename, d.start_time_seconds");

        let conn = self.connection()?;
        let mut stmt = conn.prepare(&sql)?;
        let bound_refs: Vec<&dyn ToSql> = bound.iter().map(|p| p.as_ref()).collect();
        let rows = stmt
            .query_map(bound_refs.as_slice(), |row| {
                Ok(DetectionRow {
                    id: row.get(0)?,
                    audio_file_id: row.get(1)?,
                    start_time: row.get(2)?,
                    end_time: row.get(3)?,
                    scientific_name: row.get(4)?,
                    common_name: row.get(5)?,
                    confidence: row.get(6)?,
                    filename: row.get(7)?,
                    session_name: row.get(8)?,
                    model_name: row.get(9)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// List all sessions with file and detection counts, newest first.
    pub fn get_sessions(&self) -> Result<Vec<SessionSummary>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT s.id, s.session_name, COALESCE(s.model_name, ''),
                    COALESCE(s.model_type, ''), COALESCE(s.description, ''),
                    s.created_at, COUNT(DISTINCT af.id), COUNT(d.id)
             FROM sessions s
             LEFT JOIN audio_files af ON s.id = af.session_id
             LEFT JOIN detections d ON af.id = d.audio_file_id
             GROUP BY s.id
             ORDER BY s.created_at DESC, s.id DESC",
        )?;
        let sessions = stmt
            .query_map([], |row| {
                Ok(SessionSummary {
                    id: row.get(0)?,
                    session_name: row.get(1)?,
                    model_name: row.get(2)?,
                    model_type: row.get(3)?,
                    description: row.get(4)?,
                    created_at: row.get(5)?,
                    file_count: row.get(6)?,
                    detection_count: row.get(7)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(sessions)
    }

    /// Aggregate statistics, optionally restricted to one session.
    pub fn get_statistics(&self, session_id: Option<i64>) -> Result<Statistics> {
        let conn = self.connection()?;

        let mut sql = String::from(
            "SELECT COUNT(DISTINCT s.id), COUNT(DISTINCT af.id), COUNT(d.id),
                    COUNT(DISTINCT NULLIF(d.scientific_name, '')),
                    AVG(d.confidence), MIN(d.confidence), MAX(d.confidence)
             FROM sessions s
             LEFT JOIN audio_files af ON s.id = af.session_id
             LEFT JOIN detections d ON af.id = d.audio_file_id",
        );
        let mut bound: Vec<Box<dyn ToSql>> = Vec::new();
        if let Some(id) = session_id {
            sql.push_str(" WHERE s.id = ?");
            bound.push(Box::new(id));
        }

        let bound_refs: Vec<&dyn ToSql> = bound.iter().map(|p| p.as_ref()).collect();
        let mut stats = conn.query_row(&sql, bound_refs.as_slice(), |row| {
            Ok(Statistics {
                session_count: row.get(0)?,
                file_count: row.get(1)?,
                detection_count: row.get(2)?,
                species_count: row.get(3)?,
                avg_confidence: row.get(4)?,
                min_confidence: row.get(5)?,
                max_confidence: row.get(6)?,
                top_species: Vec::new(),
            })
        })?;

        let mut species_sql = String::from(
            "SELECT d.scientific_name, d.common_name, COUNT(*) AS detection_count,
                    AVG(d.confidence)
             FROM detections d
             JOIN audio_files af ON d.audio_file_id = af.id
             JOIN sessions s ON af.session_id = s.id
             WHERE d.scientific_name IS NOT NULL AND d.scientific_name != ''",
        );
        if session_id.is_some() {
            species_sql.push_str(" AND s.id = ?");
        }
        species_sql.push_str(&format!(
            " GROUP BY d.scientific_name, d.common_name
              ORDER BY detection_count DESC
              LIMIT {TOP_SPECIES_LIMIT}"
        ));

        let mut stmt = conn.prepare(&species_sql)?;
        stats.top_species = stmt
            .query_map(bound_refs.as_slice(), |row| {
                Ok(SpeciesCount {
                    scientific_name: row.get(0)?,
                    common_name: row.get(1)?,
                    detection_count: row.get(2)?,
                    avg_confidence: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(stats)
    }

    /// Delete all sessions with the given name, cascading to their
    /// audio files and detections. Returns whether anything was removed.
    pub fn delete_session(&self, name: &str) -> Result<bool> {
        let conn = self.connection()?;
        let deleted = conn.execute("DELETE FROM sessions WHERE session_name = ?1", params![name])?;
        Ok(deleted > 0)
    }
}

fn parse_confidence(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or_else(|_| {
        warn!("missing or unparseable confidence '{raw}', using 0.0");
        0.0
    })
}
