//! Detection store schema.
//!
//! Normalized three-table layout: sessions own audio files, audio files
//! own detections, with cascading deletes. The `detection_log` view is
//! the flattened rendition used for ad-hoc inspection.

/// Schema applied on every store open (idempotent).
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_name TEXT NOT NULL,
    model_name TEXT,
    model_type TEXT DEFAULT 'default',
    location TEXT,
    species TEXT,
    analysis_date TEXT,
    description TEXT,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS audio_files (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id INTEGER NOT NULL,
    filename TEXT NOT NULL,
    file_path TEXT,
    duration_seconds REAL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (session_id) REFERENCES sessions (id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS detections (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    audio_file_id INTEGER NOT NULL,
    start_time_seconds REAL NOT NULL,
    end_time_seconds REAL NOT NULL,
    scientific_name TEXT,
    common_name TEXT,
    confidence REAL NOT NULL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (audio_file_id) REFERENCES audio_files (id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_sessions_name ON sessions(session_name);
CREATE INDEX IF NOT EXISTS idx_audio_files_session ON audio_files(session_id);
CREATE INDEX IF NOT EXISTS idx_detections_file ON detections(audio_file_id);
CREATE INDEX IF NOT EXISTS idx_detections_species ON detections(scientific_name);
CREATE INDEX IF NOT EXISTS idx_detections_confidence ON detections(confidence);
CREATE INDEX IF NOT EXISTS idx_detections_time
    ON detections(start_time_seconds, end_time_seconds);

CREATE VIEW IF NOT EXISTS detection_log AS
SELECT
    s.session_name,
    s.model_name,
    s.model_type,
    s.location,
    s.species,
    s.analysis_date,
    af.filename,
    af.file_path,
    d.start_time_seconds,
    d.end_time_seconds,
    d.scientific_name,
    d.common_name,
    d.confidence,
    d.created_at
FROM detections d
JOIN audio_files af ON d.audio_file_id = af.id
JOIN sessions s ON af.session_id = s.id;
";
