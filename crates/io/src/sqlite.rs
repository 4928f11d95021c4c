// SQLite-backed settings store

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension, Transaction};

use enginetune_core::{
    PresetId, Setting, SettingValueType, SettingsPreset, SettingsStore, StoreError, ValueUpdate,
};

use crate::seed;
use crate::SCHEMA_VERSION;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS settings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    section TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    value_type TEXT NOT NULL,          -- Boolean, Integer, Float, String, Enum
    current_value TEXT NOT NULL,
    default_value TEXT NOT NULL,
    min_value TEXT,
    max_value TEXT,
    impact TEXT NOT NULL DEFAULT '',
    enum_options TEXT,                 -- JSON array, Enum only
    UNIQUE (section, name)
);

CREATE TABLE IF NOT EXISTS presets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS preset_settings (
    preset_id INTEGER NOT NULL REFERENCES presets(id) ON DELETE CASCADE,
    setting_key TEXT NOT NULL,         -- section.name
    setting_value TEXT NOT NULL,
    PRIMARY KEY (preset_id, setting_key)
);

CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path`. An empty settings table is
    /// seeded with the default catalog, an empty presets table with the tier
    /// presets.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(StoreError::io)?;
            }
        }
        let conn = Connection::open(path).map_err(StoreError::sqlite)?;
        log::info!("opened settings database {}", path.display());
        Self::init(conn)
    }

    /// Delete any existing database at `path` and start from the seed data.
    pub fn open_fresh(path: &Path) -> Result<Self, StoreError> {
        if path.exists() {
            std::fs::remove_file(path).map_err(StoreError::io)?;
            log::info!("removed existing database {}", path.display());
        }
        Self::open(path)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(StoreError::sqlite)?;
        Self::init(conn)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn init(mut conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(StoreError::sqlite)?;
        conn.execute_batch(SCHEMA).map_err(StoreError::sqlite)?;

        let stored_version: Option<String> = conn
            .query_row("SELECT value FROM meta WHERE key = 'schema_version'", [], |r| r.get(0))
            .optional()
            .map_err(StoreError::sqlite)?;
        match stored_version.as_deref().map(str::parse::<u32>) {
            None => {
                conn.execute(
                    "INSERT INTO meta (key, value) VALUES ('schema_version', ?1)",
                    params![SCHEMA_VERSION.to_string()],
                )
                .map_err(StoreError::sqlite)?;
            }
            Some(Ok(v)) if v <= SCHEMA_VERSION => {}
            Some(Ok(v)) => {
                return Err(StoreError::Corrupt(format!(
                    "database schema version {v} is newer than supported version {SCHEMA_VERSION}"
                )));
            }
            Some(Err(e)) => {
                return Err(StoreError::Corrupt(format!("unreadable schema_version: {e}")));
            }
        }

        let settings_empty = table_is_empty(&conn, "settings")?;
        let presets_empty = table_is_empty(&conn, "presets")?;
        if settings_empty || presets_empty {
            seed_defaults(&mut conn, settings_empty, presets_empty)?;
        }

        Ok(Self { conn })
    }
}

fn table_is_empty(conn: &Connection, table: &str) -> Result<bool, StoreError> {
    let count: i64 = conn
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
        .map_err(StoreError::sqlite)?;
    Ok(count == 0)
}

/// Seed whichever of the catalog and the tier presets is missing.
fn seed_defaults(
    conn: &mut Connection,
    with_settings: bool,
    with_presets: bool,
) -> Result<(), StoreError> {
    let settings = if with_settings { seed::default_settings() } else { Vec::new() };
    let presets = if with_presets { seed::default_presets() } else { Vec::new() };

    let tx = conn.transaction().map_err(StoreError::sqlite)?;
    {
        let mut stmt = tx
            .prepare(
                "INSERT INTO settings (name, section, description, value_type, current_value, default_value, min_value, max_value, impact, enum_options)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )
            .map_err(StoreError::sqlite)?;
        for s in &settings {
            let enum_options = match s.enum_options() {
                Some(options) => Some(serde_json::to_string(options).map_err(|e| StoreError::Corrupt(e.to_string()))?),
                None => None,
            };
            stmt.execute(params![
                s.name,
                s.section,
                s.description,
                s.value_type.tag(),
                s.current_value,
                s.default_value,
                s.min_value,
                s.max_value,
                s.impact,
                enum_options,
            ])
            .map_err(StoreError::sqlite)?;
        }
    }
    for preset in &presets {
        insert_preset_rows(&tx, preset)?;
    }
    tx.commit().map_err(StoreError::sqlite)?;

    log::info!("seeded {} settings and {} presets", settings.len(), presets.len());
    Ok(())
}

fn insert_preset_rows(tx: &Transaction<'_>, preset: &SettingsPreset) -> Result<PresetId, StoreError> {
    let created_at = if preset.created_at.is_empty() {
        chrono::Local::now().to_rfc3339()
    } else {
        preset.created_at.clone()
    };
    tx.execute(
        "INSERT INTO presets (name, description, created_at) VALUES (?1, ?2, ?3)",
        params![preset.name, preset.description, created_at],
    )
    .map_err(StoreError::sqlite)?;
    let id = PresetId(tx.last_insert_rowid());
    insert_entries(tx, id, preset)?;
    Ok(id)
}

fn insert_entries(tx: &Transaction<'_>, id: PresetId, preset: &SettingsPreset) -> Result<(), StoreError> {
    let mut stmt = tx
        .prepare("INSERT INTO preset_settings (preset_id, setting_key, setting_value) VALUES (?1, ?2, ?3)")
        .map_err(StoreError::sqlite)?;
    for (key, value) in &preset.settings {
        stmt.execute(params![id.0, key, value]).map_err(StoreError::sqlite)?;
    }
    Ok(())
}

fn read_setting(row: &rusqlite::Row<'_>) -> rusqlite::Result<(Setting, Option<String>, String)> {
    let value_type: String = row.get(3)?;
    let enum_options: Option<String> = row.get(9)?;
    let setting = Setting {
        name: row.get(0)?,
        section: row.get(1)?,
        description: row.get(2)?,
        value_type: SettingValueType::String,
        current_value: row.get(4)?,
        default_value: row.get(5)?,
        min_value: row.get(6)?,
        max_value: row.get(7)?,
        impact: row.get(8)?,
    };
    Ok((setting, enum_options, value_type))
}

type PresetRow = (i64, String, String, String);

fn read_preset_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PresetRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

impl SqliteStore {
    fn load_entries(&self, id: PresetId) -> Result<Vec<(String, String)>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT setting_key, setting_value FROM preset_settings WHERE preset_id = ?1")
            .map_err(StoreError::sqlite)?;
        let rows = stmt
            .query_map(params![id.0], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))
            .map_err(StoreError::sqlite)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::sqlite)
    }

    fn preset_from_row(&self, row: PresetRow) -> Result<SettingsPreset, StoreError> {
        let (id, name, description, created_at) = row;
        let id = PresetId(id);
        Ok(SettingsPreset {
            id: Some(id),
            name,
            description,
            created_at,
            settings: self.load_entries(id)?.into_iter().collect(),
        })
    }
}

impl SettingsStore for SqliteStore {
    fn load_settings(&self) -> Result<Vec<Setting>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT name, section, description, value_type, current_value, default_value, min_value, max_value, impact, enum_options
                 FROM settings ORDER BY section, name",
            )
            .map_err(StoreError::sqlite)?;
        let rows = stmt.query_map([], read_setting).map_err(StoreError::sqlite)?;

        let mut settings = Vec::new();
        for row in rows {
            let (mut setting, enum_options, tag) = row.map_err(StoreError::sqlite)?;
            let options = match enum_options {
                Some(json) => Some(serde_json::from_str::<Vec<String>>(&json).map_err(|e| {
                    StoreError::Corrupt(format!("enum options of {}: {e}", setting.qualified_key()))
                })?),
                None => None,
            };
            setting.value_type = SettingValueType::from_tag(&tag, options);
            settings.push(setting);
        }
        Ok(settings)
    }

    fn update_values(&mut self, updates: &[ValueUpdate]) -> Result<(), StoreError> {
        let tx = self.conn.transaction().map_err(StoreError::sqlite)?;
        {
            let mut stmt = tx
                .prepare("UPDATE settings SET current_value = ?1 WHERE section = ?2 AND name = ?3")
                .map_err(StoreError::sqlite)?;
            for update in updates {
                stmt.execute(params![update.value, update.section, update.name])
                    .map_err(StoreError::sqlite)?;
            }
        }
        tx.commit().map_err(StoreError::sqlite)
    }

    fn list_presets(&self) -> Result<Vec<SettingsPreset>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, description, created_at FROM presets ORDER BY name, id")
            .map_err(StoreError::sqlite)?;
        let rows = stmt
            .query_map([], read_preset_row)
            .map_err(StoreError::sqlite)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::sqlite)?;
        rows.into_iter().map(|row| self.preset_from_row(row)).collect()
    }

    fn load_preset(&self, id: PresetId) -> Result<Option<SettingsPreset>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, description, created_at FROM presets WHERE id = ?1",
                params![id.0],
                read_preset_row,
            )
            .optional()
            .map_err(StoreError::sqlite)?;
        row.map(|row| self.preset_from_row(row)).transpose()
    }

    fn insert_preset(&mut self, preset: &SettingsPreset) -> Result<PresetId, StoreError> {
        let tx = self.conn.transaction().map_err(StoreError::sqlite)?;
        let id = insert_preset_rows(&tx, preset)?;
        tx.commit().map_err(StoreError::sqlite)?;
        Ok(id)
    }

    fn replace_preset(&mut self, id: PresetId, preset: &SettingsPreset) -> Result<bool, StoreError> {
        let tx = self.conn.transaction().map_err(StoreError::sqlite)?;
        let changed = tx
            .execute(
                "UPDATE presets SET name = ?1, description = ?2 WHERE id = ?3",
                params![preset.name, preset.description, id.0],
            )
            .map_err(StoreError::sqlite)?;
        if changed == 0 {
            return Ok(false);
        }
        tx.execute("DELETE FROM preset_settings WHERE preset_id = ?1", params![id.0])
            .map_err(StoreError::sqlite)?;
        insert_entries(&tx, id, preset)?;
        tx.commit().map_err(StoreError::sqlite)?;
        Ok(true)
    }

    fn delete_preset(&mut self, id: PresetId) -> Result<bool, StoreError> {
        let changed = self
            .conn
            .execute("DELETE FROM presets WHERE id = ?1", params![id.0])
            .map_err(StoreError::sqlite)?;
        Ok(changed > 0)
    }
}
