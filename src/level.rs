//! Level files and scene composition.
//!
//! A level is a JSON document describing the bodies of a system and the
//! player's starting state. Loading happens in two phases: the raw
//! [`LevelFile`] is parsed and validated, then instantiated into a fresh
//! entity list. Nothing touches the running registry until both phases have
//! succeeded.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use bevy::log::warn;
use bevy::math::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entity::{BodyData, EntityId, EntityIdGenerator, SimEntity};
use crate::rocket::RocketConfig;
use crate::tasks::{ORBIT_TASK, OrbitTask, Task, TaskMap};
use crate::types::BodyState;

/// Directory searched for level files.
pub const LEVELS_DIR: &str = "assets/levels";

/// Errors that can occur while loading a level.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse level: {0}")]
    Json(#[from] serde_json::Error),

    #[error("body {body}: {reason}")]
    InvalidBody { body: String, reason: String },

    #[error("player: {0}")]
    InvalidPlayer(String),

    #[error("duplicate body id '{0}'")]
    DuplicateBodyId(String),

    #[error("orbit cycle through body '{0}'")]
    OrbitCycle(String),

    #[error("massive bodies {first} and {second} share a position")]
    CoincidentBodies { first: String, second: String },

    #[error("task '{task}' on body {body}: {reason}")]
    InvalidTask {
        body: String,
        task: String,
        reason: String,
    },

    #[error("no level is active")]
    NoActiveLevel,
}

/// Plain `{ x, y }` pair as written in level files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2Def {
    pub x: f64,
    pub y: f64,
}

impl From<Vec2Def> for DVec2 {
    fn from(v: Vec2Def) -> Self {
        DVec2::new(v.x, v.y)
    }
}

impl From<DVec2> for Vec2Def {
    fn from(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

/// A body entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelBody {
    pub mass: f64,
    pub radius: f64,
    pub position: Vec2Def,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<Vec2Def>,
    /// Id of the body this one orbits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orbits: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Task name to definition. The definition schema depends on the name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tasks: BTreeMap<String, serde_json::Value>,
}

/// The player's rocket.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelPlayer {
    pub position: Vec2Def,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<Vec2Def>,
    /// Degrees, clockwise from +y.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelPayload {
    pub bodies: Vec<LevelBody>,
    pub player: LevelPlayer,
}

/// Raw level definition. Never mutated after parsing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelFile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub version: String,
    pub author: String,
    pub level: LevelPayload,
}

/// Definition of an `"orbit"` task.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrbitTaskDefinition {
    #[serde(default)]
    pub info: String,
    pub radius: f64,
    /// Milliseconds to stay inside.
    pub time: f64,
}

/// Where a level came from, so it can be loaded again.
#[derive(Clone, Debug, PartialEq)]
pub enum LevelSource {
    /// JSON file on disk.
    File(PathBuf),
    /// Definition supplied directly.
    Inline(Box<LevelFile>),
    /// The built-in sandbox.
    Sandbox,
}

impl LevelSource {
    /// Read the definition from this source.
    pub fn load(&self) -> Result<LevelFile, LevelError> {
        match self {
            Self::File(path) => LevelFile::load(path),
            Self::Inline(file) => Ok(file.as_ref().clone()),
            Self::Sandbox => Ok(LevelFile::sandbox()),
        }
    }

    /// Short description for logs and the UI.
    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Inline(file) => format!("inline '{}'", file.name),
            Self::Sandbox => "sandbox".to_string(),
        }
    }
}

/// A task attached to a body of the active level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskRef {
    pub entity: EntityId,
    pub name: String,
}

/// Runtime view of the loaded level.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveLevel {
    pub source: LevelSource,
    pub definition: LevelFile,
    pub tasks: Vec<TaskRef>,
    /// Entities created by this level, bodies first, rocket last.
    pub entities: Vec<EntityId>,
}

/// Result of instantiating a level: the new registry contents.
#[derive(Clone, Debug)]
pub struct InstantiatedLevel {
    pub entities: Vec<SimEntity>,
    pub tasks: Vec<TaskRef>,
}

impl LevelFile {
    /// Parse and validate a level from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, LevelError> {
        let file: Self = serde_json::from_str(json)?;
        file.validate()?;
        Ok(file)
    }

    /// Read, parse and validate a level file.
    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Built-in level: one planet and a rocket on a wide orbit.
    pub fn sandbox() -> Self {
        Self {
            name: "Sandbox".to_string(),
            description: Some("Fly around a single planet.".to_string()),
            version: "1.0".to_string(),
            author: "orbits".to_string(),
            level: LevelPayload {
                bodies: vec![LevelBody {
                    mass: 100.0,
                    radius: 5.0,
                    position: Vec2Def::default(),
                    velocity: None,
                    orbits: None,
                    id: Some("planet".to_string()),
                    tasks: BTreeMap::new(),
                }],
                player: LevelPlayer {
                    position: Vec2Def { x: -30.0, y: 20.0 },
                    velocity: Some(Vec2Def { x: 2.0, y: 0.2 }),
                    rotation: None,
                },
            },
        }
    }

    /// Display name of body `index`: its id, or its position in the list.
    fn body_name(&self, index: usize) -> String {
        self.level.bodies[index]
            .id
            .clone()
            .unwrap_or_else(|| format!("#{index}"))
    }

    /// Check everything that cannot be caught by deserialization.
    pub fn validate(&self) -> Result<(), LevelError> {
        let bodies = &self.level.bodies;
        let mut ids: HashMap<&str, usize> = HashMap::new();

        for (index, body) in bodies.iter().enumerate() {
            let invalid = |reason: &str| LevelError::InvalidBody {
                body: self.body_name(index),
                reason: reason.to_string(),
            };

            let velocity = body.velocity.unwrap_or_default();
            let finite = [
                body.mass,
                body.radius,
                body.position.x,
                body.position.y,
                velocity.x,
                velocity.y,
            ]
            .iter()
            .all(|v| v.is_finite());
            if !finite {
                return Err(invalid("non-finite value"));
            }
            if body.mass < 0.0 {
                return Err(invalid("negative mass"));
            }
            if body.radius <= 0.0 {
                return Err(invalid("radius must be positive"));
            }

            if let Some(id) = &body.id {
                if ids.insert(id.as_str(), index).is_some() {
                    return Err(LevelError::DuplicateBodyId(id.clone()));
                }
            }
        }

        for (start, body) in bodies.iter().enumerate() {
            if body.orbits.is_none() {
                continue;
            }
            let mut visited = HashSet::from([start]);
            let mut current = start;
            while let Some(parent) = bodies[current]
                .orbits
                .as_deref()
                .and_then(|id| ids.get(id).copied())
            {
                if !visited.insert(parent) {
                    return Err(LevelError::OrbitCycle(self.body_name(start)));
                }
                current = parent;
            }
        }

        for (i, a) in bodies.iter().enumerate() {
            for (j, b) in bodies.iter().enumerate().skip(i + 1) {
                if a.mass > 0.0 && b.mass > 0.0 && a.position == b.position {
                    return Err(LevelError::CoincidentBodies {
                        first: self.body_name(i),
                        second: self.body_name(j),
                    });
                }
            }
        }

        let player = &self.level.player;
        let velocity = player.velocity.unwrap_or_default();
        let finite = [
            player.position.x,
            player.position.y,
            velocity.x,
            velocity.y,
            player.rotation.unwrap_or_default(),
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(LevelError::InvalidPlayer("non-finite value".to_string()));
        }

        Ok(())
    }

    /// Build the entities of this level.
    ///
    /// Ids come from `ids`; on error some ids may have been consumed, which
    /// is harmless since ids are never reused.
    pub fn instantiate(
        &self,
        ids: &mut EntityIdGenerator,
        rocket: &RocketConfig,
    ) -> Result<InstantiatedLevel, LevelError> {
        self.validate()?;

        let mut entities = Vec::with_capacity(self.level.bodies.len() + 1);
        let mut tasks = Vec::new();
        let mut by_label: HashMap<&str, EntityId> = HashMap::new();

        for (index, body) in self.level.bodies.iter().enumerate() {
            let id = ids.next_id();
            if let Some(label) = &body.id {
                by_label.insert(label.as_str(), id);
            }

            let body_tasks = self.parse_tasks(index)?;
            tasks.extend(body_tasks.keys().map(|name| TaskRef {
                entity: id,
                name: name.clone(),
            }));

            let state = BodyState::new(
                body.position.into(),
                body.velocity.unwrap_or_default().into(),
                body.mass,
            );
            entities.push(SimEntity::body(
                id,
                state,
                body.radius,
                BodyData {
                    label: body.id.clone(),
                    orbit_parent: None,
                    tasks: body_tasks,
                },
            ));
        }

        // Parents are linked once every body exists
        for (entity, body) in entities.iter_mut().zip(&self.level.bodies) {
            let Some(parent_label) = &body.orbits else {
                continue;
            };
            let parent = by_label.get(parent_label.as_str()).copied();
            if parent.is_none() {
                warn!(
                    "Body {} orbits unknown body '{}', treating it as free",
                    entity.id, parent_label
                );
            }
            if let Some(data) = entity.as_body_mut() {
                data.orbit_parent = parent;
            }
        }

        let player = &self.level.player;
        entities.push(SimEntity::rocket(
            ids.next_id(),
            player.position.into(),
            player.velocity.unwrap_or_default().into(),
            player.rotation.unwrap_or_default(),
            rocket.size,
        ));

        Ok(InstantiatedLevel { entities, tasks })
    }

    /// Turn the raw task definitions of body `index` into runtime tasks.
    ///
    /// Unknown task types are skipped with a warning.
    fn parse_tasks(&self, index: usize) -> Result<TaskMap, LevelError> {
        let mut tasks = TaskMap::new();
        for (name, definition) in &self.level.bodies[index].tasks {
            let invalid = |reason: String| LevelError::InvalidTask {
                body: self.body_name(index),
                task: name.clone(),
                reason,
            };

            match name.as_str() {
                ORBIT_TASK => {
                    let def: OrbitTaskDefinition = serde_json::from_value(definition.clone())
                        .map_err(|e| invalid(e.to_string()))?;
                    if !(def.radius.is_finite() && def.radius > 0.0) {
                        return Err(invalid("radius must be positive".to_string()));
                    }
                    if !(def.time.is_finite() && def.time >= 0.0) {
                        return Err(invalid("time must not be negative".to_string()));
                    }
                    let task = OrbitTask::new(def.info, def.radius, def.time);
                    tasks.insert(name.clone(), Task::Orbit(task));
                }
                other => {
                    warn!(
                        "Skipping unknown task type '{}' on body {}",
                        other,
                        self.body_name(index)
                    );
                }
            }
        }
        Ok(tasks)
    }
}

/// Level files found in `dir`, sorted by file name.
pub fn discover_levels(dir: &Path) -> Result<Vec<PathBuf>, LevelError> {
    let mut levels: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    levels.sort();
    Ok(levels)
}
