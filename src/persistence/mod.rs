//! Level set save/load
//!
//! Level sets are stored as JSON documents. Loaded data may be hand-edited, so
//! every document is rebuilt into a [`LevelSet`] and fully re-validated before
//! a simulation can see it.

use std::fs;
use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::level::{Behaviors, Level, LevelSet, Platform, PlatformId};
use crate::math::Aabb;
use crate::sim::context::IdAllocator;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformDocument {
    pub id: PlatformId,
    #[serde(rename = "AABB")]
    pub aabb: Aabb,
    #[serde(default)]
    pub behaviors: Behaviors,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDocument {
    pub platforms: Vec<PlatformDocument>,
    pub initial_position: DVec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelSetDocument {
    pub title: String,
    #[serde(default)]
    pub difficulty: u32,
    #[serde(default)]
    pub initial_level: usize,
    pub levels: Vec<LevelDocument>,
}

impl LevelSetDocument {
    pub fn from_level_set(set: &LevelSet) -> Self {
        let levels = set
            .levels
            .iter()
            .map(|level| LevelDocument {
                platforms: level
                    .platforms
                    .iter()
                    .map(|p| PlatformDocument {
                        id: p.id,
                        aabb: *p.body(),
                        behaviors: p.behaviors.clone(),
                    })
                    .collect(),
                initial_position: level.initial_position,
            })
            .collect();

        Self {
            title: set.title.clone(),
            difficulty: set.difficulty,
            initial_level: set.initial_level,
            levels,
        }
    }

    /// Build and validate the level set. `ids` is advanced past every loaded id.
    pub fn into_level_set(self, ids: &mut IdAllocator) -> Result<LevelSet, SimError> {
        let levels = self
            .levels
            .into_iter()
            .map(|doc| {
                let platforms = doc
                    .platforms
                    .into_iter()
                    .map(|p| Platform {
                        behaviors: p.behaviors,
                        ..Platform::new(p.id, p.aabb)
                    })
                    .collect();
                Level::new(platforms, doc.initial_position)
            })
            .collect();

        let set = LevelSet::new(self.title, self.difficulty, self.initial_level, levels)?;
        if let Some(max) = set.max_platform_id() {
            if ids.peek() <= max {
                log::warn!(
                    "id allocator at {} behind loaded platform {}, advancing",
                    ids.peek(),
                    max
                );
                ids.reserve_past(max)?;
            }
        }
        Ok(set)
    }
}

pub fn from_json(json: &str, ids: &mut IdAllocator) -> Result<LevelSet, SimError> {
    let doc: LevelSetDocument = serde_json::from_str(json)?;
    doc.into_level_set(ids)
}

pub fn to_json(set: &LevelSet) -> Result<String, SimError> {
    Ok(serde_json::to_string_pretty(&LevelSetDocument::from_level_set(set))?)
}

pub fn load(path: impl AsRef<Path>, ids: &mut IdAllocator) -> Result<LevelSet, SimError> {
    let path = path.as_ref();
    let set = from_json(&fs::read_to_string(path)?, ids)?;
    log::info!(
        "Loaded level set '{}' ({} levels) from {}",
        set.title,
        set.levels.len(),
        path.display()
    );
    Ok(set)
}

pub fn save(set: &LevelSet, path: impl AsRef<Path>) -> Result<(), SimError> {
    fs::write(path.as_ref(), to_json(set)?)?;
    log::info!("Level set '{}' saved to {}", set.title, path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::level::demo;

    const PORTAL_SET: &str = r#"{
        "title": "hand edited",
        "levels": [{
            "initialPosition": [1.0, 1.0],
            "platforms": [
                {"id": 4, "AABB": {"pos": [0.0, 5.0], "width": 1.0, "height": 1.0},
                 "behaviors": [{"type": "portal", "to": 9, "normal": [1.0, 0.0]}]},
                {"id": 9, "AABB": {"pos": [6.0, 5.0], "width": 1.0, "height": 1.0},
                 "behaviors": [{"type": "portal", "to": 4, "normal": [0.0, 1.0]}]},
                {"id": 2, "AABB": {"pos": [0.0, 8.0], "width": 10.0, "height": 1.0},
                 "behaviors": [{"type": "obstacle"}, {"type": "lettered", "letter": "x"}]}
            ]
        }]
    }"#;

    #[test]
    fn hand_edited_document_loads_and_reserves_ids() {
        let mut ids = IdAllocator::new();
        let set = from_json(PORTAL_SET, &mut ids).unwrap();
        assert_eq!(set.levels[0].platforms.len(), 3);
        assert_eq!(set.levels[0].letter_map.get(8, 0), Some('x'));
        assert_eq!(ids.next_id(), Ok(PlatformId(10)));
    }

    #[test]
    fn loaded_data_is_revalidated() {
        let bad = PORTAL_SET.replace("[0.0, 1.0]", "[0.0, 2.0]");
        let err = from_json(&bad, &mut IdAllocator::new()).unwrap_err();
        assert!(matches!(
            err,
            SimError::Validation(ValidationError::PortalNormal { .. })
        ));

        let both = PORTAL_SET.replace(r#"{"type": "lettered", "letter": "x"}"#, r#"{"type": "instagib"}"#);
        let err = from_json(&both, &mut IdAllocator::new()).unwrap_err();
        assert!(matches!(
            err,
            SimError::Validation(ValidationError::ObstacleInstaGib { .. })
        ));
    }

    #[test]
    fn last_platform_id_fails_to_load() {
        let edited = PORTAL_SET.replace(r#""id": 2,"#, r#""id": 4294967295,"#);
        let err = from_json(&edited, &mut IdAllocator::new()).unwrap_err();
        assert!(matches!(
            err,
            SimError::Validation(ValidationError::PlatformIdOverflow { id: PlatformId(u32::MAX) })
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            from_json("{\"title\": 3}", &mut IdAllocator::new()),
            Err(SimError::Json(_))
        ));
    }

    #[test]
    fn demo_set_survives_save_and_load() {
        let set = demo::level_set(&mut IdAllocator::new()).unwrap();
        let path = std::env::temp_dir().join(format!("titan-levels-{}.json", std::process::id()));
        save(&set, &path).unwrap();
        let loaded = load(&path, &mut IdAllocator::new()).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.levels, set.levels);
        assert_eq!(loaded.title, "demo");
    }
}
