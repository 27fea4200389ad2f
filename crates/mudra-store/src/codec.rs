//! Persistence codec
//!
//! Gestures are stored as a name-keyed JSON map of records:
//! `{name, frames: [{bone: {position: [x,y,z], rotation: [x,y,z,w]}}…],
//! responseName}`. Loading returns records sorted by name, which keeps
//! cursor order deterministic across restarts. A missing backing file is
//! an empty collection, not an error. Saving overwrites the whole map.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use mudra_core::{BonePose, Frame, Gesture, MudraError, MudraResult, Quat, Vec3};

/// Persistence seam for the gesture store
pub trait GestureCodec {
    /// Load all gestures, sorted by name. Absent storage yields an
    /// empty collection.
    fn load(&self) -> MudraResult<Vec<Gesture>>;

    /// Overwrite storage with the given gestures.
    fn save(&self, gestures: &[&Gesture]) -> MudraResult<()>;
}

#[derive(Serialize, Deserialize)]
struct BoneRecord {
    position: [f32; 3],
    /// Quaternion components in x, y, z, w order
    rotation: [f32; 4],
}

#[derive(Serialize, Deserialize)]
struct GestureRecord {
    name: String,
    frames: Vec<BTreeMap<String, BoneRecord>>,
    #[serde(rename = "responseName", default, skip_serializing_if = "Option::is_none")]
    response_name: Option<String>,
}

fn encode(gesture: &Gesture) -> GestureRecord {
    let frames = gesture
        .frames()
        .iter()
        .map(|frame| {
            frame
                .iter()
                .map(|(bone, pose)| {
                    let record = BoneRecord {
                        position: [pose.position.x, pose.position.y, pose.position.z],
                        rotation: [
                            pose.rotation.x,
                            pose.rotation.y,
                            pose.rotation.z,
                            pose.rotation.w,
                        ],
                    };
                    (bone.clone(), record)
                })
                .collect()
        })
        .collect();

    GestureRecord {
        name: gesture.name().to_string(),
        frames,
        response_name: gesture.response_name().map(str::to_string),
    }
}

fn decode(record: GestureRecord) -> MudraResult<Gesture> {
    let frames: Vec<Frame> = record
        .frames
        .into_iter()
        .map(|bones| {
            let mut frame = Frame::new();
            for (bone, r) in bones {
                let [x, y, z] = r.position;
                let [qx, qy, qz, qw] = r.rotation;
                frame.set(
                    bone,
                    BonePose::new(Vec3::new(x, y, z), Quat::new(qw, qx, qy, qz).normalize()),
                );
            }
            frame
        })
        .collect();

    let gesture = Gesture::new(record.name.clone(), frames)
        .map_err(|_| MudraError::InvalidRecord(format!("gesture '{}' has no frames", record.name)))?;

    Ok(match record.response_name {
        Some(response) => gesture.with_response(response),
        None => gesture,
    })
}

fn to_json(gestures: &[&Gesture]) -> MudraResult<String> {
    let map: BTreeMap<&str, GestureRecord> = gestures
        .iter()
        .map(|gesture| (gesture.name(), encode(gesture)))
        .collect();
    serde_json::to_string_pretty(&map).map_err(|e| MudraError::InvalidRecord(e.to_string()))
}

fn from_json(text: &str) -> MudraResult<Vec<Gesture>> {
    let map: BTreeMap<String, GestureRecord> =
        serde_json::from_str(text).map_err(|e| MudraError::InvalidRecord(e.to_string()))?;
    map.into_values().map(decode).collect()
}

/// Codec over a JSON file on disk
pub struct JsonFileCodec {
    path: PathBuf,
}

impl JsonFileCodec {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileCodec { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl GestureCodec for JsonFileCodec {
    fn load(&self) -> MudraResult<Vec<Gesture>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = std::fs::read_to_string(&self.path)?;
        from_json(&text)
    }

    fn save(&self, gestures: &[&Gesture]) -> MudraResult<()> {
        let text = to_json(gestures)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

/// Codec over a shared in-memory buffer, for tests and demos.
///
/// Clones share the same buffer, so one instance can observe what
/// another saved.
#[derive(Clone, Default)]
pub struct MemoryCodec {
    buffer: Arc<Mutex<Option<String>>>,
}

impl MemoryCodec {
    pub fn new() -> Self {
        MemoryCodec::default()
    }

    /// The raw serialized form, if anything was saved
    pub fn contents(&self) -> Option<String> {
        self.buffer.lock().clone()
    }
}

impl GestureCodec for MemoryCodec {
    fn load(&self) -> MudraResult<Vec<Gesture>> {
        match self.buffer.lock().as_deref() {
            Some(text) => from_json(text),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, gestures: &[&Gesture]) -> MudraResult<()> {
        *self.buffer.lock() = Some(to_json(gestures)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mudra_core::HAND_POSITION;

    fn sample_gesture(name: &str) -> Gesture {
        let mut frame = Frame::new();
        frame.set(HAND_POSITION, BonePose::default());
        frame.set(
            "IndexTip",
            BonePose::new(
                Vec3::new(1.0, 2.0, 3.0),
                Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 45.0),
            ),
        );
        Gesture::new(name, vec![frame]).unwrap().with_response("swap-shape")
    }

    #[test]
    fn test_memory_roundtrip() {
        let codec = MemoryCodec::new();
        let gesture = sample_gesture("fist");
        codec.save(&[&gesture]).unwrap();

        let loaded = codec.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name(), "fist");
        assert_eq!(loaded[0].response_name(), Some("swap-shape"));

        let bone = loaded[0].frames()[0].bone("IndexTip").unwrap();
        assert!((bone.position.x - 1.0).abs() < 1e-6);
        let original = gesture.frames()[0].bone("IndexTip").unwrap();
        assert!(bone.rotation.angle_to(&original.rotation) < 0.01);
    }

    #[test]
    fn test_absent_storage_is_empty() {
        let codec = MemoryCodec::new();
        assert!(codec.load().unwrap().is_empty());

        let file = JsonFileCodec::new("/nonexistent/never/gestures.json");
        assert!(file.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_load_save_fixed_point() {
        let codec = MemoryCodec::new();
        let a = sample_gesture("alpha");
        let b = sample_gesture("beta");
        codec.save(&[&b, &a]).unwrap();
        let first = codec.contents().unwrap();

        let loaded = codec.load().unwrap();
        let refs: Vec<&Gesture> = loaded.iter().collect();
        codec.save(&refs).unwrap();
        assert_eq!(codec.contents().unwrap(), first);
    }

    #[test]
    fn test_load_sorted_by_name() {
        let codec = MemoryCodec::new();
        let z = sample_gesture("zeta");
        let a = sample_gesture("alpha");
        codec.save(&[&z, &a]).unwrap();

        let loaded = codec.load().unwrap();
        assert_eq!(loaded[0].name(), "alpha");
        assert_eq!(loaded[1].name(), "zeta");
    }

    #[test]
    fn test_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("mudra-codec-{}.json", std::process::id()));
        let codec = JsonFileCodec::new(&path);
        let gesture = sample_gesture("fist");
        codec.save(&[&gesture]).unwrap();

        let loaded = codec.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name(), "fist");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_malformed_record_rejected() {
        let codec = MemoryCodec::new();
        *codec.buffer.lock() = Some("{\"ghost\": {\"name\": \"ghost\", \"frames\": []}}".into());
        assert!(matches!(codec.load(), Err(MudraError::InvalidRecord(_))));
    }
}
