use serde::Serialize;
use serde_json::{Map, Value};

use crate::fragment::{GeometryDescriptor, MaterialDescriptor};

/// Column-major 4x4 identity, the only transform this exporter emits.
pub const IDENTITY_MATRIX: [u8; 16] = [
    1, 0, 0, 0, //
    0, 1, 0, 0, //
    0, 0, 1, 0, //
    0, 0, 0, 1,
];

pub const FORMAT_VERSION: f64 = 4.3;
pub const FORMAT_TYPE: &str = "Object";
pub const GENERATOR: &str = "ObjectExporter";

/// A three.js JSON Object (format 4.3) document.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SceneDocument {
    pub metadata: Metadata,
    pub geometries: Vec<GeometryDescriptor>,
    pub materials: Vec<MaterialDescriptor>,
    pub scene: SceneNode,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Metadata {
    pub version: f64,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub generator: &'static str,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            kind: FORMAT_TYPE,
            generator: GENERATOR,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SceneNode {
    pub uuid: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub matrix: [u8; 16],
    pub children: Vec<MeshNode>,
}

impl SceneNode {
    pub fn new(uuid: String, children: Vec<MeshNode>) -> Self {
        Self {
            uuid,
            kind: "Scene",
            matrix: IDENTITY_MATRIX,
            children,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshNode {
    pub uuid: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub geometry: String,
    pub material: String,
    pub matrix: [u8; 16],
    pub user_data: Map<String, Value>,
}

impl MeshNode {
    pub fn new(
        uuid: String,
        index: usize,
        geometry: String,
        material: String,
        user_data: Map<String, Value>,
    ) -> Self {
        Self {
            uuid,
            name: format!("mesh{index}"),
            kind: "Mesh",
            geometry,
            material,
            matrix: IDENTITY_MATRIX,
            user_data,
        }
    }
}

impl SceneDocument {
    pub fn children(&self) -> &[MeshNode] {
        &self.scene.children
    }

    pub fn geometry(&self, uuid: &str) -> Option<&GeometryDescriptor> {
        self.geometries.iter().find(|g| g.uuid() == uuid)
    }

    pub fn material(&self, uuid: &str) -> Option<&MaterialDescriptor> {
        self.materials.iter().find(|m| m.uuid() == uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mesh_node_serializes_three_js_keys() {
        let mut user_data = Map::new();
        user_data.insert("layer".to_string(), json!("roof"));
        let node = MeshNode::new("n0".into(), 4, "g1".into(), "m1".into(), user_data);

        let v = serde_json::to_value(&node).unwrap();
        assert_eq!(v["name"], json!("mesh4"));
        assert_eq!(v["type"], json!("Mesh"));
        assert_eq!(v["userData"], json!({"layer": "roof"}));
        assert_eq!(v["matrix"].as_array().unwrap().len(), 16);
        assert!(v.get("user_data").is_none());
    }

    #[test]
    fn empty_document_shape() {
        let doc = SceneDocument {
            metadata: Metadata::default(),
            geometries: vec![],
            materials: vec![],
            scene: SceneNode::new("root".into(), vec![]),
        };

        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({
                "metadata": {"version": 4.3, "type": "Object", "generator": "ObjectExporter"},
                "geometries": [],
                "materials": [],
                "scene": {
                    "uuid": "root",
                    "type": "Scene",
                    "matrix": [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1],
                    "children": []
                }
            })
        );
    }
}
