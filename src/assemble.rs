use indexmap::{IndexMap, map::Entry};
use serde_json::{Map, Value};

use crate::{
    error::{ExportError, ExportResult},
    fragment::{decode_material, decode_mesh},
    ids::{IdGenerator, RandomIds},
    scene::{MeshNode, Metadata, SceneDocument, SceneNode},
};

/// Builds [`SceneDocument`]s from geometry and material fragments.
///
/// Geometry `i` is paired with material `i`; once the material list runs out, every remaining
/// geometry reuses the last material. A geometry uuid that appears more than once keeps the
/// pairing of its first occurrence and yields a single mesh node.
///
/// The assembler holds nothing between calls except its identifier generator.
#[derive(Debug, Default)]
pub struct SceneAssembler<G = RandomIds> {
    ids: G,
}

struct MeshLink<'a> {
    material: &'a str,
    user_data: Map<String, Value>,
}

impl<G: IdGenerator> SceneAssembler<G> {
    pub fn new(ids: G) -> Self {
        Self { ids }
    }

    #[tracing::instrument(
        skip_all,
        fields(geometries = geometry_fragments.len(), materials = material_fragments.len())
    )]
    pub fn assemble<T, U>(
        &mut self,
        geometry_fragments: &[T],
        material_fragments: &[U],
    ) -> ExportResult<SceneDocument>
    where
        T: AsRef<str>,
        U: AsRef<str>,
    {
        let mut geometries = Vec::with_capacity(geometry_fragments.len());
        let mut attributes = Vec::with_capacity(geometry_fragments.len());
        for (index, text) in geometry_fragments.iter().enumerate() {
            let (geometry, attrs) =
                decode_mesh(text.as_ref()).map_err(|e| ExportError::malformed(index, e))?;
            geometries.push(geometry);
            attributes.push(attrs);
        }

        let materials = material_fragments
            .iter()
            .enumerate()
            .map(|(index, text)| {
                decode_material(text.as_ref()).map_err(|e| ExportError::malformed(index, e))
            })
            .collect::<ExportResult<Vec<_>>>()?;

        if !geometries.is_empty() && materials.is_empty() {
            return Err(ExportError::assembly(format!(
                "{} geometry fragment(s) but no material fragments; every mesh needs a material",
                geometries.len()
            )));
        }
        if materials.len() < geometries.len() {
            tracing::debug!(
                reused = geometries.len() - materials.len(),
                "fewer materials than geometries; reusing the last material"
            );
        }

        let last_material = materials.len().saturating_sub(1);
        let mut links: IndexMap<&str, MeshLink<'_>> = IndexMap::with_capacity(geometries.len());
        for (index, (geometry, attrs)) in geometries.iter().zip(attributes).enumerate() {
            let material = materials[index.min(last_material)].uuid();
            match links.entry(geometry.uuid()) {
                Entry::Occupied(first) => {
                    tracing::debug!(
                        geometry = geometry.uuid(),
                        index,
                        kept_material = first.get().material,
                        "duplicate geometry uuid; keeping its first pairing"
                    );
                }
                Entry::Vacant(slot) => {
                    slot.insert(MeshLink {
                        material,
                        user_data: attrs.user_data,
                    });
                }
            }
        }

        let root_uuid = self.ids.next_id();
        let children: Vec<MeshNode> = links
            .into_iter()
            .enumerate()
            .map(|(n, (geometry, link))| {
                MeshNode::new(
                    self.ids.next_id(),
                    n,
                    geometry.to_owned(),
                    link.material.to_owned(),
                    link.user_data,
                )
            })
            .collect();

        tracing::debug!(children = children.len(), "assembled scene");

        Ok(SceneDocument {
            metadata: Metadata::default(),
            geometries,
            materials,
            scene: SceneNode::new(root_uuid, children),
        })
    }
}

/// Assemble with freshly generated random identifiers.
pub fn assemble<T, U>(
    geometry_fragments: &[T],
    material_fragments: &[U],
) -> ExportResult<SceneDocument>
where
    T: AsRef<str>,
    U: AsRef<str>,
{
    SceneAssembler::new(RandomIds).assemble(geometry_fragments, material_fragments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fragment::FragmentKind, ids::SequentialIds};
    use serde_json::json;

    fn assembler() -> SceneAssembler<SequentialIds> {
        SceneAssembler::new(SequentialIds::new("n"))
    }

    fn geometry(uuid: &str) -> String {
        json!({"uuid": uuid, "type": "Geometry"}).to_string()
    }

    fn material(uuid: &str) -> String {
        json!({"uuid": uuid, "type": "MeshLambertMaterial"}).to_string()
    }

    #[test]
    fn pairs_by_position_and_names_in_emission_order() {
        let doc = assembler()
            .assemble(
                &[geometry("g1"), geometry("g2")],
                &[material("m1"), material("m2")],
            )
            .unwrap();

        assert_eq!(doc.scene.uuid, "n0");
        let children = doc.children();
        assert_eq!(children.len(), 2);
        assert_eq!(
            (children[0].uuid.as_str(), children[0].name.as_str()),
            ("n1", "mesh0")
        );
        assert_eq!(children[0].geometry, "g1");
        assert_eq!(children[0].material, "m1");
        assert_eq!(children[1].name, "mesh1");
        assert_eq!(children[1].geometry, "g2");
        assert_eq!(children[1].material, "m2");
    }

    #[test]
    fn short_material_list_reuses_last() {
        let geoms: Vec<String> = (0..5).map(|i| geometry(&format!("g{i}"))).collect();
        let doc = assembler()
            .assemble(&geoms, &[material("m0"), material("m1")])
            .unwrap();

        let mats: Vec<&str> = doc.children().iter().map(|c| c.material.as_str()).collect();
        assert_eq!(mats, ["m0", "m1", "m1", "m1", "m1"]);
        assert_eq!(doc.materials.len(), 2);
    }

    #[test]
    fn duplicate_geometry_keeps_first_pairing() {
        let doc = assembler()
            .assemble(
                &[geometry("g1"), geometry("g1")],
                &[material("m1"), material("m2")],
            )
            .unwrap();

        assert_eq!(doc.children().len(), 1);
        assert_eq!(doc.children()[0].material, "m1");
        assert_eq!(doc.geometries.len(), 2);
    }

    #[test]
    fn duplicate_does_not_shift_mesh_names() {
        let doc = assembler()
            .assemble(
                &[geometry("a"), geometry("a"), geometry("b")],
                &[material("m")],
            )
            .unwrap();

        let names: Vec<&str> = doc.children().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["mesh0", "mesh1"]);
        assert_eq!(doc.children()[1].geometry, "b");
    }

    #[test]
    fn user_data_follows_first_occurrence() {
        let doc = assembler()
            .assemble(
                &[
                    r#"{"uuid":"g1","userData":{"tag":"first"}}"#,
                    r#"{"uuid":"g1","userData":{"tag":"second"}}"#,
                ],
                &[material("m1")],
            )
            .unwrap();

        assert_eq!(doc.children()[0].user_data["tag"], json!("first"));
    }

    #[test]
    fn empty_inputs_give_empty_document() {
        let empty: [&str; 0] = [];
        let doc = assembler().assemble(&empty, &empty).unwrap();
        assert!(doc.geometries.is_empty());
        assert!(doc.materials.is_empty());
        assert!(doc.children().is_empty());
    }

    #[test]
    fn materials_without_geometry_pass_through_unreferenced() {
        let empty: [&str; 0] = [];
        let doc = assembler()
            .assemble(&empty, &[material("m1"), material("m2")])
            .unwrap();
        assert_eq!(doc.materials.len(), 2);
        assert!(doc.children().is_empty());
    }

    #[test]
    fn geometry_without_materials_is_an_assembly_error() {
        let empty: [&str; 0] = [];
        let err = assembler()
            .assemble(&[geometry("g1"), geometry("g2"), geometry("g3")], &empty)
            .unwrap_err();
        assert!(matches!(err, ExportError::Assembly(_)), "{err}");
    }

    #[test]
    fn malformed_fragment_reports_index_and_kind() {
        let err = assembler()
            .assemble(&[geometry("g1"), "{}".to_string()], &[material("m1")])
            .unwrap_err();
        match err {
            ExportError::MalformedFragment { index, source } => {
                assert_eq!(index, 1);
                assert_eq!(source.kind(), FragmentKind::Geometry);
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = assembler()
            .assemble(&[geometry("g1")], &[material("m1"), "not json".to_string()])
            .unwrap_err();
        assert!(matches!(
            err,
            ExportError::MalformedFragment { index: 1, ref source } if source.kind() == FragmentKind::Material
        ));
    }
}
