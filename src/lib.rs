//! Assembles geometry and material fragments into a three.js JSON Object (format 4.3) scene.
//!
//! 1. **Build materials** with [`LambertMaterialBuilder`] / [`PhongMaterialBuilder`]
//! 2. **Assemble** geometry + material fragments with [`SceneAssembler`]
//! 3. **Write** the resulting [`SceneDocument`] with [`write_document`]
//!
//! [`export_scene`] runs the path check, assembly and write as one host-facing call.
#![forbid(unsafe_code)]

pub mod assemble;
pub mod color;
pub mod error;
pub mod export;
pub mod fragment;
pub mod ids;
pub mod material;
pub mod path_guard;
pub mod scene;
pub mod writer;

pub use assemble::{SceneAssembler, assemble};
pub use color::Color;
pub use error::{ExportError, ExportResult};
pub use export::{ExportOutcome, ExportRequest, export_scene};
pub use fragment::{
    AttributeDescriptor, FragmentError, FragmentKind, GeometryDescriptor, MaterialDescriptor,
    decode_attributes, decode_geometry, decode_material, decode_mesh,
};
pub use ids::{IdGenerator, RandomIds, SequentialIds};
pub use material::{
    LambertMaterialBuilder, MaterialBuild, MaterialWarning, PhongMaterialBuilder, Shading,
};
pub use path_guard::{PathError, ValidatedPath, validate_output_path};
pub use scene::{IDENTITY_MATRIX, MeshNode, Metadata, SceneDocument, SceneNode};
pub use writer::{WriteOptions, to_json_string, write_document};
