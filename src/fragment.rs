//! Decoding of upstream JSON fragments.
//!
//! A geometry fragment is read through two views: the [`GeometryDescriptor`] that lands in the
//! document's `geometries` array, and the [`AttributeDescriptor`] whose `userData` is attached to
//! the mesh node that references it. Material fragments decode to a [`MaterialDescriptor`].
//!
//! Only `uuid` (and `userData` for geometries) is interpreted; every other field passes through
//! untouched and in its original order.

use std::fmt;

use serde_json::{Map, Value};

const UUID: &str = "uuid";
const USER_DATA: &str = "userData";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FragmentKind {
    Geometry,
    Attributes,
    Material,
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Geometry => "geometry",
            Self::Attributes => "attributes",
            Self::Material => "material",
        })
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FragmentError {
    #[error("{kind} fragment is not valid JSON: {reason}")]
    Syntax { kind: FragmentKind, reason: String },

    #[error("{kind} fragment must be a JSON object")]
    NotAnObject { kind: FragmentKind },

    #[error("{kind} fragment is missing field `{field}`")]
    MissingField {
        kind: FragmentKind,
        field: &'static str,
    },

    #[error("{kind} fragment field `{field}` {reason}")]
    InvalidField {
        kind: FragmentKind,
        field: &'static str,
        reason: String,
    },
}

impl FragmentError {
    pub fn missing_field(kind: FragmentKind, field: &'static str) -> Self {
        Self::MissingField { kind, field }
    }

    pub fn invalid_field(
        kind: FragmentKind,
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            kind,
            field,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> FragmentKind {
        match self {
            Self::Syntax { kind, .. }
            | Self::NotAnObject { kind }
            | Self::MissingField { kind, .. }
            | Self::InvalidField { kind, .. } => *kind,
        }
    }
}

/// Geometry payload as it appears in the document's `geometries` array.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct GeometryDescriptor {
    #[serde(skip)]
    uuid: String,
    fields: Map<String, Value>,
}

impl GeometryDescriptor {
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

/// The `userData` view of a geometry fragment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeDescriptor {
    pub user_data: Map<String, Value>,
}

/// Material payload as it appears in the document's `materials` array.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct MaterialDescriptor {
    #[serde(skip)]
    uuid: String,
    fields: Map<String, Value>,
}

impl MaterialDescriptor {
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Build a descriptor from an already-structured JSON value.
    pub fn from_value(value: Value) -> Result<Self, FragmentError> {
        let fields = into_object(FragmentKind::Material, value)?;
        let uuid = read_uuid(FragmentKind::Material, &fields)?;
        Ok(Self { uuid, fields })
    }

    /// Compact JSON text of this material, suitable as an assembler input fragment.
    pub fn to_fragment(&self) -> String {
        Value::Object(self.fields.clone()).to_string()
    }
}

pub fn decode_geometry(text: &str) -> Result<GeometryDescriptor, FragmentError> {
    decode_mesh(text).map(|(geometry, _)| geometry)
}

pub fn decode_attributes(text: &str) -> Result<AttributeDescriptor, FragmentError> {
    let fields = parse_object(FragmentKind::Attributes, text)?;
    read_user_data(&fields)
}

pub fn decode_material(text: &str) -> Result<MaterialDescriptor, FragmentError> {
    let value = parse(FragmentKind::Material, text)?;
    MaterialDescriptor::from_value(value)
}

/// Decode both views of one geometry fragment.
///
/// `userData` is moved onto the attribute view and does not appear in the geometry payload.
pub fn decode_mesh(
    text: &str,
) -> Result<(GeometryDescriptor, AttributeDescriptor), FragmentError> {
    let mut fields = parse_object(FragmentKind::Geometry, text)?;
    let uuid = read_uuid(FragmentKind::Geometry, &fields)?;
    let attributes = read_user_data(&fields)?;
    fields.shift_remove(USER_DATA);
    Ok((GeometryDescriptor { uuid, fields }, attributes))
}

fn parse(kind: FragmentKind, text: &str) -> Result<Value, FragmentError> {
    serde_json::from_str(text).map_err(|e| FragmentError::Syntax {
        kind,
        reason: e.to_string(),
    })
}

fn parse_object(kind: FragmentKind, text: &str) -> Result<Map<String, Value>, FragmentError> {
    into_object(kind, parse(kind, text)?)
}

fn into_object(kind: FragmentKind, value: Value) -> Result<Map<String, Value>, FragmentError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(FragmentError::NotAnObject { kind }),
    }
}

fn read_uuid(kind: FragmentKind, fields: &Map<String, Value>) -> Result<String, FragmentError> {
    match fields.get(UUID) {
        None => Err(FragmentError::missing_field(kind, UUID)),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(FragmentError::invalid_field(kind, UUID, "must not be blank"))
        }
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(FragmentError::invalid_field(
            kind,
            UUID,
            format!("must be a string, got {}", json_type_name(other)),
        )),
    }
}

fn read_user_data(fields: &Map<String, Value>) -> Result<AttributeDescriptor, FragmentError> {
    match fields.get(USER_DATA) {
        None | Some(Value::Null) => Ok(AttributeDescriptor::default()),
        Some(Value::Object(map)) => Ok(AttributeDescriptor {
            user_data: map.clone(),
        }),
        Some(other) => Err(FragmentError::invalid_field(
            FragmentKind::Attributes,
            USER_DATA,
            format!("must be an object, got {}", json_type_name(other)),
        )),
    }
}

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
