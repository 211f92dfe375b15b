//! Builders for the material fragments fed into scene assembly.
//!
//! Each family mirrors the corresponding three.js material type. Built materials are always
//! flagged `transparent` and double-sided, so opacity can be tuned later without re-exporting.

use std::fmt;

use crate::{
    color::Color,
    error::{ExportError, ExportResult},
    fragment::MaterialDescriptor,
    ids::IdGenerator,
};

/// three.js `THREE.DoubleSide`.
pub const DOUBLE_SIDE: u8 = 2;
pub const DEFAULT_OPACITY: f64 = 1.0;
pub const DEFAULT_SHININESS: f64 = 30.0;
pub const DEFAULT_SPECULAR: Color = Color::from_packed(0x111111);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shading {
    Flat,
    Smooth,
}

impl Shading {
    pub fn from_smooth_edges(smooth: bool) -> Self {
        if smooth { Self::Smooth } else { Self::Flat }
    }

    /// three.js `FlatShading` / `SmoothShading` constants.
    pub const fn code(self) -> u8 {
        match self {
            Self::Flat => 1,
            Self::Smooth => 2,
        }
    }
}

impl serde::Serialize for Shading {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.code())
    }
}

/// A recoverable input problem; the offending value was replaced with its default.
#[derive(Clone, Debug, PartialEq)]
pub enum MaterialWarning {
    OpacityOutOfRange { given: f64 },
    InvalidShininess { given: f64 },
}

impl fmt::Display for MaterialWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpacityOutOfRange { given } => write!(
                f,
                "opacity must be between 0 and 1 (got {given}); defaulted back to {DEFAULT_OPACITY}"
            ),
            Self::InvalidShininess { given } => write!(
                f,
                "shininess must be a finite value >= 0 (got {given}); defaulted back to {DEFAULT_SHININESS}"
            ),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MaterialBuild {
    pub material: MaterialDescriptor,
    pub warnings: Vec<MaterialWarning>,
}

/// Non-shiny surfaces (`MeshLambertMaterial`).
#[derive(Clone, Debug)]
pub struct LambertMaterialBuilder {
    color: Color,
    ambient: Color,
    emissive: Color,
    opacity: f64,
    smooth_edges: bool,
}

impl LambertMaterialBuilder {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            ambient: Color::BLACK,
            emissive: Color::BLACK,
            opacity: DEFAULT_OPACITY,
            smooth_edges: true,
        }
    }

    pub fn ambient(mut self, c: Color) -> Self {
        self.ambient = c;
        self
    }

    pub fn emissive(mut self, c: Color) -> Self {
        self.emissive = c;
        self
    }

    pub fn opacity(mut self, o: f64) -> Self {
        self.opacity = o;
        self
    }

    pub fn smooth_edges(mut self, smooth: bool) -> Self {
        self.smooth_edges = smooth;
        self
    }

    pub fn build(self, ids: &mut dyn IdGenerator) -> ExportResult<MaterialBuild> {
        let mut warnings = Vec::new();
        let opacity = checked_opacity(self.opacity, &mut warnings);
        let uuid = ids.next_id();

        let fields = LambertFields {
            uuid: &uuid,
            kind: "MeshLambertMaterial",
            color: self.color,
            ambient: self.ambient,
            emissive: self.emissive,
            transparent: true,
            opacity,
            wireframe: false,
            side: DOUBLE_SIDE,
            shading: Shading::from_smooth_edges(self.smooth_edges),
        };
        finish(&fields, warnings)
    }
}

/// Shiny surfaces with specular highlights (`MeshPhongMaterial`).
#[derive(Clone, Debug)]
pub struct PhongMaterialBuilder {
    color: Color,
    ambient: Color,
    emissive: Color,
    specular: Color,
    shininess: f64,
    opacity: f64,
    smooth_edges: bool,
}

impl PhongMaterialBuilder {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            ambient: Color::BLACK,
            emissive: Color::BLACK,
            specular: DEFAULT_SPECULAR,
            shininess: DEFAULT_SHININESS,
            opacity: DEFAULT_OPACITY,
            smooth_edges: true,
        }
    }

    pub fn ambient(mut self, c: Color) -> Self {
        self.ambient = c;
        self
    }

    pub fn emissive(mut self, c: Color) -> Self {
        self.emissive = c;
        self
    }

    pub fn specular(mut self, c: Color) -> Self {
        self.specular = c;
        self
    }

    pub fn shininess(mut self, s: f64) -> Self {
        self.shininess = s;
        self
    }

    pub fn opacity(mut self, o: f64) -> Self {
        self.opacity = o;
        self
    }

    pub fn smooth_edges(mut self, smooth: bool) -> Self {
        self.smooth_edges = smooth;
        self
    }

    pub fn build(self, ids: &mut dyn IdGenerator) -> ExportResult<MaterialBuild> {
        let mut warnings = Vec::new();
        let opacity = checked_opacity(self.opacity, &mut warnings);
        let shininess = if self.shininess.is_finite() && self.shininess >= 0.0 {
            self.shininess
        } else {
            warn(
                &mut warnings,
                MaterialWarning::InvalidShininess {
                    given: self.shininess,
                },
            );
            DEFAULT_SHININESS
        };
        let uuid = ids.next_id();

        let fields = PhongFields {
            uuid: &uuid,
            kind: "MeshPhongMaterial",
            color: self.color,
            ambient: self.ambient,
            emissive: self.emissive,
            specular: self.specular,
            shininess,
            transparent: true,
            opacity,
            wireframe: false,
            side: DOUBLE_SIDE,
            shading: Shading::from_smooth_edges(self.smooth_edges),
        };
        finish(&fields, warnings)
    }
}

#[derive(serde::Serialize)]
struct LambertFields<'a> {
    uuid: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    color: Color,
    ambient: Color,
    emissive: Color,
    transparent: bool,
    opacity: f64,
    wireframe: bool,
    side: u8,
    shading: Shading,
}

#[derive(serde::Serialize)]
struct PhongFields<'a> {
    uuid: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    color: Color,
    ambient: Color,
    emissive: Color,
    specular: Color,
    shininess: f64,
    transparent: bool,
    opacity: f64,
    wireframe: bool,
    side: u8,
    shading: Shading,
}

fn checked_opacity(opacity: f64, warnings: &mut Vec<MaterialWarning>) -> f64 {
    // NaN fails the range check too.
    if (0.0..=1.0).contains(&opacity) {
        opacity
    } else {
        warn(warnings, MaterialWarning::OpacityOutOfRange { given: opacity });
        DEFAULT_OPACITY
    }
}

fn warn(warnings: &mut Vec<MaterialWarning>, w: MaterialWarning) {
    tracing::warn!("{w}");
    warnings.push(w);
}

fn finish(
    fields: &impl serde::Serialize,
    warnings: Vec<MaterialWarning>,
) -> ExportResult<MaterialBuild> {
    let value = serde_json::to_value(fields).map_err(|e| ExportError::serde(e.to_string()))?;
    let material = MaterialDescriptor::from_value(value)
        .map_err(|e| ExportError::serde(format!("built material is not a valid fragment: {e}")))?;
    Ok(MaterialBuild { material, warnings })
}
