//! Shader compilation and linking for the solid renderer.
//!
//! WGSL is parsed and validated with `naga` before anything reaches the GPU,
//! so compile/link failures carry readable diagnostics and can be tested
//! without a device.

use std::fmt;

use thiserror::Error;

pub const VERTEX_SOURCE: &str = include_str!("shaders/solid.vert.wgsl");
pub const FRAGMENT_SOURCE: &str = include_str!("shaders/solid.frag.wgsl");

/// Bind group / binding of the per-draw uniform block in both stages.
pub const UNIFORM_GROUP: u32 = 0;
pub const UNIFORM_BINDING: u32 = 0;

const TRANSFORM_UNIFORM: &str = "transform";
const COLOR_UNIFORM: &str = "color";
const POSITION_ATTRIBUTE: &str = "position";

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub const fn entry_point(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_main",
            ShaderStage::Fragment => "fs_main",
        }
    }

    fn naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Shader build failure. `log` holds the compiler/linker diagnostic text.
#[derive(Debug, Clone, Error)]
pub enum ShaderError {
    #[error("failed to compile {stage} shader: {log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("failed to link shader program: {log}")]
    Link { log: String },
}

impl ShaderError {
    fn link(log: impl Into<String>) -> Self {
        ShaderError::Link { log: log.into() }
    }
}

/// A validated single-stage WGSL module.
#[derive(Debug, Clone)]
pub struct CompiledShader {
    stage: ShaderStage,
    source: String,
    module: naga::Module,
}

impl CompiledShader {
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Byte offsets of the named members inside the uniform block.
///
/// The WGSL counterpart of GL uniform locations: the host writes each value
/// at its offset within one uniform slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UniformLocations {
    pub transform: u32,
    pub color: u32,
    /// Size of the whole uniform block in bytes.
    pub block_size: u32,
}

/// Vertex + fragment stages checked against each other.
#[derive(Debug, Clone)]
pub struct ShaderProgram {
    pub vertex: CompiledShader,
    pub fragment: CompiledShader,
    pub uniforms: UniformLocations,
    /// `@location` of the `position` vertex attribute.
    pub position_location: u32,
}

impl ShaderProgram {
    /// Compiles and links the two built-in solid shaders.
    pub fn solid() -> Result<Self, ShaderError> {
        link_program(
            compile_shader(VERTEX_SOURCE, ShaderStage::Vertex)?,
            compile_shader(FRAGMENT_SOURCE, ShaderStage::Fragment)?,
        )
    }
}

/// Parses and validates `source` as a shader for `stage`.
pub fn compile_shader(source: &str, stage: ShaderStage) -> Result<CompiledShader, ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Compile {
        stage,
        log: e.emit_to_string(source),
    })?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator.validate(&module).map_err(|e| ShaderError::Compile {
        stage,
        log: error_chain(e.as_inner()),
    })?;

    let entry = stage.entry_point();
    if !module
        .entry_points
        .iter()
        .any(|ep| ep.stage == stage.naga() && ep.name == entry)
    {
        return Err(ShaderError::Compile {
            stage,
            log: format!("missing {stage} entry point `{entry}`"),
        });
    }

    log::debug!("compiled {stage} shader ({} bytes)", source.len());

    Ok(CompiledShader {
        stage,
        source: source.to_string(),
        module,
    })
}

/// Checks that the stages agree on their shared interface and resolves the
/// uniform and attribute locations.
pub fn link_program(
    vertex: CompiledShader,
    fragment: CompiledShader,
) -> Result<ShaderProgram, ShaderError> {
    if vertex.stage != ShaderStage::Vertex || fragment.stage != ShaderStage::Fragment {
        return Err(ShaderError::link(format!(
            "expected vertex + fragment stages, got {} + {}",
            vertex.stage, fragment.stage
        )));
    }

    let vs_block = uniform_block(&vertex.module).ok_or_else(|| {
        ShaderError::link(format!(
            "vertex shader declares no uniform block at @group({UNIFORM_GROUP}) @binding({UNIFORM_BINDING})"
        ))
    })?;
    let fs_block = uniform_block(&fragment.module).ok_or_else(|| {
        ShaderError::link(format!(
            "fragment shader declares no uniform block at @group({UNIFORM_GROUP}) @binding({UNIFORM_BINDING})"
        ))
    })?;
    if vs_block != fs_block {
        return Err(ShaderError::link("uniform block layout differs between vertex and fragment stages"));
    }

    let uniforms = UniformLocations {
        transform: vs_block.location(TRANSFORM_UNIFORM, MemberKind::Mat4)?,
        color: vs_block.location(COLOR_UNIFORM, MemberKind::Vec4)?,
        block_size: vs_block.span,
    };

    let position_location = attribute_location(&vertex.module, POSITION_ATTRIBUTE)?;

    log::debug!("linked solid program: {uniforms:?}, position @location({position_location})");

    Ok(ShaderProgram {
        vertex,
        fragment,
        uniforms,
        position_location,
    })
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum MemberKind {
    Mat4,
    Vec4,
    Other,
}

impl MemberKind {
    fn of(module: &naga::Module, ty: naga::Handle<naga::Type>) -> Self {
        match module.types[ty].inner {
            naga::TypeInner::Matrix {
                columns: naga::VectorSize::Quad,
                rows: naga::VectorSize::Quad,
                scalar,
            } if scalar == naga::Scalar::F32 => MemberKind::Mat4,
            naga::TypeInner::Vector {
                size: naga::VectorSize::Quad,
                scalar,
            } if scalar == naga::Scalar::F32 => MemberKind::Vec4,
            _ => MemberKind::Other,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
struct UniformMember {
    name: String,
    offset: u32,
    kind: MemberKind,
}

#[derive(Debug, Clone, Eq, PartialEq)]
struct UniformBlock {
    span: u32,
    members: Vec<UniformMember>,
}

impl UniformBlock {
    fn location(&self, name: &str, kind: MemberKind) -> Result<u32, ShaderError> {
        let member = self
            .members
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| ShaderError::link(format!("uniform `{name}` not found")))?;

        if member.kind != kind {
            return Err(ShaderError::link(format!(
                "uniform `{name}` has type {:?}, expected {kind:?}",
                member.kind
            )));
        }

        Ok(member.offset)
    }
}

fn uniform_block(module: &naga::Module) -> Option<UniformBlock> {
    let binding = naga::ResourceBinding {
        group: UNIFORM_GROUP,
        binding: UNIFORM_BINDING,
    };

    let (_, var) = module
        .global_variables
        .iter()
        .find(|(_, var)| {
            var.space == naga::AddressSpace::Uniform && var.binding.as_ref() == Some(&binding)
        })?;

    let naga::TypeInner::Struct { ref members, span } = module.types[var.ty].inner else {
        return None;
    };

    Some(UniformBlock {
        span,
        members: members
            .iter()
            .map(|m| UniformMember {
                name: m.name.clone().unwrap_or_default(),
                offset: m.offset,
                kind: MemberKind::of(module, m.ty),
            })
            .collect(),
    })
}

fn attribute_location(module: &naga::Module, name: &str) -> Result<u32, ShaderError> {
    let entry = ShaderStage::Vertex.entry_point();
    let ep = module
        .entry_points
        .iter()
        .find(|ep| ep.name == entry)
        .ok_or_else(|| ShaderError::link(format!("vertex entry point `{entry}` not found")))?;

    let arg = ep
        .function
        .arguments
        .iter()
        .find(|a| a.name.as_deref() == Some(name))
        .ok_or_else(|| ShaderError::link(format!("vertex attribute `{name}` not found")))?;

    if MemberKind::of(module, arg.ty) != MemberKind::Vec4 {
        return Err(ShaderError::link(format!("vertex attribute `{name}` must be vec4<f32>")));
    }

    match &arg.binding {
        Some(naga::Binding::Location { location, .. }) => Ok(*location),
        _ => Err(ShaderError::link(format!("vertex attribute `{name}` has no @location"))),
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut log = err.to_string();
    let mut source = err.source();
    while let Some(s) = source {
        log.push_str(": ");
        log.push_str(&s.to_string());
        source = s.source();
    }
    log
}
