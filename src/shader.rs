// shader.rs
// WGSL for each pipeline profile, assembled from the fragments below. The math
// mirrors wave.rs / transform.rs / fragment.rs term for term.
use crate::fragment::FragmentMode;
use crate::pipeline::Profile;
use crate::transform::TransformProfile;
use crate::wave::WaveMode;

pub const VS_ENTRY: &str = "vs_main";
pub const FS_ENTRY: &str = "fs_main";

const CAMERA_UNIFORMS: &str = r#"
struct Uniforms {
    time: vec4<f32>,
    projection: mat4x4<f32>,
    view: mat4x4<f32>,
};
@group(0) @binding(0) var<uniform> uniforms: Uniforms;
"#;

const TIME_UNIFORMS: &str = r#"
struct Uniforms {
    time: vec4<f32>,
};
@group(0) @binding(0) var<uniform> uniforms: Uniforms;
"#;

const TRANSFORM_UNIFORM: &str = r#"
struct Transform {
    model: mat4x4<f32>,
};
@group(1) @binding(0) var<uniform> transform: Transform;
"#;

const VERTEX_OUTPUT: &str = r#"
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) @interpolate(flat) should_wave: u32,
};
"#;

const WAVE_CROSS_COUPLED: &str = r#"
fn wave(p: vec3<f32>, t: f32) -> vec3<f32> {
    var out = p;
    out.x = p.x + sin(p.y * 10.0) * 0.1;
    out.y = p.y + sin(p.x * 10.0) * 0.1;
    return out;
}
"#;

const WAVE_BEAT: &str = r#"
fn wave(p: vec3<f32>, t: f32) -> vec3<f32> {
    var out = p;
    out.y = out.y + sin(t * 4.0 + out.x * 2.0) * 0.1 * sin(out.x * 2.0) * 0.5;
    out.x = out.x + sin(t * 4.0 + out.y * 2.0) * 0.1 * sin(out.y * 2.0) * 0.5;
    return out;
}
"#;

const WAVE_SIMPLE: &str = r#"
fn wave(p: vec3<f32>, t: f32) -> vec3<f32> {
    var out = p;
    out.y = out.y + sin(t * 4.0 + out.x * 2.0) * 0.2;
    return out;
}
"#;

const FS_PASS_THROUGH: &str = r#"
@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(in.color, 1.0);
}
"#;

// Debug only: in.clip_position is in framebuffer pixels here.
const FS_CLIP_TINT: &str = r#"
@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(in.color * in.clip_position.x * 0.01, 1.0);
}
"#;

fn vertex_input(wave: bool) -> String {
    let flag = if wave { "    @location(2) should_wave: u32,\n" } else { "" };
    format!(
        "\nstruct VertexInput {{\n    @location(0) position: vec3<f32>,\n    @location(1) color: vec3<f32>,\n{}}};\n",
        flag
    )
}

fn vertex_main(profile: &Profile) -> String {
    let deform = if profile.wave.is_some() {
        "    if (input.should_wave == 1u) {\n        position = wave(position, uniforms.time.x);\n    }\n"
    } else {
        ""
    };
    let clip = match profile.transform {
        TransformProfile::Full => "uniforms.projection * uniforms.view * transform.model * vec4<f32>(position, 1.0)",
        TransformProfile::Camera => "uniforms.projection * uniforms.view * vec4<f32>(position, 1.0)",
        TransformProfile::Identity => "vec4<f32>(position, 1.0)",
    };
    let flag = if profile.wave.is_some() { "input.should_wave" } else { "0u" };

    format!(
        r#"
@vertex
fn vs_main(input: VertexInput) -> VertexOutput {{
    var out: VertexOutput;
    var position = input.position;
{deform}    out.clip_position = {clip};
    out.color = input.color;
    out.should_wave = {flag};
    return out;
}}
"#
    )
}

/// Builds the complete WGSL module (`vs_main` + `fs_main`) for `profile`.
pub fn generate(profile: &Profile) -> String {
    let mut src = String::from("// generated by waveshade\n");

    src.push_str(if profile.transform.binds_camera() { CAMERA_UNIFORMS } else { TIME_UNIFORMS });
    if profile.transform.binds_transform() {
        src.push_str(TRANSFORM_UNIFORM);
    }

    src.push_str(&vertex_input(profile.wave.is_some()));
    src.push_str(VERTEX_OUTPUT);

    if let Some(mode) = profile.wave {
        src.push_str(match mode {
            WaveMode::CrossCoupled => WAVE_CROSS_COUPLED,
            WaveMode::Beat => WAVE_BEAT,
            WaveMode::Simple => WAVE_SIMPLE,
        });
    }

    src.push_str(&vertex_main(profile));
    src.push_str(match profile.fragment {
        FragmentMode::PassThrough => FS_PASS_THROUGH,
        FragmentMode::ClipTint => FS_CLIP_TINT,
    });
    src
}
