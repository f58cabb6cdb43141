// Runtime defaults
pub const DEFAULT_WIDTH: usize = 1920;
pub const DEFAULT_HEIGHT: usize = 1080;
pub const DEFAULT_FOV: f64 = 72.0;
pub const DEFAULT_SAMPLES: u32 = 1;
pub const DEFAULT_MAX_DEPTH: u32 = 5;
pub const OUT_FILE: &'static str = "./output.ppm";

// Geometric epsilons
pub const PARALLEL_EPSILON: f64 = 1e-4;
pub const AXIS_EPSILON: f64 = 1e-6;
pub const TRIANGLE_EPSILON: f64 = 1e-7;

// Offset applied to secondary ray origins to avoid self-intersection.
pub const RAY_OFFSET: f64 = 0.001;

// Phong specular parameters shared by all lights
pub const SPECULAR_STRENGTH: f64 = 0.5;
pub const SHININESS: i32 = 32;
