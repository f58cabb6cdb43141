pub mod vector;
pub mod color;
pub mod ray;
pub mod transform;

pub mod shape;
pub mod material;
pub mod light;
pub mod camera;

pub mod intersect;
pub mod lighting;
pub mod renderer;
pub mod canvas;

pub mod error;
pub mod registry;
pub mod scene;
pub mod obj;

pub mod consts;

const FEQ_EPSILON: f64 = 0.0001;
pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < FEQ_EPSILON
}
