// public: bounding boxes
pub mod bounds;
// public: bounding volume hierarchy
pub mod bvh;
// public: camera settings and the phased render state
pub mod camera;
// public: commandline parser
pub mod cli;
// public: color constants and tone mapping
pub mod color;
// public: `Hittable` trait and geometric primitives
pub mod hittables;
// public: material scattering
pub mod material;
// public: rays and recursive shading
pub mod ray;
// public: render session driver
pub mod render;
// public: scene selection
pub mod scenes;
// public: progress bar and sampling helpers
pub mod utils;
