//! Open3D file I/O tutorial.
//!
//! Reads the sample point cloud, triangle mesh and image shipped with the
//! Open3D test data, prints a summary of each, and writes each back out as
//! `copy_of_<name>`. Point clouds use PLY or PCD, meshes use PLY, and images
//! use whatever format their extension names.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`error`] - Geometry and image I/O errors
//! - [`image`] - Raster image reading and writing
//! - [`mesh`] - Triangle meshes
//! - [`point_cloud`] - Point clouds
//! - [`runner`] - The read, summarise and write sequence

pub mod cli;
pub mod error;
pub mod image;
pub mod mesh;
pub mod point_cloud;
pub mod runner;

mod pcd;
mod ply;

pub use pcd::PcdEncoding;
pub use ply::PlyEncoding;
