//! Easel Core Types and Algorithms
//!
//! This crate provides the backend-agnostic half of the Easel scene renderer.
//! Both the raster and the vector backend build on it, so everything that must
//! agree between a live canvas and an exported document lives here. It includes:
//!
//! - **Identifiers**: String-interned element and file ids ([`identifier::Id`])
//! - **Colors and themes**: CSS colors, the dark-theme filter and palettes
//!   ([`color`], [`theme`])
//! - **Geometry**: Points, sizes, bounds and rotation ([`geometry`])
//! - **Elements**: The scene data model ([`element`]) and render settings
//!   ([`config`])
//! - **Transforms**: Absolute coordinates, pivots and paint transforms
//!   ([`transform`])
//! - **Paths**: Shape outlines and arrowheads ([`path`]) with stroke styles
//!   ([`stroke`])
//! - **Grid**: Zoom-adaptive grid steps ([`grid`])
//! - **Paint order**: Which elements are painted, in what order, and how they
//!   are clipped ([`paint_order`])
//! - **Embeds**, **syntax tokens** and **text measurement** ([`embed`],
//!   [`syntax`], [`text`])

pub mod color;
pub mod config;
pub mod element;
pub mod embed;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod identifier;
pub mod paint_order;
pub mod path;
pub mod stroke;
pub mod syntax;
pub mod text;
pub mod theme;
pub mod transform;
