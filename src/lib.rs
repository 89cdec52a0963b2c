//! # qrgenius
//!
//! A Rust library for generating styled QR codes with Reed-Solomon error
//! correction. Builds standard symbols for versions 1-40, renders them to
//! raster images or SVG documents in five visual styles, and keeps a small
//! persisted history of generated codes.
//!
//! ## Features
//!
//! - **Symbol Construction**: Versions 1-40 with numeric, alphanumeric, and byte modes
//! - **Reed-Solomon Error Correction**: Configurable levels (L, M, Q, H)
//! - **Styled Rendering**: Standard, dotted, rounded, pixelated, and abstract styles on PNG and SVG backends
//! - **Logo Overlay**: Center logo embedding with a clear background patch
//! - **History**: Bounded, JSON-persisted record of recent generations
//!
//! ## Quick Start
//!
//! ### Simple generation
//!
//! ```rust
//! use qrgenius::QrBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Provide only data, all other settings are chosen automatically
//! let matrix = QrBuilder::new(b"Hello, World!").build()?;
//! assert_eq!(matrix.width(), 21);
//! # Ok(())
//! # }
//! ```
//!
//! ### Full configuration
//!
//! ```rust
//! use qrgenius::{ECLevel, MaskPattern, QrBuilder, RenderOptions, Style, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let matrix = QrBuilder::new(b"Hello, World!")
//!     .version(Version::new(2)?)       // symbol size, smallest fitting version when unset
//!     .ec_level(ECLevel::Q)            // defaults to ECLevel::M
//!     .mask(MaskPattern::new(3)?)      // best-scoring mask when unset
//!     .build()?;
//!
//! let opts = RenderOptions::new(300).style(Style::Rounded);
//! let png = qrgenius::render_raster(&matrix, &opts)?;
//! let svg = qrgenius::render_svg(&matrix, &opts)?;
//! # Ok(())
//! # }
//! ```
//!
//! ### One-call generation with settings
//!
//! ```rust
//! use qrgenius::{generate, GeneratorSettings};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let generated = generate("https://example.com", &GeneratorSettings::default(), None)?;
//! assert!(generated.png_data_url().starts_with("data:image/png;base64,"));
//! # Ok(())
//! # }
//! ```

pub mod bits;
pub mod builder;
pub mod codec;
pub mod ec;
pub mod error;
pub mod generator;
pub mod history;
pub mod mask;
pub mod matrix;
pub mod metadata;
pub mod render;

pub use builder::QrBuilder;
pub use error::{QrError, QrResult};
pub use generator::{generate, Generated, GeneratorSettings, MAX_CONTENT_LENGTH};
pub use history::{History, HistoryEntry, HISTORY_CAPACITY};
pub use mask::MaskPattern;
pub use matrix::Matrix;
pub use metadata::{ECLevel, Version};
pub use render::{render_raster, render_svg, RenderOptions, Style};
