//! # routegen-core
//!
//! Turns route-annotated declarations into route registration code.
//!
//! A pass runs three stages over a [`DeclarationProvider`]:
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Scan | [`scan`] | [`RouteGroup`]s with their [`RouteEntry`]s |
//! | Closure | [`closure`] | [`TypeClosureSet`] of serializable shapes |
//! | Emit | [`emit`] | registration, dispatch and serialization artifacts |
//!
//! [`generate`] runs all of them and persists the artifacts when an output
//! directory is configured.
//!
//! ```ignore
//! use routegen_core::{generate, GeneratorOptions, Program};
//!
//! let program = Program::load("declarations.json".as_ref())?;
//! let generation = generate(&program, &GeneratorOptions::default());
//! for artifact in &generation.artifacts {
//!     println!("// {}\n{}", artifact.file_name(), artifact.content);
//! }
//! ```

pub mod closure;
pub mod config;
pub mod diagnostic;
pub mod emit;
pub mod markers;
pub mod model;
pub mod persist;
pub mod pipeline;
pub mod route;
pub mod scan;

pub use closure::{ClosureWalker, TypeClosureSet};
pub use config::{ConfigError, GeneratorOptions, RoutegenConfig};
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use emit::{Artifact, ArtifactKind};
pub use markers::{Conventions, RouteVerbKind};
pub use model::{DeclarationProvider, LoadError, Program, TypeRef};
pub use pipeline::{generate, Generation};
pub use route::{combine_path, ParameterSpec, ReturnShape, RouteEntry, RouteGroup};
