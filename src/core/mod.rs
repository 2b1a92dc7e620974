mod emitter;
mod engine;
mod filter;
mod provider;
mod resolver;
mod types;

pub use emitter::CodeWriter;
pub use engine::Engine;
pub use filter::InclusionFilter;
pub use provider::{DescriptorProvider, ReflectionProvider};
pub use resolver::{ClassMap, ClassMapBuilder};
pub use types::{
    ClassDefinition, ClassKind, ClassShape, FieldShape, GenericParam, GenericShape, MethodShape,
    PrimitiveKind, Signature, TypeReference,
};
