// Infrastructure: mixin resolution, index construction, prelude shapes

pub mod index_builder;
pub mod mixin_resolver;
pub mod prelude;

pub use index_builder::IndexBuilder;
pub use mixin_resolver::MixinResolver;
