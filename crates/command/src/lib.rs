//! Declarative command trees with localized help.
//!
//! A [`CommandRoot`] owns the message catalog, the per-locale overlay loaded
//! from a lang directory and the parameter [`Serializer`]s. Commands are
//! declared as [`CommandModule`]s holding [`Handler`]s and nested modules, then
//! compiled with [`CommandModule::build`] into `herald-grammar` literals that
//! can be registered on a [`herald_grammar::Dispatcher`].
//!
//! Declaration mistakes (missing serializer, optional parameter not last,
//! missing body) are [`BuildError`]s returned from `build`, never surfaced at
//! invocation time.

mod error;
mod handler;
mod help;
mod message;
mod module;
mod root;
mod serializer;
mod source;

#[cfg(test)]
mod testing;
#[cfg(test)]
use {serde_json as _, tempfile as _};

pub use error::{BuildError, RootError};
pub use handler::{Arguments, Handler, HandlerBody};
pub use message::{MessageFunction, MessageSender, Prefix, SendLevel, SourcePredicate};
pub use module::CommandModule;
pub use root::{CommandRoot, CommandRootBuilder};
pub use serializer::{ArgValue, NULL_OBJECT_KEY, Serializer, SerializerBuilder, SerializerRegistry};
pub use source::{Audience, CommandSource, SenderKinds, SenderType, SourceMapper};
