//! A small tree grammar for chat-style commands.
//!
//! Commands are trees of literal and argument nodes. Every node may carry a
//! requirement (whether a source can see it), a suggestion provider and a
//! command to run when input ends on it:
//!
//! ```rust
//! use herald_grammar::{ArgumentType, Dispatcher, argument, literal};
//!
//! let mut dispatcher = Dispatcher::<()>::new();
//! dispatcher.register(
//! 	literal("double").then(
//! 		argument("n", ArgumentType::integer(0, 100))
//! 			.executes(|ctx| Ok(ctx.get_integer("n").unwrap_or_default() as i32 * 2)),
//! 	),
//! );
//! assert_eq!(dispatcher.execute("double 21", &()), Ok(42));
//! ```

mod context;
mod dispatcher;
mod error;
mod node;
mod reader;

#[cfg(test)]
mod tests;

pub use context::{CommandContext, ParsedArgument};
pub use dispatcher::Dispatcher;
pub use error::{CommandFailure, DispatchError};
pub use node::{ArgumentType, Command, CommandNode, NodeBuilder, NodeKind, Requirement, SuggestionProvider, argument, literal};
pub use reader::StringReader;
