use std::path::PathBuf;

/// Mistakes in a command declaration, reported when a module is built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
	/// A parameter type has no registered serializer.
	#[error("no serializer registered for {type_name} (parameter {parameter} of {handler})")]
	SerializerNotFound {
		handler: String,
		parameter: String,
		type_name: &'static str,
	},
	/// Two typed parameters of a handler share a name.
	#[error("parameter {parameter} of {handler} is declared twice")]
	DuplicateParameter { handler: String, parameter: String },
	/// An optional or variadic parameter is not the last one.
	#[error("optional or variadic parameter {parameter} of {handler} must be the last parameter")]
	InvalidPosition { handler: String, parameter: String },
	/// Two children of a module share a name or alias, or a child is named
	/// `help`.
	#[error("module {module} already has a child named {name}")]
	DuplicateChild { module: String, name: String },
	/// A handler was declared without a body.
	#[error("command {handler} has no body")]
	MissingBody { handler: String },
}

/// Errors creating a [`crate::CommandRoot`].
#[derive(Debug, thiserror::Error)]
pub enum RootError {
	#[error("{} is not a directory", .0.display())]
	NotDirectory(PathBuf),
}
