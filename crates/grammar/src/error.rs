/// Why an input line could not be dispatched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
	#[error("unknown command at position {cursor}")]
	UnknownCommand { cursor: usize },
	#[error("incorrect argument for command at position {cursor}")]
	UnknownArgument { cursor: usize },
	#[error("unknown or incomplete command")]
	IncompleteCommand,
	#[error("invalid value for argument {name} at position {cursor}: {reason}")]
	InvalidArgument { name: String, reason: String, cursor: usize },
	#[error("command failed: {0}")]
	Execution(#[from] CommandFailure),
}

impl DispatchError {
	/// Input position the error refers to, used to pick the most specific
	/// error among failed branches.
	pub(crate) fn cursor(&self) -> usize {
		match self {
			Self::UnknownCommand { cursor } | Self::UnknownArgument { cursor } | Self::InvalidArgument { cursor, .. } => *cursor,
			Self::IncompleteCommand | Self::Execution(_) => usize::MAX,
		}
	}
}

/// Error returned by a command callback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct CommandFailure(pub String);
